//! 统计接口

use crate::error::AppResult;
use crate::infrastructure::{HttpClient, RequestOptions};
use crate::models::{QuestionStats, UserStats};
use serde_json::Value;

#[derive(Clone)]
pub struct StatsApi {
    http: HttpClient,
}

impl StatsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn user(&self) -> AppResult<UserStats> {
        Ok(self
            .http
            .get_as("/stats/user", None, RequestOptions::default())
            .await?)
    }

    pub async fn question(&self, question_id: u32) -> AppResult<QuestionStats> {
        Ok(self
            .http
            .get_as(
                &format!("/stats/question/{}", question_id),
                None,
                RequestOptions::quiet(),
            )
            .await?)
    }

    pub async fn system(&self) -> AppResult<Value> {
        Ok(self
            .http
            .get("/stats/system", None, RequestOptions::default())
            .await?)
    }
}
