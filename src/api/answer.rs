//! 答题记录接口

use super::params;
use crate::error::AppResult;
use crate::infrastructure::{HttpClient, RequestOptions};
use crate::models::{AnswerHistory, AnswerSubmission, HistoryQuery, WrongQuery};
use serde_json::{json, Value};

#[derive(Clone)]
pub struct AnswerApi {
    http: HttpClient,
}

impl AnswerApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 提交单题答案（后台提交，不显示全局加载）
    pub async fn submit(&self, submission: &AnswerSubmission) -> AppResult<Value> {
        Ok(self
            .http
            .post("/answers", submission, RequestOptions::quiet())
            .await?)
    }

    pub async fn history(&self, query: &HistoryQuery) -> AppResult<AnswerHistory> {
        let query = params::merge(json!({"page": 1, "size": 20}), query);
        Ok(self
            .http
            .get_as("/answers/history", Some(query), RequestOptions::default())
            .await?)
    }

    /// 错题本；载荷里 `isCorrect == false` 的记录是错题
    pub async fn wrong(&self, query: &WrongQuery) -> AppResult<AnswerHistory> {
        let query = params::merge(json!({"page": 1, "size": 10}), query);
        Ok(self
            .http
            .get_as("/answers/wrong", Some(query), RequestOptions::default())
            .await?)
    }

    pub async fn remove_wrong(&self, question_id: u32) -> AppResult<Value> {
        Ok(self
            .http
            .delete(
                &format!("/answers/wrong/{}", question_id),
                None,
                RequestOptions::quiet(),
            )
            .await?)
    }
}
