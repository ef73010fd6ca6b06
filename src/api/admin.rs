//! 管理端接口

use super::params;
use crate::error::AppResult;
use crate::infrastructure::{HttpClient, RequestOptions};
use crate::models::UserQuery;
use serde_json::{json, Value};
use tracing::info;

#[derive(Clone)]
pub struct AdminApi {
    http: HttpClient,
}

impl AdminApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn users(&self, query: &UserQuery) -> AppResult<Value> {
        let query = params::merge(json!({"page": 1, "size": 20}), query);
        Ok(self
            .http
            .get("/admin/users", Some(query), RequestOptions::default())
            .await?)
    }

    pub async fn update_user(&self, user_id: u64, patch: &Value) -> AppResult<Value> {
        Ok(self
            .http
            .put(&format!("/admin/users/{}", user_id), patch, RequestOptions::default())
            .await?)
    }

    pub async fn config(&self) -> AppResult<Value> {
        Ok(self
            .http
            .get("/admin/config", None, RequestOptions::default())
            .await?)
    }

    pub async fn update_config(&self, config: &Value) -> AppResult<Value> {
        Ok(self
            .http
            .put("/admin/config", config, RequestOptions::default())
            .await?)
    }

    pub async fn batch_delete_questions(&self, ids: &[u32]) -> AppResult<Value> {
        info!("🗑️ 批量删除题目 {} 道", ids.len());
        Ok(self
            .http
            .post(
                "/admin/questions/batch-delete",
                &json!({ "ids": ids }),
                RequestOptions::default(),
            )
            .await?)
    }
}
