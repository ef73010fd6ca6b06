//! 通知接口

use super::params;
use crate::error::{ApiError, AppResult};
use crate::infrastructure::{HttpClient, RequestOptions};
use crate::models::{list_from_payload, Notification, NotificationQuery};
use serde_json::{json, Value};

#[derive(Clone)]
pub struct NotificationApi {
    http: HttpClient,
}

impl NotificationApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &NotificationQuery) -> AppResult<Vec<Notification>> {
        let query = params::merge(json!({"unreadOnly": false, "page": 1, "size": 20}), query);
        let payload = self
            .http
            .get("/notifications", Some(query), RequestOptions::default())
            .await?;
        let notifications =
            list_from_payload(payload, "notifications").map_err(|source| ApiError::Decode {
                endpoint: "/notifications".to_string(),
                source,
            })?;
        Ok(notifications)
    }

    pub async fn mark_read(&self, id: &str) -> AppResult<Value> {
        Ok(self
            .http
            .put(
                &format!("/notifications/{}/read", id),
                &json!({}),
                RequestOptions::quiet(),
            )
            .await?)
    }

    pub async fn mark_all_read(&self) -> AppResult<Value> {
        Ok(self
            .http
            .put("/notifications/read-all", &json!({}), RequestOptions::default())
            .await?)
    }

    pub async fn delete(&self, id: &str) -> AppResult<Value> {
        Ok(self
            .http
            .delete(&format!("/notifications/{}", id), None, RequestOptions::default())
            .await?)
    }

    pub async fn clear_all(&self) -> AppResult<Value> {
        Ok(self
            .http
            .delete("/notifications", None, RequestOptions::default())
            .await?)
    }

    /// 未读数量，载荷可能是数字或 `{count}`
    pub async fn unread_count(&self) -> AppResult<u64> {
        let payload = self
            .http
            .get("/notifications/unread-count", None, RequestOptions::quiet())
            .await?;
        let count = payload
            .as_u64()
            .or_else(|| payload.get("count").and_then(Value::as_u64))
            .unwrap_or(0);
        Ok(count)
    }
}
