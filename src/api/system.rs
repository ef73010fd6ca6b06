//! 系统工具接口

use super::params;
use crate::error::AppResult;
use crate::infrastructure::{HttpClient, RequestOptions};
use crate::models::{Feedback, HealthStatus, IssueReport};
use serde_json::{json, Value};
use tracing::{info, warn};

#[derive(Clone)]
pub struct SystemApi {
    http: HttpClient,
}

impl SystemApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 健康检查，失败时返回 `DOWN` 而不是错误
    pub async fn health(&self) -> HealthStatus {
        match self
            .http
            .get_as::<HealthStatus>("/health", None, RequestOptions::quiet())
            .await
        {
            Ok(status) => {
                info!("💚 服务健康状态: {}", status.status);
                status
            }
            Err(e) => {
                warn!("健康检查失败: {}", e);
                HealthStatus::down(e.user_message())
            }
        }
    }

    pub async fn info(&self) -> AppResult<Value> {
        Ok(self
            .http
            .get("/system/info", None, RequestOptions::quiet())
            .await?)
    }

    pub async fn check_for_updates(&self) -> AppResult<Value> {
        Ok(self
            .http
            .get("/system/updates/check", None, RequestOptions::quiet())
            .await?)
    }

    /// 公开的系统配置（无需登录）
    pub async fn public_config(&self) -> AppResult<Value> {
        Ok(self
            .http
            .get("/system/config", None, RequestOptions::quiet())
            .await?)
    }

    pub async fn server_time(&self) -> AppResult<Value> {
        Ok(self
            .http
            .get("/system/time", None, RequestOptions::quiet())
            .await?)
    }

    pub async fn feedback(&self, feedback: &Feedback) -> AppResult<Value> {
        Ok(self
            .http
            .post("/system/feedback", feedback, RequestOptions::default())
            .await?)
    }

    pub async fn report_issue(&self, report: &IssueReport) -> AppResult<Value> {
        let body = params::merge(
            json!({ "severity": "medium", "steps": [], "attachments": [] }),
            report,
        );
        info!("🐞 报告问题: {}", report.title);
        Ok(self
            .http
            .post("/system/issues", &body, RequestOptions::default())
            .await?)
    }
}
