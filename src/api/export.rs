//! 导出接口
//!
//! 只负责发起导出任务，载荷（下载地址等）原样返回。

use super::params;
use crate::error::AppResult;
use crate::infrastructure::{HttpClient, RequestOptions};
use serde_json::{json, Value};

#[derive(Clone)]
pub struct ExportApi {
    http: HttpClient,
}

impl ExportApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 导出答题记录，`overrides` 中的字段覆盖默认值
    pub async fn answers(&self, overrides: &Value) -> AppResult<Value> {
        let body = params::merge(
            json!({
                "format": "csv",
                "startDate": "",
                "endDate": "",
                "includeQuestions": true,
                "includeAnalysis": false,
                "includeStatistics": true
            }),
            overrides,
        );
        self.post("/export/answers", body).await
    }

    pub async fn exam_report(&self, exam_id: &str, overrides: &Value) -> AppResult<Value> {
        let body = params::merge(
            json!({
                "format": "pdf",
                "includeAnalysis": true,
                "includeLeaderboard": true,
                "includeRecommendations": true
            }),
            overrides,
        );
        self.post(&format!("/export/exam-report/{}", exam_id), body)
            .await
    }

    pub async fn user_stats(&self, format: Option<&str>, include_charts: bool) -> AppResult<Value> {
        let body = json!({
            "format": format.unwrap_or("pdf"),
            "includeCharts": include_charts,
            "includeProgress": true,
            "includeRecommendations": true
        });
        self.post("/export/user-stats", body).await
    }

    pub async fn questions(&self, overrides: &Value) -> AppResult<Value> {
        let body = params::merge(
            json!({
                "format": "excel",
                "includeAnswers": true,
                "includeStats": true,
                "batchSize": 500
            }),
            overrides,
        );
        self.post("/export/questions", body).await
    }

    pub async fn wrong_questions(&self, format: Option<&str>) -> AppResult<Value> {
        let body = json!({
            "format": format.unwrap_or("pdf"),
            "includeAnalysis": true,
            "includeCorrectAnswers": true,
            "includeCategoryStats": true
        });
        self.post("/export/wrong-questions", body).await
    }

    async fn post(&self, path: &str, body: Value) -> AppResult<Value> {
        Ok(self
            .http
            .post(path, &body, RequestOptions::default())
            .await?)
    }
}
