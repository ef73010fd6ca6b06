//! 考试接口

use super::params;
use crate::error::{ApiError, AppResult};
use crate::infrastructure::{HttpClient, RequestOptions};
use crate::models::{
    list_from_payload, ExamAnswer, ExamHistory, ExamPaper, ExamRequest, ExamResult,
    ExamSubmission, LeaderboardEntry,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

/// 用户排行榜查询，默认 accuracy / 10 条
#[derive(Debug, Clone, Default, Serialize)]
pub struct LeaderboardQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Clone)]
pub struct ExamApi {
    http: HttpClient,
}

impl ExamApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 生成试卷，默认 full / 25 题 / 900 秒
    pub async fn generate(&self, request: &ExamRequest) -> AppResult<ExamPaper> {
        let paper: ExamPaper = self
            .http
            .post_as("/exams/generate", request, RequestOptions::default())
            .await?;
        info!(
            "📝 试卷已生成: {} ({} 题)",
            paper.exam_id,
            paper.questions.len()
        );
        Ok(paper)
    }

    pub async fn submit(&self, exam_id: &str, answers: Vec<ExamAnswer>) -> AppResult<ExamResult> {
        let submission = ExamSubmission {
            answers,
            submit_time: self.http.session().now(),
        };
        Ok(self
            .http
            .post_as(
                &format!("/exams/{}/submit", exam_id),
                &submission,
                RequestOptions::default(),
            )
            .await?)
    }

    pub async fn history(&self, query: &PageQuery) -> AppResult<ExamHistory> {
        let query = params::merge(json!({"page": 1, "size": 10}), query);
        Ok(self
            .http
            .get_as("/exams/history", Some(query), RequestOptions::default())
            .await?)
    }

    pub async fn result(&self, exam_id: &str) -> AppResult<Value> {
        Ok(self
            .http
            .get(&format!("/exams/{}", exam_id), None, RequestOptions::default())
            .await?)
    }

    pub async fn leaderboard(&self, kind: &str, limit: u32) -> AppResult<Vec<LeaderboardEntry>> {
        let payload = self
            .http
            .get(
                "/exams/leaderboard",
                Some(json!({ "type": kind, "limit": limit })),
                RequestOptions::default(),
            )
            .await?;
        let entries = list_from_payload(payload, "leaderboard").map_err(|source| ApiError::Decode {
            endpoint: "/exams/leaderboard".to_string(),
            source,
        })?;
        Ok(entries)
    }

    /// 用户排行榜（正确率等维度），载荷原样返回
    pub async fn user_leaderboard(&self, query: &LeaderboardQuery) -> AppResult<Value> {
        let query = params::merge(json!({ "type": "accuracy", "limit": 10 }), query);
        Ok(self
            .http
            .get("/user/leaderboard", Some(query), RequestOptions::default())
            .await?)
    }
}
