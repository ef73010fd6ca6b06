//! 题目接口：题库与入职培训两套 CRUD

use super::params;
use crate::error::{ApiError, AppResult};
use crate::infrastructure::{HttpClient, RequestOptions};
use crate::models::{list_from_payload, Question, QuestionDraft, QuestionQuery};
use serde_json::{json, Value};
use tracing::debug;

#[derive(Clone)]
pub struct QuestionApi {
    http: HttpClient,
}

impl QuestionApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// 题目列表（不显示全局加载）
    pub async fn list(&self, query: &QuestionQuery) -> AppResult<Vec<Question>> {
        let query = params::merge(
            json!({"page": 1, "size": 20, "keyword": "", "includeAnalysis": false}),
            query,
        );
        let payload = self
            .http
            .get("/questions", Some(query), RequestOptions::quiet())
            .await?;
        let questions = decode_list(&self.http, "/questions", payload)?;
        debug!("📚 获取题目 {} 道", questions.len());
        Ok(questions)
    }

    pub async fn get(&self, id: u32, include_analysis: bool) -> AppResult<Question> {
        let path = format!("/questions/{}", id);
        Ok(self
            .http
            .get_as(
                &path,
                Some(json!({ "includeAnalysis": include_analysis })),
                RequestOptions::default(),
            )
            .await?)
    }

    pub async fn search(&self, keyword: &str) -> AppResult<Vec<Question>> {
        let payload = self
            .http
            .get(
                "/questions/search",
                Some(json!({ "keyword": keyword })),
                RequestOptions::default(),
            )
            .await?;
        decode_list(&self.http, "/questions/search", payload)
    }

    pub async fn create(&self, draft: &QuestionDraft) -> AppResult<Value> {
        draft.validate()?;
        let draft = draft.clone().normalized_for_submit();
        Ok(self
            .http
            .post("/questions", &draft, RequestOptions::default())
            .await?)
    }

    pub async fn update(&self, id: u32, draft: &QuestionDraft) -> AppResult<Value> {
        draft.validate()?;
        let draft = draft.clone().normalized_for_submit();
        Ok(self
            .http
            .put(&format!("/questions/{}", id), &draft, RequestOptions::default())
            .await?)
    }

    pub async fn delete(&self, id: u32) -> AppResult<Value> {
        Ok(self
            .http
            .delete(&format!("/questions/{}", id), None, RequestOptions::default())
            .await?)
    }
}

#[derive(Clone)]
pub struct TrainingApi {
    http: HttpClient,
}

impl TrainingApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &QuestionQuery) -> AppResult<Vec<Question>> {
        let query = params::merge(
            json!({"page": 1, "size": 20, "keyword": "", "includeAnalysis": false}),
            query,
        );
        let payload = self
            .http
            .get("/training/questions", Some(query), RequestOptions::default())
            .await?;
        let questions = decode_list(&self.http, "/training/questions", payload)?;
        debug!("🎓 获取培训题目 {} 道", questions.len());
        Ok(questions)
    }

    pub async fn get(&self, id: u32, include_analysis: bool) -> AppResult<Question> {
        let path = format!("/training/questions/{}", id);
        Ok(self
            .http
            .get_as(
                &path,
                Some(json!({ "includeAnalysis": include_analysis })),
                RequestOptions::default(),
            )
            .await?)
    }

    pub async fn create(&self, draft: &QuestionDraft) -> AppResult<Value> {
        draft.validate()?;
        let draft = draft.clone().normalized_for_submit();
        Ok(self
            .http
            .post("/training/questions", &draft, RequestOptions::default())
            .await?)
    }

    pub async fn update(&self, id: u32, draft: &QuestionDraft) -> AppResult<Value> {
        draft.validate()?;
        let draft = draft.clone().normalized_for_submit();
        Ok(self
            .http
            .put(
                &format!("/training/questions/{}", id),
                &draft,
                RequestOptions::default(),
            )
            .await?)
    }

    pub async fn delete(&self, id: u32) -> AppResult<Value> {
        Ok(self
            .http
            .delete(
                &format!("/training/questions/{}", id),
                None,
                RequestOptions::default(),
            )
            .await?)
    }
}

/// 列表载荷：`{questions: [...]}` 或直接数组
fn decode_list(http: &HttpClient, path: &str, payload: Value) -> AppResult<Vec<Question>> {
    list_from_payload(payload, "questions").map_err(|source| {
        let err = ApiError::Decode {
            endpoint: path.to_string(),
            source,
        };
        http.toasts().error(err.user_message());
        err.into()
    })
}
