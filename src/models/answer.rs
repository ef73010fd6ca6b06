use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 答题来源：题库 / 入职培训
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Normal,
    Training,
}

/// 提交到后端的单题答案
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub question_id: u32,
    pub question_type: AnswerSource,
    pub selected_option: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_id: Option<String>,
}

/// 本地答题记录，创建后不再修改
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub question_id: u32,
    pub source: AnswerSource,
    pub selected_option: u8,
    pub correct: bool,
    pub answered_at: DateTime<Utc>,
}

/// 后端答题历史中的一条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub question_id: u32,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub selected_option: Option<u8>,
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub answered_at: Option<String>,
}

/// 答题历史 / 错题本分页结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerHistory {
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl AnswerHistory {
    /// 答错的题目 ID，保持返回顺序
    pub fn wrong_ids(&self) -> Vec<u32> {
        self.history
            .iter()
            .filter(|r| !r.is_correct)
            .map(|r| r.question_id)
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_type: Option<AnswerSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_type: Option<AnswerSource>,
}
