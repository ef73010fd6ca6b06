use super::{deserialize_id, Question};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 生成试卷的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamRequest {
    #[serde(rename = "type")]
    pub kind: String,
    pub question_count: u32,
    /// 秒
    pub time_limit: u64,
}

impl Default for ExamRequest {
    fn default() -> Self {
        Self {
            kind: "full".to_string(),
            question_count: 25,
            time_limit: 900,
        }
    }
}

/// 后端生成的试卷
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPaper {
    #[serde(deserialize_with = "deserialize_id")]
    pub exam_id: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub time_limit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamAnswer {
    pub question_id: u32,
    pub selected_option: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSubmission {
    pub answers: Vec<ExamAnswer>,
    pub submit_time: DateTime<Utc>,
}

/// 交卷结果
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub correct_count: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 考试历史中的一场
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub exam_id: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamHistory {
    #[serde(default)]
    pub exams: Vec<ExamSummary>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// 考试统计：参加次数与平均分
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamStats {
    pub total_attempts: u64,
    pub average_score: f64,
}

impl ExamStats {
    /// 次数取 `total`（缺失时用列表长度），缺分数按 0 计
    pub fn from_history(history: &ExamHistory) -> Self {
        let total_attempts = history
            .total
            .filter(|t| *t > 0)
            .unwrap_or(history.exams.len() as u64);
        let total_score: f64 = history.exams.iter().map(|e| e.score.unwrap_or(0.0)).sum();
        let average_score = if total_attempts > 0 {
            total_score / total_attempts as f64
        } else {
            0.0
        };
        Self {
            total_attempts,
            average_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub rank: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn exam_id_accepts_number_or_string() {
        let a: ExamPaper = serde_json::from_value(json!({"examId": 42, "questions": []})).unwrap();
        let b: ExamPaper =
            serde_json::from_value(json!({"examId": "e-42", "questions": []})).unwrap();
        assert_eq!(a.exam_id, "42");
        assert_eq!(b.exam_id, "e-42");
    }

    #[test]
    fn stats_average_over_reported_total() {
        let history: ExamHistory = serde_json::from_value(json!({
            "exams": [{"examId": 1, "score": 80}, {"examId": 2, "score": 60}, {"examId": 3}],
            "total": 3
        }))
        .unwrap();
        let stats = ExamStats::from_history(&history);
        assert_eq!(stats.total_attempts, 3);
        assert!((stats.average_score - 140.0 / 3.0).abs() < 1e-9);

        assert_eq!(ExamStats::from_history(&ExamHistory::default()), ExamStats::default());
    }
}
