pub mod answer;
pub mod exam;
pub mod notification;
pub mod question;
pub mod stats;
pub mod user;

pub use answer::{AnswerHistory, AnswerRecord, AnswerSource, AnswerSubmission, HistoryQuery, WrongQuery};
pub use exam::{
    ExamAnswer, ExamHistory, ExamPaper, ExamRequest, ExamResult, ExamStats, ExamSubmission,
    ExamSummary, LeaderboardEntry,
};
pub use notification::{kind_info, KindInfo, LocalNotificationOptions, Notification, NotificationQuery};
pub use question::{Difficulty, DisplayQuestion, Question, QuestionDraft, QuestionQuery, QuestionStats, QuestionType};
pub use stats::{Feedback, HealthStatus, IssueReport, UserStats};
pub use user::{AuthOutcome, LoginResponse, RegisterResponse, StatusSummary, UserProfile, UserQuery};

use serde::de::DeserializeOwned;
use serde_json::Value;

/// 从列表载荷中取出元素
///
/// 后端有时直接返回数组，有时包成 `{<key>: [...]}`，两种都接受；
/// 其它形状视为空列表。
pub fn list_from_payload<T: DeserializeOwned>(
    payload: Value,
    key: &str,
) -> Result<Vec<T>, serde_json::Error> {
    match payload {
        Value::Array(_) => serde_json::from_value(payload),
        Value::Object(mut map) => match map.remove(key) {
            Some(list @ Value::Array(_)) => serde_json::from_value(list),
            _ => Ok(Vec::new()),
        },
        _ => Ok(Vec::new()),
    }
}

// ID 字段可能是字符串也可能是数字，统一转成字符串
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_payload_accepts_bare_or_wrapped() {
        let bare: Vec<u32> = list_from_payload(json!([1, 2]), "questions").unwrap();
        let wrapped: Vec<u32> =
            list_from_payload(json!({"questions": [3], "total": 1}), "questions").unwrap();
        let other: Vec<u32> = list_from_payload(json!({"total": 0}), "questions").unwrap();
        assert_eq!(bare, vec![1, 2]);
        assert_eq!(wrapped, vec![3]);
        assert!(other.is_empty());
    }
}
