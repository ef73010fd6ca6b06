use super::deserialize_id;
use chrono::{DateTime, Utc};
use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 通知类型的展示信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindInfo {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

static KIND_INFO: phf::Map<&'static str, KindInfo> = phf_map! {
    "system" => KindInfo { name: "系统通知", icon: "🔔", color: "#2196F3" },
    "exam" => KindInfo { name: "考试通知", icon: "📝", color: "#4CAF50" },
    "answer" => KindInfo { name: "答题反馈", icon: "✅", color: "#FF9800" },
    "warning" => KindInfo { name: "系统提醒", icon: "⚠️", color: "#FF5722" },
    "update" => KindInfo { name: "更新通知", icon: "🔄", color: "#9C27B0" },
    "reward" => KindInfo { name: "奖励通知", icon: "🎁", color: "#E91E63" },
};

/// 未知类型按系统通知展示
pub fn kind_info(kind: &str) -> KindInfo {
    KIND_INFO
        .get(kind)
        .or_else(|| KIND_INFO.get("system"))
        .copied()
        .unwrap_or(KindInfo {
            name: "系统通知",
            icon: "🔔",
            color: "#2196F3",
        })
}

/// 通知：来自服务器或本地创建
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_text: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub is_local: bool,
}

fn default_kind() -> String {
    "system".to_string()
}

fn default_priority() -> String {
    "normal".to_string()
}

impl Notification {
    /// `expires_at` 已到（含边界）
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|t| t <= now).unwrap_or(false)
    }

    pub fn kind_info(&self) -> KindInfo {
        kind_info(&self.kind)
    }
}

/// 本地通知的可选项
#[derive(Debug, Clone, Default)]
pub struct LocalNotificationOptions {
    pub expires_at: Option<DateTime<Utc>>,
    pub action_url: Option<String>,
    pub action_text: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_kind_falls_back_to_system() {
        assert_eq!(kind_info("reward").name, "奖励通知");
        assert_eq!(kind_info("mystery").name, "系统通知");
    }

    #[test]
    fn server_notification_with_numeric_id() {
        let n: Notification = serde_json::from_value(json!({
            "id": 12,
            "type": "exam",
            "title": "考核开始",
            "content": "本周考核已开放",
            "createdAt": "2026-10-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(n.id, "12");
        assert!(!n.is_local);
        assert_eq!(n.priority, "normal");
        assert!(!n.is_expired(Utc::now()));
    }
}
