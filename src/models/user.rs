use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 登录用户信息
///
/// 后端字段不固定，未声明的字段保存在 `extra` 里，合并更新时不丢失。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            username: username.into(),
            ..Default::default()
        }
    }

    /// `id`，缺失时取 `userId`
    pub fn resolved_id(&self) -> Option<u64> {
        self.id.or(self.user_id)
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin || self.role.as_deref() == Some("admin")
    }

    /// 管理员拥有全部权限
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_admin() || self.permissions.iter().any(|p| p == permission)
    }
}

/// 登录接口返回
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// 注册接口返回
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
}

/// 认证操作结果（失败不抛出，折叠成值）
#[derive(Debug, Clone, PartialEq)]
pub struct AuthOutcome {
    pub success: bool,
    pub message: String,
    pub user: Option<UserProfile>,
    pub is_admin: bool,
}

impl AuthOutcome {
    pub fn ok(message: impl Into<String>, user: Option<UserProfile>) -> Self {
        let is_admin = user.as_ref().map(UserProfile::is_admin).unwrap_or(false);
        Self {
            success: true,
            message: message.into(),
            user,
            is_admin,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            user: None,
            is_admin: false,
        }
    }
}

/// 登录状态摘要
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub is_logged_in: bool,
    pub is_admin: bool,
    pub username: Option<String>,
    pub user_id: Option<u64>,
    pub last_login: Option<DateTime<Utc>>,
    pub session_expire: Option<DateTime<Utc>>,
}

/// 管理端用户列表查询
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}
