use crate::models::UserProfile;

/// 认证事件，登录状态变化时广播给订阅方
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    LoginSuccess(UserProfile),
    /// 注册成功的用户名
    RegisterSuccess(String),
    BeforeLogout,
    LogoutSuccess,
    SessionExpired,
}

impl AuthEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::LoginSuccess(_) => "loginSuccess",
            AuthEvent::RegisterSuccess(_) => "registerSuccess",
            AuthEvent::BeforeLogout => "beforeLogout",
            AuthEvent::LogoutSuccess => "logoutSuccess",
            AuthEvent::SessionExpired => "sessionExpired",
        }
    }
}
