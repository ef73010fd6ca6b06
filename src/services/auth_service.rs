/// 认证服务
///
/// 面向界面的登录、注册、退出、令牌校验。所有失败都折叠成 `AuthOutcome`，不向上抛出。
use crate::api::AuthApi;
use crate::models::{AuthOutcome, StatusSummary, UserProfile};
use crate::session::{AuthEvent, SessionStore};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AuthService {
    api: AuthApi,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: AuthApi, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// 用户登录
    ///
    /// # 参数
    /// - `username`: 用户名
    /// - `password`: 密码
    /// - `remember`: 是否记住我（30 天）
    ///
    /// # 返回
    /// 登录结果；成功时会话已保存并广播 `LoginSuccess`
    pub async fn login(&self, username: &str, password: &str, remember: bool) -> AuthOutcome {
        info!("🔑 用户登录: {}, 记住我: {}", username, remember);

        if username.is_empty() || password.is_empty() {
            return AuthOutcome::failed("用户名和密码不能为空");
        }

        let response = match self.api.login(username, password).await {
            Ok(response) => response,
            Err(e) => {
                warn!("登录失败: {}", e);
                return AuthOutcome::failed(e.user_message());
            }
        };

        let token = match response.token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => return AuthOutcome::failed("登录失败：服务器返回格式异常"),
        };
        let user = response.user.unwrap_or_else(|| UserProfile {
            username: username.to_string(),
            ..Default::default()
        });

        if let Err(e) = self.session.save(&token, &user, remember) {
            warn!("保存登录数据失败: {}", e);
            return AuthOutcome::failed(e.to_string());
        }

        self.session.emit(AuthEvent::LoginSuccess(user.clone()));
        info!("✅ 登录成功: {}", user.username);
        AuthOutcome::ok("登录成功", Some(user))
    }

    /// 用户注册
    ///
    /// 本地先校验：用户名至少 3 个字符，密码至少 6 个字符，两次密码一致。
    pub async fn register(&self, username: &str, password: &str, confirm: &str) -> AuthOutcome {
        info!("📝 用户注册: {}", username);

        if let Err(message) = validate_registration(username, password, confirm) {
            return AuthOutcome::failed(message);
        }

        match self.api.register(username, password).await {
            Ok(response) => {
                self.session
                    .emit(AuthEvent::RegisterSuccess(username.to_string()));
                let message = response.message.unwrap_or_else(|| "注册成功".to_string());
                AuthOutcome::ok(message, None)
            }
            Err(e) => {
                warn!("注册失败: {}", e);
                AuthOutcome::failed(e.user_message())
            }
        }
    }

    /// 注册成功后直接登录
    pub async fn register_and_login(
        &self,
        username: &str,
        password: &str,
        confirm: &str,
        remember: bool,
    ) -> AuthOutcome {
        let registered = self.register(username, password, confirm).await;
        if !registered.success {
            return registered;
        }
        self.login(username, password, remember).await
    }

    /// 退出登录：后端调用失败只记日志，本地数据总会清除
    pub async fn logout(&self) -> AuthOutcome {
        info!("👋 用户退出登录");
        self.session.emit(AuthEvent::BeforeLogout);

        if self.session.token().is_some() {
            if let Err(e) = self.api.logout().await {
                warn!("调用退出接口失败，继续清除本地数据: {}", e);
            }
        }

        if let Err(e) = self.session.clear() {
            warn!("清除登录数据失败: {}", e);
        }

        self.session.emit(AuthEvent::LogoutSuccess);
        AuthOutcome::ok("退出成功", None)
    }

    /// 校验令牌，成功时用后端返回的信息更新本地用户信息
    pub async fn validate_token(&self) -> bool {
        if self.session.token().is_none() {
            return false;
        }
        if self.session.is_session_expired() {
            info!("⏰ 会话已过期");
            return false;
        }

        match self.api.profile().await {
            Ok(profile) => match serde_json::to_value(&profile) {
                Ok(patch) => match self.session.update_profile(&patch) {
                    Ok(_) => true,
                    Err(e) => {
                        warn!("更新用户信息失败: {}", e);
                        true
                    }
                },
                Err(e) => {
                    warn!("用户信息序列化失败: {}", e);
                    true
                }
            },
            Err(e) => {
                warn!("验证令牌失败: {}", e);
                if e.is_unauthorized() {
                    if let Err(e) = self.session.clear() {
                        warn!("清除登录数据失败: {}", e);
                    }
                }
                false
            }
        }
    }

    pub fn check_login_status(&self) -> StatusSummary {
        self.session.status_summary()
    }

    /// 刷新令牌；后端返回新 token 时替换，保留原来的"记住我"选择
    pub async fn refresh_token(&self) -> AuthOutcome {
        let token = match self.session.token() {
            Some(token) => token,
            None => return AuthOutcome::failed("没有可刷新的令牌"),
        };

        match self.api.refresh(&token).await {
            Ok(payload) => {
                let new_token = payload.get("token").and_then(|t| t.as_str());
                if let (Some(new_token), Some(profile)) = (new_token, self.session.profile()) {
                    let remember = self.session.remembered();
                    if let Err(e) = self.session.save(new_token, &profile, remember) {
                        warn!("保存新令牌失败: {}", e);
                        return AuthOutcome::failed(e.to_string());
                    }
                }
                AuthOutcome::ok("令牌刷新成功", self.session.profile())
            }
            Err(e) => {
                warn!("刷新令牌失败: {}", e);
                AuthOutcome::failed(e.user_message())
            }
        }
    }

    /// 重置密码，邮箱为空时不请求后端
    pub async fn reset_password(&self, email: &str) -> AuthOutcome {
        let email = email.trim();
        info!("🔐 重置密码请求: {}", email);
        if email.is_empty() {
            return AuthOutcome::failed("请输入邮箱地址");
        }

        match self.api.reset_password(email).await {
            Ok(_) => AuthOutcome::ok("重置密码链接已发送到您的邮箱", None),
            Err(e) => {
                warn!("重置密码失败: {}", e);
                AuthOutcome::failed(e.user_message())
            }
        }
    }
}

/// 注册参数校验，返回第一条错误文案
pub fn validate_registration(username: &str, password: &str, confirm: &str) -> Result<(), String> {
    if username.is_empty() || password.is_empty() {
        return Err("用户名和密码不能为空".to_string());
    }
    if username.chars().count() < 3 {
        return Err("用户名至少需要3个字符".to_string());
    }
    if password.chars().count() < 6 {
        return Err("密码至少需要6个字符".to_string());
    }
    if password != confirm {
        return Err("两次输入的密码不一致".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_rules() {
        assert_eq!(
            validate_registration("ab", "123456", "123456").unwrap_err(),
            "用户名至少需要3个字符"
        );
        assert_eq!(
            validate_registration("abc", "12345", "12345").unwrap_err(),
            "密码至少需要6个字符"
        );
        assert_eq!(
            validate_registration("abc", "123456", "654321").unwrap_err(),
            "两次输入的密码不一致"
        );
        assert!(validate_registration("阿米娅", "123456", "123456").is_ok());
    }
}
