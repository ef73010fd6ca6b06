/// 会话监控
///
/// 定时续期，页面重新可见或网络恢复时重新校验令牌。
use super::auth_service::AuthService;
use crate::session::SessionStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct SessionMonitor {
    session: Arc<SessionStore>,
    auth: AuthService,
}

impl SessionMonitor {
    pub fn new(session: Arc<SessionStore>, auth: AuthService) -> Self {
        Self { session, auth }
    }

    /// 周期检查：已登录且未过期时延长会话，返回是否续期
    pub fn tick(&self) -> bool {
        if !self.session.is_logged_in() || self.session.is_session_expired() {
            return false;
        }
        match self.session.extend() {
            Ok(()) => {
                debug!("🔄 定时续期完成");
                true
            }
            Err(e) => {
                warn!("定时续期失败: {}", e);
                false
            }
        }
    }

    /// 页面重新可见；未登录时返回 `None`
    pub async fn on_visibility_regained(&self) -> Option<bool> {
        self.revalidate("页面重新可见").await
    }

    /// 网络恢复；未登录时返回 `None`
    pub async fn on_network_online(&self) -> Option<bool> {
        self.revalidate("网络恢复").await
    }

    async fn revalidate(&self, trigger: &str) -> Option<bool> {
        if !self.session.is_logged_in() {
            return None;
        }
        let valid = self.auth.validate_token().await;
        if !valid {
            info!("⚠️ {}时发现会话无效", trigger);
        }
        Some(valid)
    }
}
