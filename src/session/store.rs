//! 登录会话存储
//!
//! 会话数据写在两个存储里之一：勾选"记住我"时写持久存储（30 天），
//! 否则写标签页存储（24 小时）。读取时先查持久存储，再查标签页存储。

use super::events::AuthEvent;
use crate::config::Config;
use crate::error::{ConfigError, StorageError};
use crate::infrastructure::{Clock, Storage, StorageScope};
use crate::models::{StatusSummary, UserProfile};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// 存储键
pub mod keys {
    pub const TOKEN: &str = "auth_token";
    pub const USER_INFO: &str = "user_info";
    pub const REMEMBER_ME: &str = "remember_me";
    pub const LAST_LOGIN: &str = "last_login_time";
    pub const SESSION_EXPIRE: &str = "session_expire_time";

    pub const ALL: [&str; 5] = [TOKEN, USER_INFO, REMEMBER_ME, LAST_LOGIN, SESSION_EXPIRE];
}

/// 会话时长
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    pub session_ttl: Duration,
    pub remember_ttl: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            session_ttl: Duration::hours(24),
            remember_ttl: Duration::days(30),
        }
    }
}

impl SessionPolicy {
    /// 从配置读取会话时长，必须大于 0 且不超过十年
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let session_ttl = checked_ttl(
            "session_ttl_hours",
            config.session_ttl_hours,
            Duration::try_hours(config.session_ttl_hours),
        )?;
        let remember_ttl = checked_ttl(
            "remember_ttl_days",
            config.remember_ttl_days,
            Duration::try_days(config.remember_ttl_days),
        )?;
        Ok(Self {
            session_ttl,
            remember_ttl,
        })
    }

    pub fn ttl(&self, remember: bool) -> Duration {
        if remember {
            self.remember_ttl
        } else {
            self.session_ttl
        }
    }
}

const MAX_TTL_DAYS: i64 = 3650;

fn checked_ttl(
    field: &'static str,
    value: i64,
    ttl: Option<Duration>,
) -> Result<Duration, ConfigError> {
    ttl.filter(|ttl| *ttl > Duration::zero() && *ttl <= Duration::days(MAX_TTL_DAYS))
        .ok_or(ConfigError::OutOfRange { field, value })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
    /// 会话刚过期（只报告一次，之后回到 Anonymous）
    Expired,
}

pub struct SessionStore {
    durable: Arc<dyn Storage>,
    tab: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    policy: SessionPolicy,
    expired_pending: AtomicBool,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionStore {
    pub fn new(
        durable: Arc<dyn Storage>,
        tab: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        policy: SessionPolicy,
    ) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            durable,
            tab,
            clock,
            policy,
            expired_pending: AtomicBool::new(false),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// 广播事件（没有订阅方时静默丢弃）
    pub fn emit(&self, event: AuthEvent) {
        debug!("📣 认证事件: {}", event.name());
        let _ = self.events.send(event);
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    /// 保存登录数据
    ///
    /// 先清掉两个存储里的旧数据，避免上一次登录残留在另一个作用域里。
    pub fn save(&self, token: &str, profile: &UserProfile, remember: bool) -> Result<(), StorageError> {
        self.clear()?;

        let now = self.clock.now();
        let expire = now + self.policy.ttl(remember);
        let profile_json = serde_json::to_string(profile).map_err(|source| StorageError::Serde {
            key: keys::USER_INFO.to_string(),
            source,
        })?;

        let target = self.storage(scope_for(remember));
        target.set(keys::TOKEN, token)?;
        target.set(keys::USER_INFO, &profile_json)?;
        target.set(keys::LAST_LOGIN, &now.timestamp_millis().to_string())?;
        target.set(keys::SESSION_EXPIRE, &expire.timestamp_millis().to_string())?;

        if remember {
            self.durable.set(keys::REMEMBER_ME, "true")?;
        } else {
            self.durable.remove(keys::REMEMBER_ME)?;
        }

        self.expired_pending.store(false, Ordering::SeqCst);
        info!(
            "💾 登录数据已保存: {} (记住我: {}, 过期时间: {})",
            profile.username, remember, expire
        );
        Ok(())
    }

    /// 当前会话状态
    ///
    /// 数据在但已过期时会清掉数据并返回 `Expired`。
    pub fn state(&self) -> SessionState {
        if self.token().is_some() && self.profile().is_some() {
            if !self.is_session_expired() {
                return SessionState::Authenticated;
            }
            info!("⏰ 会话已过期，清除登录数据");
            if let Err(e) = self.clear() {
                warn!("清除过期会话失败: {}", e);
            }
            return SessionState::Expired;
        }

        if self.expired_pending.swap(false, Ordering::SeqCst) {
            SessionState::Expired
        } else {
            SessionState::Anonymous
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// 没有过期时间或当前时间 ≥ 过期时间
    pub fn is_session_expired(&self) -> bool {
        match self.expires_at() {
            Some(expire) => self.clock.now() >= expire,
            None => true,
        }
    }

    /// 滑动续期
    pub fn extend(&self) -> Result<(), StorageError> {
        if self.token().is_none() || self.profile().is_none() || self.is_session_expired() {
            return Ok(());
        }
        let remember = self.remembered();
        let expire = self.clock.now() + self.policy.ttl(remember);
        self.storage(scope_for(remember))
            .set(keys::SESSION_EXPIRE, &expire.timestamp_millis().to_string())?;
        debug!("🔄 会话已延长至 {}", expire);
        Ok(())
    }

    /// 服务端判定登录失效：清数据并广播
    pub fn expire(&self) {
        if let Err(e) = self.clear() {
            warn!("清除登录数据失败: {}", e);
        }
        self.expired_pending.store(true, Ordering::SeqCst);
        warn!("🔒 登录已过期");
        self.emit(AuthEvent::SessionExpired);
    }

    /// 清除两个存储里的全部会话键
    pub fn clear(&self) -> Result<(), StorageError> {
        for key in keys::ALL {
            self.durable.remove(key)?;
            self.tab.remove(key)?;
        }
        Ok(())
    }

    /// 浅合并更新用户信息
    pub fn update_profile(&self, patch: &Value) -> Result<UserProfile, StorageError> {
        let serde_err = |source: serde_json::Error| StorageError::Serde {
            key: keys::USER_INFO.to_string(),
            source,
        };

        let mut merged = match self.profile() {
            Some(profile) => serde_json::to_value(profile).map_err(serde_err)?,
            None => Value::Object(Default::default()),
        };
        if let (Value::Object(target), Value::Object(fields)) = (&mut merged, patch) {
            for (k, v) in fields {
                target.insert(k.clone(), v.clone());
            }
        }

        let profile: UserProfile = serde_json::from_value(merged).map_err(serde_err)?;
        let json = serde_json::to_string(&profile).map_err(serde_err)?;
        self.storage(scope_for(self.remembered()))
            .set(keys::USER_INFO, &json)?;
        Ok(profile)
    }

    pub fn token(&self) -> Option<String> {
        self.read(keys::TOKEN).filter(|t| !t.is_empty())
    }

    pub fn profile(&self) -> Option<UserProfile> {
        let raw = self.read(keys::USER_INFO)?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!("用户信息格式错误: {}", e);
                None
            }
        }
    }

    pub fn user_id(&self) -> Option<u64> {
        self.profile().and_then(|p| p.resolved_id())
    }

    pub fn username(&self) -> Option<String> {
        self.profile().map(|p| p.username)
    }

    pub fn is_admin(&self) -> bool {
        self.profile().map(|p| p.is_admin()).unwrap_or(false)
    }

    /// 未登录时没有任何权限
    pub fn has_permission(&self, permission: &str) -> bool {
        self.profile()
            .map(|p| p.has_permission(permission))
            .unwrap_or(false)
    }

    pub fn remembered(&self) -> bool {
        self.durable.get(keys::REMEMBER_ME).as_deref() == Some("true")
    }

    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        self.read(keys::LAST_LOGIN).and_then(|v| parse_millis(&v))
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.read(keys::SESSION_EXPIRE).and_then(|v| parse_millis(&v))
    }

    pub fn status_summary(&self) -> StatusSummary {
        let profile = self.profile();
        StatusSummary {
            is_logged_in: self.is_logged_in(),
            is_admin: self.is_admin(),
            username: profile.as_ref().map(|p| p.username.clone()),
            user_id: profile.as_ref().and_then(|p| p.resolved_id()),
            last_login: self.last_login(),
            session_expire: self.expires_at(),
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        self.durable.get(key).or_else(|| self.tab.get(key))
    }

    fn storage(&self, scope: StorageScope) -> &Arc<dyn Storage> {
        match scope {
            StorageScope::Durable => &self.durable,
            StorageScope::Tab => &self.tab,
        }
    }
}

fn scope_for(remember: bool) -> StorageScope {
    if remember {
        StorageScope::Durable
    } else {
        StorageScope::Tab
    }
}

fn parse_millis(value: &str) -> Option<DateTime<Utc>> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}
