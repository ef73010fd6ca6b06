use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端 API 地址（包含前缀）
    pub api_base_url: String,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 持久化存储文件（"记住我" 模式下的 token、用户信息、本地通知）
    pub storage_path: String,
    // --- 会话配置 ---
    /// 普通会话时长（小时）
    pub session_ttl_hours: i64,
    /// "记住我" 会话时长（天）
    pub remember_ttl_days: i64,
    /// 会话续期检查间隔（秒）
    pub session_check_interval_secs: u64,
    // --- 通知配置 ---
    /// 过期通知清理间隔（秒）
    pub notification_sweep_interval_secs: u64,
    // --- 本地存储清理 ---
    /// 启动后延迟多久开始清理（秒）
    pub startup_cleanup_delay_secs: u64,
    /// 之后的清理间隔（秒）
    pub storage_cleanup_interval_secs: u64,
    /// 本地通知最多保留条数
    pub local_notification_cap: usize,
    // --- 题库加载 ---
    pub question_page_size: u32,
    pub training_page_size: u32,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 日志过滤规则
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api".to_string(),
            request_timeout_secs: 15,
            storage_path: "doctor_exam_store.json".to_string(),
            session_ttl_hours: 24,
            remember_ttl_days: 30,
            session_check_interval_secs: 5 * 60,
            notification_sweep_interval_secs: 60 * 60,
            startup_cleanup_delay_secs: 10,
            storage_cleanup_interval_secs: 60 * 60,
            local_notification_cap: 50,
            question_page_size: 1000,
            training_page_size: 100,
            verbose_logging: false,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，缺失字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 读取 `DOCTOR_EXAM_CONFIG` 指向的配置文件（如果有），再叠加环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("DOCTOR_EXAM_CONFIG") {
            Ok(path) => Self::from_toml_file(path)?,
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(self.api_base_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            storage_path: std::env::var("STORAGE_PATH").unwrap_or(self.storage_path),
            session_ttl_hours: std::env::var("SESSION_TTL_HOURS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.session_ttl_hours),
            remember_ttl_days: std::env::var("REMEMBER_TTL_DAYS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.remember_ttl_days),
            session_check_interval_secs: std::env::var("SESSION_CHECK_INTERVAL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.session_check_interval_secs),
            notification_sweep_interval_secs: std::env::var("NOTIFICATION_SWEEP_INTERVAL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.notification_sweep_interval_secs),
            startup_cleanup_delay_secs: std::env::var("STARTUP_CLEANUP_DELAY_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.startup_cleanup_delay_secs),
            storage_cleanup_interval_secs: std::env::var("STORAGE_CLEANUP_INTERVAL_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.storage_cleanup_interval_secs),
            local_notification_cap: std::env::var("LOCAL_NOTIFICATION_CAP").ok().and_then(|v| v.parse().ok()).unwrap_or(self.local_notification_cap),
            question_page_size: std::env::var("QUESTION_PAGE_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.question_page_size),
            training_page_size: std::env::var("TRAINING_PAGE_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(self.training_page_size),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            log_filter: std::env::var("RUST_LOG").unwrap_or(self.log_filter),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_check_interval(&self) -> Duration {
        Duration::from_secs(self.session_check_interval_secs)
    }

    pub fn notification_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.notification_sweep_interval_secs)
    }

    pub fn startup_cleanup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_cleanup_delay_secs)
    }

    pub fn storage_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.storage_cleanup_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_missing_fields_fall_back_to_defaults() {
        let config = Config::from_toml_str(
            r#"
            api_base_url = "https://exam.example.com/api"
            remember_ttl_days = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://exam.example.com/api");
        assert_eq!(config.remember_ttl_days, 7);
        assert_eq!(config.session_ttl_hours, 24);
        assert_eq!(config.local_notification_cap, 50);
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = Config::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
