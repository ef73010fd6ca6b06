/// 本地存储清理
///
/// 两条规则：
/// - JSON 对象带 `_expiry`（毫秒时间戳）且已过期的键删除
/// - `cache_` / `temp_` 开头的键：`timestamp` 超过一周的删除，无法解析的直接删除
use crate::error::StorageError;
use crate::infrastructure::{Clock, Storage};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

const CACHE_PREFIXES: [&str; 2] = ["cache_", "temp_"];

#[derive(Clone)]
pub struct StorageCleaner {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl StorageCleaner {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// 执行一次清理
    ///
    /// # 返回
    /// 删除的键数
    pub fn cleanup(&self) -> Result<usize, StorageError> {
        let now = self.clock.now();
        let mut removed = 0;

        for key in self.storage.keys() {
            let Some(raw) = self.storage.get(&key) else {
                continue;
            };
            let parsed = serde_json::from_str::<Value>(&raw).ok();

            let expired = parsed.as_ref().is_some_and(|v| has_expired(v, now));
            if expired || is_stale_cache(&key, parsed.as_ref(), now) {
                self.storage.remove(&key)?;
                debug!("清除本地存储键 {}", key);
                removed += 1;
            }
        }

        if removed > 0 {
            info!("🧹 本地存储清理完成，删除 {} 个键", removed);
        }
        Ok(removed)
    }
}

fn has_expired(value: &Value, now: DateTime<Utc>) -> bool {
    value
        .get("_expiry")
        .and_then(Value::as_i64)
        .is_some_and(|expiry| expiry != 0 && expiry < now.timestamp_millis())
}

// 缓存键：解析失败直接删除；时间戳无法识别的保留
fn is_stale_cache(key: &str, value: Option<&Value>, now: DateTime<Utc>) -> bool {
    if !CACHE_PREFIXES.iter().any(|p| key.starts_with(p)) {
        return false;
    }
    let Some(value) = value else {
        return true;
    };
    match value.get("timestamp").and_then(timestamp_of) {
        Some(ts) => now - ts > Duration::weeks(1),
        None => false,
    }
}

/// 毫秒数或 RFC 3339 字符串
fn timestamp_of(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        _ => None,
    }
}
