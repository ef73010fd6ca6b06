/// 通知服务
///
/// 服务器通知与本地通知两种来源。本地通知存在持久存储里，最新的在前，
/// 超过上限时丢弃最旧的；展示时与服务器通知按 ID 去重合并。
use crate::api::NotificationApi;
use crate::error::{AppResult, StorageError};
use crate::infrastructure::{Clock, Storage};
use crate::models::{LocalNotificationOptions, Notification, NotificationQuery};
use chrono::{DateTime, Local, Utc};
use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 本地通知的存储键
pub const LOCAL_NOTIFICATIONS_KEY: &str = "local_notifications";

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Clone)]
pub struct NotificationService {
    api: NotificationApi,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    cap: usize,
}

impl NotificationService {
    pub fn new(
        api: NotificationApi,
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        cap: usize,
    ) -> Self {
        Self {
            api,
            storage,
            clock,
            cap,
        }
    }

    /// 创建本地通知
    ///
    /// # 参数
    /// - `title`: 标题
    /// - `content`: 内容
    /// - `kind`: 类型（system / exam / answer / warning / update / reward）
    /// - `options`: 过期时间、跳转链接等
    ///
    /// # 返回
    /// 新建的通知（已写入存储）
    pub fn create_local(
        &self,
        title: &str,
        content: &str,
        kind: &str,
        options: LocalNotificationOptions,
    ) -> Result<Notification, StorageError> {
        let now = self.clock.now();
        let notification = Notification {
            id: local_id(now, &mut rand::thread_rng()),
            kind: kind.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            is_read: false,
            created_at: now,
            expires_at: options.expires_at,
            action_url: options.action_url,
            action_text: options.action_text,
            priority: options.priority.unwrap_or_else(|| "normal".to_string()),
            is_local: true,
        };

        let mut all = self.local();
        all.insert(0, notification.clone());
        all.truncate(self.cap);
        self.write_local(&all)?;

        info!("🔔 本地通知: {}", title);
        Ok(notification)
    }

    /// 本地通知（读取失败时为空）
    pub fn local(&self) -> Vec<Notification> {
        let raw = match self.storage.get(LOCAL_NOTIFICATIONS_KEY) {
            Some(raw) => raw,
            None => return Vec::new(),
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("获取本地通知失败: {}", e);
            Vec::new()
        })
    }

    /// 清除已过期的本地通知，返回清除条数
    pub fn sweep_expired(&self) -> Result<usize, StorageError> {
        let now = self.clock.now();
        let all = self.local();
        let before = all.len();
        let valid: Vec<Notification> = all.into_iter().filter(|n| !n.is_expired(now)).collect();
        let removed = before - valid.len();
        if removed > 0 {
            self.write_local(&valid)?;
            debug!("🧹 清除过期通知 {} 条", removed);
        }
        Ok(removed)
    }

    /// 服务器通知 + 本地通知，按 ID 去重
    pub async fn fetch_merged(&self, query: &NotificationQuery) -> AppResult<Vec<Notification>> {
        let server = self.api.list(query).await?;
        Ok(merge(server, self.local()))
    }

    /// 标记已读：本地通知改存储，服务器通知调接口
    pub async fn mark_read(&self, id: &str) -> AppResult<()> {
        if id.starts_with("local_") {
            let mut all = self.local();
            for n in all.iter_mut().filter(|n| n.id == id) {
                n.is_read = true;
            }
            self.write_local(&all)?;
        } else {
            self.api.mark_read(id).await?;
        }
        Ok(())
    }

    pub fn remove_local(&self, id: &str) -> Result<bool, StorageError> {
        let mut all = self.local();
        let before = all.len();
        all.retain(|n| n.id != id);
        let removed = all.len() != before;
        if removed {
            self.write_local(&all)?;
        }
        Ok(removed)
    }

    pub fn format_time(&self, ts: DateTime<Utc>) -> String {
        format_time(ts, self.clock.now())
    }

    fn write_local(&self, notifications: &[Notification]) -> Result<(), StorageError> {
        let json = serde_json::to_string(notifications).map_err(|source| StorageError::Serde {
            key: LOCAL_NOTIFICATIONS_KEY.to_string(),
            source,
        })?;
        self.storage.set(LOCAL_NOTIFICATIONS_KEY, &json)
    }
}

/// `local_<毫秒>_<9 位 base36>`
pub fn local_id<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..9)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("local_{}_{}", now.timestamp_millis(), suffix)
}

/// 合并通知：服务器优先，同 ID 的本地通知丢弃，按创建时间倒序
pub fn merge(server: Vec<Notification>, local: Vec<Notification>) -> Vec<Notification> {
    let server_ids: HashSet<String> = server.iter().map(|n| n.id.clone()).collect();
    let mut all = server;
    all.extend(local.into_iter().filter(|n| !server_ids.contains(&n.id)));
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    all
}

/// 相对时间：刚刚 / N分钟前 / N小时前 / N天前，一周以上显示 MM-DD
pub fn format_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now - ts;
    let minutes = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if minutes < 1 {
        "刚刚".to_string()
    } else if minutes < 60 {
        format!("{}分钟前", minutes)
    } else if hours < 24 {
        format!("{}小时前", hours)
    } else if days < 7 {
        format!("{}天前", days)
    } else {
        ts.with_timezone(&Local).format("%m-%d").to_string()
    }
}

/// 通知正文：换行转 `<br>`，按类型强调关键词
pub fn format_content(content: &str, kind: &str) -> String {
    let formatted = content.replace('\n', "<br>");
    match kind {
        "exam" => emphasize(&formatted, &["考试", "成绩", "分数", "排名"], "<strong>"),
        "reward" => emphasize(
            &formatted,
            &["奖励", "积分", "勋章", "成就"],
            "<strong class=\"text-reward\">",
        ),
        "warning" => format!("<span class=\"text-warning\">{}</span>", formatted),
        _ => formatted,
    }
}

fn emphasize(text: &str, words: &[&str], open: &str) -> String {
    words.iter().fold(text.to_string(), |acc, word| {
        acc.replace(word, &format!("{}{}</strong>", open, word))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn notification(id: &str, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: id.to_string(),
            kind: "system".to_string(),
            title: String::new(),
            content: String::new(),
            is_read: false,
            created_at,
            expires_at: None,
            action_url: None,
            action_text: None,
            priority: "normal".to_string(),
            is_local: false,
        }
    }

    #[test]
    fn local_id_shape() {
        let now = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let id = local_id(now, &mut StdRng::seed_from_u64(7));
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts[0], "local");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2].bytes().all(|b| ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn merge_dedupes_by_id_and_sorts_newest_first() {
        let t0 = Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap();
        let mut server_copy = notification("n1", t0);
        server_copy.title = "server".to_string();
        let mut local_copy = notification("n1", t0);
        local_copy.title = "local".to_string();

        let merged = merge(
            vec![server_copy, notification("n2", t0 + Duration::hours(1))],
            vec![local_copy, notification("local_1", t0 + Duration::hours(2))],
        );

        let ids: Vec<&str> = merged.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["local_1", "n2", "n1"]);
        assert_eq!(merged[2].title, "server");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 3, 20, 12, 0, 0).unwrap();
        assert_eq!(format_time(now - Duration::seconds(30), now), "刚刚");
        assert_eq!(format_time(now - Duration::minutes(5), now), "5分钟前");
        assert_eq!(format_time(now - Duration::hours(3), now), "3小时前");
        assert_eq!(format_time(now - Duration::days(2), now), "2天前");
        let old = Utc.with_ymd_and_hms(2026, 3, 5, 12, 0, 0).unwrap();
        assert_eq!(format_time(old, now), "03-05");
    }

    #[test]
    fn content_emphasis_by_kind() {
        assert_eq!(
            format_content("考试开始\n加油", "exam"),
            "<strong>考试</strong>开始<br>加油"
        );
        assert_eq!(
            format_content("注意", "warning"),
            "<span class=\"text-warning\">注意</span>"
        );
    }
}
