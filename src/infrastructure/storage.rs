//! 本地存储端口 - 基础设施层
//!
//! 浏览器 localStorage / sessionStorage 的替身：字符串键、字符串值、同步访问。
//! - `MemoryStorage`：标签页级存储，也用于测试
//! - `FileStorage`：持久化存储，每次修改立即写回 JSON 文件

use crate::error::StorageError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// 存储位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// 持久化（"记住我"）
    Durable,
    /// 仅当前标签页
    Tab,
}

/// 键值存储端口
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
    /// 当前所有键（有序）
    fn keys(&self) -> Vec<String>;
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        entries.clear();
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default()
    }
}

/// 文件存储
///
/// 打开时整体读入，之后每次修改都把完整的键值表写回文件。
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    /// 打开（或新建）存储文件
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| StorageError::io(path.display().to_string(), e))?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|source| StorageError::Serde {
                    key: path.display().to_string(),
                    source,
                })?
            }
        } else {
            BTreeMap::new()
        };

        debug!("打开存储文件 {}，共 {} 个键", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Serde {
            key: self.path.display().to_string(),
            source,
        })?;
        std::fs::write(&self.path, content).map_err(|e| {
            warn!("写入存储文件失败: {}", e);
            StorageError::io(self.path.display().to_string(), e)
        })
    }

    // 先把修改后的副本写入文件，成功后才替换内存里的表
    fn mutate(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Poisoned(e.to_string()))?;
        let mut next = entries.clone();
        f(&mut next);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.mutate(|entries| entries.clear())
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|e| e.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        storage.set("auth_token", "abc").unwrap();
        assert_eq!(storage.get("auth_token").as_deref(), Some("abc"));

        storage.remove("auth_token").unwrap();
        assert!(storage.get("auth_token").is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        {
            let storage = FileStorage::open(&path).unwrap();
            storage.set("remember_me", "true").unwrap();
            storage.set("auth_token", "t-1").unwrap();
        }

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("remember_me").as_deref(), Some("true"));
        assert_eq!(reopened.get("auth_token").as_deref(), Some("t-1"));

        reopened.clear().unwrap();
        let again = FileStorage::open(&path).unwrap();
        assert!(again.get("auth_token").is_none());
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let storage = FileStorage::open(&path).unwrap();
        storage.set("auth_token", "t-1").unwrap();

        // 存储文件所在目录被删掉后写入必然失败
        drop(dir);
        assert!(matches!(
            storage.set("auth_token", "t-2"),
            Err(StorageError::Io { .. })
        ));
        assert_eq!(storage.get("auth_token").as_deref(), Some("t-1"));
        assert!(storage.remove("auth_token").is_err());
        assert_eq!(storage.keys(), vec!["auth_token".to_string()]);
    }

    #[test]
    fn keys_are_sorted() {
        let storage = MemoryStorage::new();
        storage.set("temp_b", "1").unwrap();
        storage.set("cache_a", "2").unwrap();
        assert_eq!(storage.keys(), vec!["cache_a".to_string(), "temp_b".to_string()]);
    }

    #[test]
    fn file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            FileStorage::open(&path),
            Err(StorageError::Serde { .. })
        ));
    }
}
