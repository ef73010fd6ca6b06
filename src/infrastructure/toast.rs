//! 消息提示
//!
//! 短暂显示给用户的错误/成功/提示消息，由界面层取走渲染。

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// 最多缓存的提示条数
const MAX_PENDING: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Error,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Toasts {
    pending: Arc<Mutex<VecDeque<Toast>>>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: ToastLevel, message: impl Into<String>) {
        if let Ok(mut pending) = self.pending.lock() {
            if pending.len() == MAX_PENDING {
                pending.pop_front();
            }
            pending.push_back(Toast {
                level,
                message: message.into(),
            });
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastLevel::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    /// 取走全部待显示的提示
    pub fn drain(&self) -> Vec<Toast> {
        self.pending
            .lock()
            .map(|mut p| p.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn latest(&self) -> Option<Toast> {
        self.pending.lock().ok()?.back().cloned()
    }
}
