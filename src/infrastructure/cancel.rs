//! 导航取消令牌
//!
//! 每次导航动作开启一个新纪元；返回时纪元已过期的响应直接丢弃，
//! 避免慢请求覆盖新页面的状态。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct NavigationEpoch {
    current: Arc<AtomicU64>,
}

/// 某次导航动作的票据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTicket(u64);

impl NavigationEpoch {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始新的导航动作，之前发出的票据全部失效
    pub fn begin(&self) -> NavigationTicket {
        NavigationTicket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// 当前最新的票据（不开启新动作）
    pub fn current(&self) -> NavigationTicket {
        NavigationTicket(self.current.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.0
    }
}
