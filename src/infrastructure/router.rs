//! 视图路由
//!
//! 只记录"当前在哪个页面"，401 时据此决定是否跳回登录页。

use std::sync::Mutex;
use tracing::info;

/// 页面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Index,
    Login,
    Practice,
    QuickJump,
    Training,
    Wrong,
    Search,
    Question,
    Exam,
}

#[derive(Debug, Default)]
pub struct Router {
    current: Mutex<View>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current.lock().map(|v| *v).unwrap_or_default()
    }

    pub fn go(&self, view: View) {
        if let Ok(mut current) = self.current.lock() {
            *current = view;
        }
    }

    /// 跳转到登录页；已经在登录页时不动
    ///
    /// # 返回
    /// 是否发生了跳转
    pub fn redirect_to_login(&self) -> bool {
        let Ok(mut current) = self.current.lock() else {
            return false;
        };
        if *current == View::Login {
            return false;
        }
        info!("🔐 会话失效，从 {:?} 跳转到登录页", *current);
        *current = View::Login;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_is_a_no_op_on_login_view() {
        let router = Router::new();
        router.go(View::Question);
        assert!(router.redirect_to_login());
        assert_eq!(router.current(), View::Login);
        assert!(!router.redirect_to_login());
    }
}
