//! # Doctor Exam Client
//!
//! 博士业务能力考核系统的客户端核心：登录会话、题库练习、错题本、考试与通知
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 只暴露能力，不含业务判断
//! - `HttpClient` - 统一的请求封装：令牌、防缓存参数、信封解包、错误归一化
//! - `Storage` - 持久化 / 标签页两种键值存储
//! - `Clock` / `Router` / `Toasts` / `LoadingIndicator` / `NavigationEpoch`
//!
//! ### ② 会话与接口层（Session / Api）
//! - `session/` - 登录状态、会话过期、认证事件广播
//! - `api/` - 每个后端资源一个结构体
//!
//! ### ③ 业务能力层（Services）
//! - `AuthService` - 登录、注册、退出、令牌校验与刷新
//! - `SessionMonitor` - 定时续期、页面可见 / 网络恢复时重新校验
//! - `NotificationService` - 服务器通知与本地通知合并
//!
//! ### ④ 流程层（Workflow）
//! - `QuizController` - 题库 / 随机 / 跳题 / 培训 / 错题五种模式的导航与作答
//! - `ExamRunner` - 限时考试
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator::App` - 装配、启动加载、后台任务
//!
//! ## 模块结构

pub mod api;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod session;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::question::Question;
pub use orchestrator::{App, BootstrapReport};
pub use workflow::{NavOutcome, QuestionMode, QuizController};
