//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 装配整个客户端，管理生命周期：初始化、启动加载、后台定时任务、拆除。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (生命周期、后台任务)
//!     ↓
//! workflow (QuizController / ExamRunner)
//!     ↓
//! services (AuthService / SessionMonitor / NotificationService)
//!     ↓
//! api (各后端资源)
//!     ↓
//! infrastructure (HttpClient / Storage / Clock / Router)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一入口**：只有编排层创建存储、HTTP 客户端和定时任务
//! 2. **向下依赖**：编排层 → workflow → services → api → infrastructure
//! 3. **无业务逻辑**：只做装配、调度和统计

pub mod app;

pub use app::{App, BootstrapReport};
