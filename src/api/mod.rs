//! API 模块
//!
//! 每个后端资源一个结构体，一个操作对应一次 HTTP 调用

pub mod admin;
pub mod answer;
pub mod auth;
pub mod exam;
pub mod export;
pub mod notification;
pub mod params;
pub mod question;
pub mod stats;
pub mod system;
pub mod upload;

pub use admin::AdminApi;
pub use answer::AnswerApi;
pub use auth::AuthApi;
pub use exam::{ExamApi, LeaderboardQuery, PageQuery};
pub use export::ExportApi;
pub use notification::NotificationApi;
pub use question::{QuestionApi, TrainingApi};
pub use stats::StatsApi;
pub use system::SystemApi;
pub use upload::UploadApi;

use crate::infrastructure::HttpClient;

/// 全部接口的集合，共享同一个 HTTP 客户端
#[derive(Clone)]
pub struct Api {
    pub auth: AuthApi,
    pub questions: QuestionApi,
    pub training: TrainingApi,
    pub answers: AnswerApi,
    pub exams: ExamApi,
    pub stats: StatsApi,
    pub notifications: NotificationApi,
    pub upload: UploadApi,
    pub admin: AdminApi,
    pub export: ExportApi,
    pub system: SystemApi,
}

impl Api {
    pub fn new(http: HttpClient) -> Self {
        Self {
            auth: AuthApi::new(http.clone()),
            questions: QuestionApi::new(http.clone()),
            training: TrainingApi::new(http.clone()),
            answers: AnswerApi::new(http.clone()),
            exams: ExamApi::new(http.clone()),
            stats: StatsApi::new(http.clone()),
            notifications: NotificationApi::new(http.clone()),
            upload: UploadApi::new(http.clone()),
            admin: AdminApi::new(http.clone()),
            export: ExportApi::new(http.clone()),
            system: SystemApi::new(http),
        }
    }
}
