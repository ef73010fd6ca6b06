pub mod auth_service;
pub mod notification_service;
pub mod session_monitor;
pub mod storage_cleaner;

pub use auth_service::AuthService;
pub use notification_service::NotificationService;
pub use session_monitor::SessionMonitor;
pub use storage_cleaner::StorageCleaner;
