use crate::api::Api;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{
    Clock, FileStorage, HttpClient, LoadingIndicator, MemoryStorage, NavigationEpoch, Router,
    Storage, SystemClock, Toasts,
};
use crate::services::{AuthService, NotificationService, SessionMonitor, StorageCleaner};
use crate::session::{AuthEvent, SessionPolicy, SessionStore};
use crate::utils::logging;
use crate::workflow::{ExamRunner, QuizController};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 启动加载结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootstrapReport {
    pub logged_in: bool,
    pub questions: usize,
    pub training: usize,
    pub wrong: usize,
    pub exam_attempts: u64,
    /// 失败的步骤名
    pub failures: Vec<String>,
}

/// 应用主结构
pub struct App {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
    pub session: Arc<SessionStore>,
    pub router: Arc<Router>,
    pub toasts: Toasts,
    pub loading: LoadingIndicator,
    pub api: Api,
    pub auth: AuthService,
    pub monitor: SessionMonitor,
    pub notifications: NotificationService,
    pub cleaner: StorageCleaner,
    pub quiz: QuizController,
    pub exams: ExamRunner,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl App {
    /// 初始化应用：持久化存储落在 `storage_path`，标签页存储在内存里
    pub fn initialize(config: Config) -> AppResult<Self> {
        let durable: Arc<dyn Storage> = Arc::new(FileStorage::open(&config.storage_path)?);
        let tab: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        Self::with_parts(config, durable, tab, Arc::new(SystemClock))
    }

    /// 用给定的存储和时钟装配（测试时注入内存存储和手动时钟）
    pub fn with_parts(
        config: Config,
        durable: Arc<dyn Storage>,
        tab: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        let session = Arc::new(SessionStore::new(
            Arc::clone(&durable),
            tab,
            Arc::clone(&clock),
            SessionPolicy::from_config(&config)?,
        ));
        let router = Arc::new(Router::new());
        let toasts = Toasts::new();
        let loading = LoadingIndicator::new();

        let http = HttpClient::new(
            &config,
            Arc::clone(&session),
            Arc::clone(&router),
            toasts.clone(),
            loading.clone(),
        )?;
        let api = Api::new(http);

        let auth = AuthService::new(api.auth.clone(), Arc::clone(&session));
        let monitor = SessionMonitor::new(Arc::clone(&session), auth.clone());
        let notifications = NotificationService::new(
            api.notifications.clone(),
            Arc::clone(&durable),
            Arc::clone(&clock),
            config.local_notification_cap,
        );
        let cleaner = StorageCleaner::new(durable, Arc::clone(&clock));
        let quiz = QuizController::new(
            api.clone(),
            Arc::clone(&session),
            Arc::clone(&router),
            toasts.clone(),
            Arc::clone(&clock),
            NavigationEpoch::new(),
            config.question_page_size,
            config.training_page_size,
        );
        let exams = ExamRunner::new(api.exams.clone(), Arc::clone(&clock));

        debug!("应用装配完成: {}", config.api_base_url);

        Ok(Self {
            config,
            clock,
            session,
            router,
            toasts,
            loading,
            api,
            auth,
            monitor,
            notifications,
            cleaner,
            quiz,
            exams,
            tasks: Mutex::new(Vec::new()),
        })
    }

    /// 启动加载：登录检查 → 题库 → 培训题 → 错题与考试统计（仅登录时）
    ///
    /// 每一步失败只记录，不影响后续步骤。
    pub async fn bootstrap(&self) -> BootstrapReport {
        let mut report = BootstrapReport::default();

        report.logged_in = if self.session.is_logged_in() {
            self.auth.validate_token().await
        } else {
            false
        };
        info!(
            "👤 登录检查: {}",
            if report.logged_in { "已登录" } else { "未登录" }
        );

        match self.quiz.load_questions().await {
            Ok(count) => report.questions = count,
            Err(e) => {
                warn!("❌ 题库加载失败: {}", e);
                report.failures.push("questions".to_string());
            }
        }

        match self.quiz.load_training_questions().await {
            Ok(count) => report.training = count,
            Err(e) => {
                warn!("❌ 培训题加载失败: {}", e);
                report.failures.push("training".to_string());
            }
        }

        if report.logged_in {
            match self.quiz.load_wrong_questions().await {
                Ok(count) => report.wrong = count,
                Err(e) => {
                    warn!("❌ 错题加载失败: {}", e);
                    report.failures.push("wrong".to_string());
                }
            }

            match self.quiz.load_exam_stats().await {
                Ok(stats) => report.exam_attempts = stats.total_attempts,
                Err(e) => {
                    warn!("❌ 考试统计加载失败: {}", e);
                    report.failures.push("exam_stats".to_string());
                }
            }
        }

        logging::log_bootstrap_summary(
            report.logged_in,
            report.questions,
            report.training,
            report.failures.len(),
        );
        report
    }

    /// 启动后台任务：会话续期、过期通知清理、本地存储清理（启动后延迟开始）、会话事件日志
    ///
    /// 任务只在 `App` 析构时终止。
    pub fn spawn_background_tasks(&self) {
        let mut handles = Vec::with_capacity(4);

        let monitor = self.monitor.clone();
        let period = self.config.session_check_interval();
        handles.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                monitor.tick();
            }
        }));

        let notifications = self.notifications.clone();
        let period = self.config.notification_sweep_interval();
        handles.push(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                sweep(&notifications);
            }
        }));

        let cleaner = self.cleaner.clone();
        let delay = self.config.startup_cleanup_delay();
        let period = self.config.storage_cleanup_interval();
        handles.push(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                if let Err(e) = cleaner.cleanup() {
                    warn!("清理本地存储失败: {}", e);
                }
            }
        }));

        let mut events = self.session.subscribe();
        handles.push(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AuthEvent::SessionExpired) => info!("⏰ 会话已过期，需要重新登录"),
                    Ok(event) => debug!("会话事件: {}", event.name()),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        warn!("会话事件丢失 {} 条", n)
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        }));

        match self.tasks.lock() {
            Ok(mut tasks) => tasks.extend(handles),
            Err(e) => e.into_inner().extend(handles),
        }
        info!("⏲️ 后台任务已启动");
    }

    /// 后台任务数量
    pub fn background_task_count(&self) -> usize {
        self.tasks.lock().map(|t| t.len()).unwrap_or(0)
    }

    /// 页面重新可见
    pub async fn on_visibility_regained(&self) -> Option<bool> {
        self.monitor.on_visibility_regained().await
    }

    /// 网络恢复
    pub async fn on_network_online(&self) -> Option<bool> {
        self.monitor.on_network_online().await
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let tasks = match self.tasks.get_mut() {
            Ok(tasks) => tasks,
            Err(e) => e.into_inner(),
        };
        for handle in tasks.drain(..) {
            handle.abort();
        }
    }
}

fn sweep(notifications: &NotificationService) {
    match notifications.sweep_expired() {
        Ok(0) => {}
        Ok(n) => info!("🧹 已清除 {} 条过期通知", n),
        Err(e) => warn!("清理过期通知失败: {}", e),
    }
}
