use anyhow::{Context, Result};
use doctor_exam_client::utils::logging;
use doctor_exam_client::{App, Config};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load().context("加载配置失败")?;

    // 初始化日志
    logging::init(&config);
    logging::log_startup(&config);

    // 初始化应用
    let app = App::initialize(config).context("初始化应用失败")?;

    // 可选：用环境变量中的账号登录
    if let (Ok(username), Ok(password)) = (
        std::env::var("DOCTOR_USERNAME"),
        std::env::var("DOCTOR_PASSWORD"),
    ) {
        let outcome = app.auth.login(&username, &password, true).await;
        if outcome.success {
            info!("✅ {}: {}", outcome.message, username);
        } else {
            warn!("⚠️ 登录失败: {}", outcome.message);
        }
    }

    app.spawn_background_tasks();
    let report = app.bootstrap().await;

    for toast in app.toasts.drain() {
        info!("💬 [{:?}] {}", toast.level, toast.message);
    }
    info!("错题 {} 道，考试 {} 次", report.wrong, report.exam_attempts);

    Ok(())
}
