/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use crate::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化全局日志
///
/// `RUST_LOG` 优先，其次使用配置里的过滤规则。重复调用不会报错。
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.verbose_logging)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 博士业务能力考核系统 - 客户端启动");
    info!("🌐 后端地址: {}", config.api_base_url);
    info!(
        "⏱️ 会话时长: {} 小时 / 记住我 {} 天",
        config.session_ttl_hours, config.remember_ttl_days
    );
    info!("{}", "=".repeat(60));
}

/// 打印启动加载统计
///
/// # 参数
/// - `logged_in`: 是否已登录
/// - `questions`: 题库题目数
/// - `training`: 培训题目数
/// - `failures`: 加载失败的步骤数
pub fn log_bootstrap_summary(logged_in: bool, questions: usize, training: usize, failures: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 系统初始化完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("👤 登录状态: {}", if logged_in { "已登录" } else { "未登录" });
    info!("📚 题库: {} 题", questions);
    info!("🎓 入职培训: {} 题", training);
    if failures > 0 {
        info!("❌ 加载失败步骤: {}", failures);
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_text("罗德岛制药", 3), "罗德岛...");
        assert_eq!(truncate_text("短", 3), "短");
    }
}
