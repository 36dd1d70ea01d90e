/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::models::report::ScoreReport;

/// 初始化日志订阅器
///
/// 级别由 `RUST_LOG` 控制，未设置时为 `info`。重复调用不会报错。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `mode`: 运行模式（generate / grade）
/// - `model_name`: 使用的模型
pub fn log_startup(mode: &str, model_name: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {} 模式", mode);
    info!("🤖 模型: {}", model_name);
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 打印评分统计
pub fn log_score_summary(report: &ScoreReport) {
    info!("\n{}", "─".repeat(60));
    info!(
        "📊 评分完成: {}/{} 正确, 总分 {}",
        report.correct_count, report.total_problems, report.score_percent
    );
    let wrong = report.wrong_numbers();
    if !wrong.is_empty() {
        warn!("❌ 错题: {:?}", wrong);
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
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
