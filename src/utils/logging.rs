/// 日志工具模块
///
/// 提供作业开始/结束时的横幅与汇总输出
use crate::config::ValidatedConfig;
use crate::orchestrator::{BatchReport, Job};
use tracing::{info, warn};

/// 当前本地时间，用于横幅
fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 记录作业启动信息
///
/// # 参数
/// - `job`: 当前作业
/// - `config`: 校验后的配置
pub fn log_startup(job: Job, config: &ValidatedConfig) {
    info!("{}", "=".repeat(60));
    info!("🚀 作业启动: {} ({})", job, now());
    info!("📂 源分组: {}", config.config.source_collection);
    match job {
        Job::Promote => {
            info!("🎯 目标分组: {}", config.config.target_collection);
            info!("🗳️ 最少票数: {}", config.config.quorum);
        }
        Job::Extract | Job::Stats => {
            info!("📁 输出目录: {}", config.config.output_dir);
            info!("🔍 关键词数: {}", config.patterns.len());
        }
    }
    info!("{}", "=".repeat(60));
}

/// 记录条目加载信息
///
/// # 参数
/// - `collection`: 分组名称
/// - `total`: 常规条目数
/// - `ignored`: 被忽略的非常规条目数（笔记、附件）
pub fn log_items_loaded(collection: &str, total: usize, ignored: usize) {
    info!("✓ 分组 \"{}\" 中找到 {} 个条目", collection, total);
    if ignored > 0 {
        info!("💡 忽略 {} 个独立笔记/附件", ignored);
    }
}

/// 打印作业汇总
pub fn print_final_stats(report: &BatchReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 {} 处理完成统计", report.job);
    info!("完成时间: {}", now());
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.processed, report.total);
    if report.job == Job::Promote {
        info!("📤 新加入目标分组: {}", report.promoted);
    }
    info!("⏭️ 跳过: {}", report.skipped.len());
    for skipped in report.skipped.iter() {
        warn!(
            "   - {} \"{}\": {}",
            skipped.key,
            truncate_text(&skipped.title, 40),
            skipped.reason
        );
    }
    for output in &report.outputs {
        info!("📝 已写入: {}", output.display());
    }
    info!("{}", "=".repeat(60));
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
