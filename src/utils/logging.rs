//! 日志工具模块
//!
//! 提供日志初始化和格式化输出的辅助函数

use std::fs;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::PipelineReport;

/// 初始化 tracing
///
/// 默认级别为 `info`（`verbose` 时为 `debug`），`RUST_LOG` 优先。重复调用无副作用。
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n课程抓取日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 三阶段课程抓取");
    info!(
        "📊 Worker 数量: 内容 {} / 时间表 {} / 考试 {}",
        config.content_workers, config.schedule_workers, config.exam_workers
    );
    info!(
        "📦 队列容量: {} (考试队列 {})",
        config.queue_capacity,
        config.exam_queue_capacity()
    );
    info!("{}", "=".repeat(60));
}

/// 记录探测结果
///
/// # 参数
/// - `term`: 选中的学期
/// - `groups`: 课程组数量
pub fn log_discovery(term: &str, groups: usize) {
    info!("✓ 最新学期: {}", term);
    info!("📋 共 {} 个课程组待抓取\n", groups);
}

/// 记录某个阶段已全部结束
pub fn log_stage_drained(stage: &str, processed: usize, skipped: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ {} 已结束: 成功 {} / 跳过 {}", stage, processed, skipped);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `report`: 流水线报告
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(report: &PipelineReport, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    for stage in report.stages() {
        info!(
            "{}: 成功 {} / 跳过 {} / 异常退出 {}",
            stage.name, stage.processed, stage.skipped, stage.panicked
        );
    }
    info!("📨 生成考试查询: {}", report.exam_items_emitted);
    let merges = &report.merges;
    info!(
        "🔀 合并: 新建 {} / 更新 {} / 无变化 {} / 忽略 {}",
        merges.created, merges.updated, merges.unchanged, merges.ignored
    );
    info!("✅ Extraction Complete: {} 门课程", report.merged_records);
    info!("{}", "=".repeat(60));
    info!("\n{}", log_file_note(log_file_path));
}

/// 运行记录文件只含启动头，完整日志在控制台
fn log_file_note(log_file_path: &str) -> String {
    format!("运行记录头已写入: {} (完整日志见控制台输出)", log_file_path)
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
