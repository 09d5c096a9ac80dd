//! 应用入口 - 编排层
//!
//! 初始化（日志文件、客户端、学院对照表、导出目标）→ 探测 → 流水线 → 导出 → 统计。

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::clients::{FormSubmitter, RegistryClient};
use crate::config::Config;
use crate::error::ScrapeError;
use crate::models::{load_faculty_table, FacultyTable};
use crate::orchestrator::pipeline::{Pipeline, PipelineSizing};
use crate::orchestrator::report::PipelineReport;
use crate::services::discover_work;
use crate::sink::{LocalFileSink, RecordSink};
use crate::utils::logging::{init_log_file, log_discovery, log_startup, print_final_stats};

/// 探测失败时的退出码
pub const EXIT_DISCOVERY_FAILED: u8 = 2;
/// 其他致命错误的退出码
pub const EXIT_FATAL: u8 = 1;

/// 应用主结构
pub struct App {
    config: Config,
    submitter: Arc<dyn FormSubmitter>,
    faculties: Arc<FacultyTable>,
    sink: Box<dyn RecordSink>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)
            .with_context(|| format!("无法写入日志文件 {}", config.output_log_file))?;

        log_startup(&config);

        let client = RegistryClient::new(&config).context("无法创建选课系统客户端")?;
        let faculties = load_faculty_table(Path::new(&config.faculty_file)).await?;
        let sink = LocalFileSink::new(&config.output_dir);

        Ok(Self::with_parts(
            config,
            Arc::new(client),
            Arc::new(faculties),
            Box::new(sink),
        ))
    }

    /// 直接指定各个依赖
    pub fn with_parts(
        config: Config,
        submitter: Arc<dyn FormSubmitter>,
        faculties: Arc<FacultyTable>,
        sink: Box<dyn RecordSink>,
    ) -> Self {
        Self {
            config,
            submitter,
            faculties,
            sink,
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<PipelineReport> {
        let plan = discover_work(self.submitter.as_ref()).await?;
        log_discovery(&plan.term, plan.groups.len());

        let pipeline = Pipeline::new(
            PipelineSizing::from_config(&self.config),
            Arc::clone(&self.submitter),
            Arc::clone(&self.faculties),
        );
        let output = pipeline.run(&plan).await.context("流水线运行失败")?;

        let written = self
            .sink
            .write_records(&plan.term, &output.records)
            .await
            .context("导出失败")?;
        info!("✓ 导出完成: {} 门课程", written);

        print_final_stats(&output.report, &self.config.output_log_file);
        Ok(output.report)
    }
}

/// 根据错误类型决定进程退出码
pub fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ScrapeError>() {
        Some(ScrapeError::Discovery { .. }) => EXIT_DISCOVERY_FAILED,
        _ => EXIT_FATAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_failure_has_distinct_status() {
        let err = anyhow::Error::new(ScrapeError::discovery("没有学期"));
        assert_eq!(exit_status(&err), EXIT_DISCOVERY_FAILED);

        let wrapped = anyhow::Error::new(ScrapeError::discovery("没有学期")).context("运行失败");
        assert_eq!(exit_status(&wrapped), EXIT_DISCOVERY_FAILED);
    }

    #[test]
    fn test_other_failures_are_generic() {
        let err = anyhow::Error::new(ScrapeError::sink("out/2023_1", "permission denied"));
        assert_eq!(exit_status(&err), EXIT_FATAL);
        assert_eq!(exit_status(&anyhow::anyhow!("boom")), EXIT_FATAL);
    }
}
