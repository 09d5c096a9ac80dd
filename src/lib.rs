//! # Course Scraper
//!
//! 从选课系统的 HTML 表单页面抓取课程记录：课程内容、上课时间表、考试安排
//! 分别来自三个端点，按课程代码合并成一条记录。
//!
//! ## 架构设计
//!
//! ### ① 请求与解析（Clients / Extractors）
//! - `api/` - 端点与字段表、请求构造
//! - `clients/` - 表单提交，指数退避重试
//! - `extractors/` - 四种固定页面布局 → 片段
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 启动探测；单个工作项的 请求 → 解析
//!
//! ### ③ 合并（Aggregator）
//! - `aggregator` - 按课程代码原子合并部分更新
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/pipeline` - 三个 worker 池、队列与关闭顺序
//! - `orchestrator/app` - 应用入口
//!
//! ### ⑤ 导出（Sink）
//! - `sink/` - 写出每门课程的 JSON 与索引文件
//!
//! ## 模块结构

pub mod aggregator;
pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod sink;
pub mod utils;

// 重新导出常用类型
pub use aggregator::{MergeAggregator, MergeOutcome, PartialUpdate};
pub use api::{Endpoint, EndpointUrls, FormFields};
pub use clients::{BackoffPolicy, FormSubmitter, RegistryClient};
pub use config::Config;
pub use error::{ScrapeError, ScrapeResult};
pub use models::{CombinedRecord, WorkPlan};
pub use orchestrator::{App, Pipeline, PipelineOutput, PipelineReport, PipelineSizing};
pub use sink::{LocalFileSink, RecordSink};
