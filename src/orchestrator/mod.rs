//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 初始化依赖（客户端、学院对照表、导出目标）
//! - 探测 → 流水线 → 导出 → 统计
//!
//! ### `pipeline` - 三阶段流水线
//! - 创建队列与三个 worker 池
//! - 按固定顺序关闭队列、等待各池结束
//!
//! ### `workers` - 单个 worker 的循环
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! pipeline (队列 + worker 池 + 关闭顺序)
//!     ↓
//! workers ──> aggregator (按课程代码合并)
//!     ↓
//! services (能力层：探测 / 片段获取)
//!     ↓
//! clients + extractors (请求与解析)
//! ```

pub mod app;
pub mod pipeline;
pub mod report;
mod workers;

// 重新导出主要类型
pub use app::{exit_status, App, EXIT_DISCOVERY_FAILED, EXIT_FATAL};
pub use pipeline::{Pipeline, PipelineOutput, PipelineSizing};
pub use report::{MergeStats, PipelineReport, Stage, StageReport};
