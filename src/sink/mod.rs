//! 导出
//!
//! 流水线结束后把合并结果交给 `RecordSink`；流水线本身不关心存储位置。

pub mod local_file;

use async_trait::async_trait;

use crate::error::ScrapeResult;
use crate::models::CombinedRecord;

pub use local_file::{LocalFileSink, MODULE_LIST_FILE};

/// 导出能力
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// 写出某个学期的全部记录，返回写出的课程数量
    async fn write_records(&self, term: &str, records: &[(String, CombinedRecord)]) -> ScrapeResult<usize>;
}
