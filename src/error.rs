//! 错误类型
//!
//! 按照传播范围划分：
//! - `Discovery`：致命错误，整个抓取流程终止
//! - `Retrieval` / `Extraction`：单个工作项的错误，记录日志后跳过
//! - 其余：启动或导出阶段的错误

use thiserror::Error;

use crate::api::Endpoint;

/// 抓取流程错误类型
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// 启动探测失败（学期 / 课程组列表）
    #[error("探测失败: {reason}")]
    Discovery { reason: String },

    /// 网络请求在重试耗尽后仍然失败
    #[error("请求 {endpoint} 失败，已尝试 {attempts} 次: {last_cause}")]
    Retrieval {
        endpoint: Endpoint,
        attempts: u32,
        last_cause: String,
    },

    /// 返回的页面与预期布局不符
    #[error("解析 {endpoint} 响应失败: {reason}")]
    Extraction { endpoint: Endpoint, reason: String },

    /// 逻辑字段在该端点的字段表中不存在
    #[error("端点 {endpoint} 不认识字段 {field}")]
    Encoding {
        endpoint: Endpoint,
        field: &'static str,
    },

    /// 配置错误
    #[error("配置错误: {reason}")]
    Config { reason: String },

    /// 学院对照表加载失败
    #[error("无法加载学院对照表 ({path}): {reason}")]
    Faculty { path: String, reason: String },

    /// 导出失败
    #[error("导出失败 ({path}): {reason}")]
    Sink { path: String, reason: String },

    /// 流水线内部错误（例如工作任务未能全部退出）
    #[error("流水线错误: {reason}")]
    Pipeline { reason: String },
}

// ========== 便捷构造函数 ==========

impl ScrapeError {
    /// 创建探测错误
    pub fn discovery(reason: impl Into<String>) -> Self {
        ScrapeError::Discovery {
            reason: reason.into(),
        }
    }

    /// 创建请求失败错误
    pub fn retrieval(endpoint: Endpoint, attempts: u32, last_cause: impl ToString) -> Self {
        ScrapeError::Retrieval {
            endpoint,
            attempts,
            last_cause: last_cause.to_string(),
        }
    }

    /// 创建解析错误
    pub fn extraction(endpoint: Endpoint, reason: impl Into<String>) -> Self {
        ScrapeError::Extraction {
            endpoint,
            reason: reason.into(),
        }
    }

    /// 创建配置错误
    pub fn config(reason: impl Into<String>) -> Self {
        ScrapeError::Config {
            reason: reason.into(),
        }
    }

    /// 创建导出错误
    pub fn sink(path: impl Into<String>, source: impl ToString) -> Self {
        ScrapeError::Sink {
            path: path.into(),
            reason: source.to_string(),
        }
    }

    /// 是否为致命错误（会终止整个运行）
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ScrapeError::Retrieval { .. } | ScrapeError::Extraction { .. }
        )
    }
}

// ========== Result 类型别名 ==========

/// 抓取流程结果类型
pub type ScrapeResult<T> = Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_errors_are_not_fatal() {
        let retrieval = ScrapeError::retrieval(Endpoint::ExamSchedule, 3, "timeout");
        let extraction = ScrapeError::extraction(Endpoint::ClassSchedule, "缺少表格");

        assert!(!retrieval.is_fatal());
        assert!(!extraction.is_fatal());
        assert!(ScrapeError::discovery("无学期").is_fatal());
    }

    #[test]
    fn test_retrieval_message_mentions_attempts() {
        let err = ScrapeError::retrieval(Endpoint::CourseContent, 3, "connection reset");
        let msg = err.to_string();

        assert!(msg.contains("3"));
        assert!(msg.contains("connection reset"));
        assert!(msg.contains(Endpoint::CourseContent.name()));
    }
}
