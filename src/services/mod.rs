//! 业务能力层
//!
//! 描述"一个工作项能做什么"，不关心队列与并发。

pub mod discovery;
pub mod fragment_service;

pub use discovery::{discover_work, discover_work_for};
pub use fragment_service::FragmentService;
