//! 选课系统接口定义
//!
//! 负责端点地址、字段对照表以及各类请求的表单构造

pub mod endpoints;
pub mod forms;

// 重新导出常用类型
pub use endpoints::{Endpoint, EndpointUrls};
pub use forms::{CourseListRequest, ExamRequest, FormFields, ScheduleRequest};
