//! 响应页面 → 片段
//!
//! 只处理四种固定布局；不匹配时返回 `ScrapeError::Extraction`。

pub mod content;
pub mod course_list;
pub mod exam;
pub mod schedule;
pub mod text;

pub use content::extract_courses;
pub use course_list::{extract_course_list, CourseListPage};
pub use exam::extract_exams;
pub use schedule::{build_entries, extract_schedules, WeekParser, TERM_WEEKS};
