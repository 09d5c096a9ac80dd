//! 课程数据模型
//!
//! 三种片段（课程内容、上课时间表、考试安排）以及合并后的记录。

use serde::{Deserialize, Serialize};

use crate::models::faculty::Faculty;

/// 课程内容（Stage A）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseContent {
    pub code: String,
    pub title: String,
    pub au: String,
    pub prerequisite: String,
    pub mutually_exclusive: String,
    pub not_available_to: String,
    pub not_available_to_prog_with: String,
    pub grade_type: String,
    pub not_available_as_ue: String,
    pub not_available_as_pe: String,
    pub description: String,
    #[serde(default)]
    pub faculty: Faculty,
}

impl CourseContent {
    /// 所有字段都为空
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 一行上课安排（Stage B）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub start_time: String,
    pub end_time: String,
    pub venue: String,
    pub class_type: String,
    /// 课程索引号（只在每组第一行出现，后续行沿用）
    pub index: String,
    pub index_group: String,
    pub day_of_week: String,
    pub remarks: String,
    pub teaching_weeks: Vec<u32>,
}

impl ScheduleEntry {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 时间表页面中的一门课程
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleSchedule {
    pub code: String,
    pub title: String,
    pub entries: Vec<ScheduleEntry>,
}

impl ModuleSchedule {
    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.title.is_empty() && self.entries.iter().all(|e| e.is_empty())
    }
}

/// 考试安排（Stage C）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamEntry {
    pub date: String,
    pub day_of_week: String,
    pub time: String,
    pub code: String,
    pub title: String,
    pub duration: String,
}

impl ExamEntry {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 按课程代码合并后的记录
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedRecord {
    pub content: Option<CourseContent>,
    pub schedule: Option<Vec<ScheduleEntry>>,
    pub exam: Option<ExamEntry>,
}

impl CombinedRecord {
    pub fn is_complete(&self) -> bool {
        self.content.is_some() && self.schedule.is_some() && self.exam.is_some()
    }

    /// 转成导出格式，缺失的片段用空值补齐
    pub fn to_export(&self, code: &str) -> ExportRecord {
        let mut course = self.content.clone().unwrap_or_default();
        if course.code.is_empty() {
            course.code = code.to_string();
        }

        ExportRecord {
            course,
            schedule: self.schedule.clone().unwrap_or_default(),
            exam: self.exam.clone().unwrap_or_default(),
        }
    }

    /// 索引文件中的条目；没有课程内容的记录不进索引
    pub fn to_lite(&self) -> Option<ModuleLite> {
        let content = self.content.as_ref()?;
        Some(ModuleLite {
            code: content.code.clone(),
            module: content.title.clone(),
            au: content.au.clone(),
            description: content.description.clone(),
            faculty: content.faculty.clone(),
        })
    }
}

/// 单门课程的导出 JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    #[serde(flatten)]
    pub course: CourseContent,
    pub schedule: Vec<ScheduleEntry>,
    pub exam: ExamEntry,
}

/// `moduleList.json` 中的条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleLite {
    pub code: String,
    pub module: String,
    pub au: String,
    pub description: String,
    pub faculty: Faculty,
}
