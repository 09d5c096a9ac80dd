//! 表单请求
//!
//! 每种请求都显式列出 (逻辑字段名, 取值)，顺序即提交顺序；
//! 表单字段名由 [`Endpoint::wire_table`] 统一翻译。

use crate::api::Endpoint;
use crate::error::{ScrapeError, ScrapeResult};
use crate::models::term::split_term;

/// 有序的逻辑字段 → 取值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(&'static str, String)>,
}

impl FormFields {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, String)>,
    {
        Self {
            fields: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, logical: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == logical)
            .map(|(_, value)| value.as_str())
    }

    /// 按端点的字段对照表翻译成表单字段
    pub fn encode(&self, endpoint: Endpoint) -> ScrapeResult<Vec<(&'static str, String)>> {
        self.fields
            .iter()
            .map(|(logical, value)| {
                endpoint
                    .wire_name(logical)
                    .map(|wire| (wire, value.clone()))
                    .ok_or(ScrapeError::Encoding {
                        endpoint,
                        field: logical,
                    })
            })
            .collect()
    }
}

/// 课程列表 / 课程内容请求
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseListRequest {
    pub acad_year_sem: String,
    pub filter_param: String,
    pub subject_code: String,
    pub b_option: String,
    pub acad_year: String,
    pub semester: String,
}

impl CourseListRequest {
    /// 启动探测只需要学期
    pub fn bootstrap(term: &str) -> Self {
        Self {
            acad_year_sem: term.to_string(),
            ..Default::default()
        }
    }

    /// 某个课程组的课程内容
    pub fn content(term: &str, group: &str) -> Self {
        let (year, semester) = split_term(term);
        Self {
            acad_year_sem: term.to_string(),
            filter_param: group.to_string(),
            b_option: "CLoad".to_string(),
            acad_year: year.to_string(),
            semester: semester.to_string(),
            ..Default::default()
        }
    }

    pub fn to_form(&self) -> FormFields {
        FormFields::from_pairs([
            ("AcadYearSem", self.acad_year_sem.clone()),
            ("FilterParam", self.filter_param.clone()),
            ("SubjectCode", self.subject_code.clone()),
            ("BOption", self.b_option.clone()),
            ("AcadYear", self.acad_year.clone()),
            ("Semester", self.semester.clone()),
        ])
    }
}

/// 上课时间表请求
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub acad_year_sem: String,
    pub filter_param: String,
    pub subject_code: String,
    pub b_option: String,
    pub search_type: String,
    pub staff_access: String,
}

impl ScheduleRequest {
    pub fn new(term: &str, group: &str) -> Self {
        Self {
            acad_year_sem: term.to_string(),
            filter_param: group.to_string(),
            b_option: "CLoad".to_string(),
            ..Default::default()
        }
    }

    /// 时间表端点要求学期写成 `2023;1` 而不是 `2023_1`
    pub fn to_form(&self) -> FormFields {
        FormFields::from_pairs([
            ("AcadYearSem", self.acad_year_sem.replacen('_', ";", 1)),
            ("FilterParam", self.filter_param.clone()),
            ("SubjectCode", self.subject_code.clone()),
            ("BOption", self.b_option.clone()),
            ("SearchType", self.search_type.clone()),
            ("StaffAccess", self.staff_access.clone()),
        ])
    }
}

/// 考试安排请求
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExamRequest {
    pub exam_subject: String,
    pub plan_no: String,
    pub exam_date_time: String,
    pub exam_start_time: String,
    pub exam_department: String,
    pub exam_venue: String,
    pub matric: String,
    pub academic_session: String,
    pub exam_year: String,
    pub exam_semester: String,
    pub exam_type: String,
    pub b_option: String,
}

impl ExamRequest {
    pub fn new(term: &str, code: &str) -> Self {
        let (year, semester) = split_term(term);
        Self {
            exam_subject: code.to_string(),
            plan_no: "110".to_string(),
            exam_year: year.to_string(),
            exam_semester: semester.to_string(),
            exam_type: "UE".to_string(),
            b_option: "Next".to_string(),
            ..Default::default()
        }
    }

    pub fn to_form(&self) -> FormFields {
        FormFields::from_pairs([
            ("ExamSubject", self.exam_subject.clone()),
            ("PlanNo", self.plan_no.clone()),
            ("ExamDateTime", self.exam_date_time.clone()),
            ("ExamStartTime", self.exam_start_time.clone()),
            ("ExamDepartment", self.exam_department.clone()),
            ("ExamVenue", self.exam_venue.clone()),
            ("Matric", self.matric.clone()),
            ("AcademicSession", self.academic_session.clone()),
            ("ExamYear", self.exam_year.clone()),
            ("ExamSemester", self.exam_semester.clone()),
            ("ExamType", self.exam_type.clone()),
            ("BOption", self.b_option.clone()),
        ])
    }
}
