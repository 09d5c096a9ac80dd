//! 端点定义与字段对照表
//!
//! 每个端点都是一个表单 POST，逻辑字段名到表单字段名的映射在这里集中定义，
//! 方便对照页面源码逐项核对。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 逻辑字段名 → 表单字段名
pub type WireTable = &'static [(&'static str, &'static str)];

const COURSE_LIST_FIELDS: WireTable = &[
    ("AcadYearSem", "acadsem"),
    ("FilterParam", "r_course_yr"),
    ("SubjectCode", "r_subj_code"),
    ("BOption", "boption"),
    ("AcadYear", "acad"),
    ("Semester", "semester"),
];

const CLASS_SCHEDULE_FIELDS: WireTable = &[
    ("AcadYearSem", "acadsem"),
    ("FilterParam", "r_course_yr"),
    ("SubjectCode", "r_subj_code"),
    ("BOption", "boption"),
    ("SearchType", "r_search_type"),
    ("StaffAccess", "staff_access"),
];

const EXAM_SCHEDULE_FIELDS: WireTable = &[
    ("ExamSubject", "p_subj"),
    ("PlanNo", "p_plan_no"),
    ("ExamDateTime", "p_exam_dt"),
    ("ExamStartTime", "p_start_time"),
    ("ExamDepartment", "p_dept"),
    ("ExamVenue", "p_venue"),
    ("Matric", "p_matric"),
    ("AcademicSession", "academic_session"),
    ("ExamYear", "p_exam_yr"),
    ("ExamSemester", "p_semester"),
    ("ExamType", "p_type"),
    ("BOption", "bOption"),
];

/// 选课系统的四个端点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// 初始课程列表（学期与课程组下拉框）
    Bootstrap,
    /// 课程内容
    CourseContent,
    /// 上课时间表
    ClassSchedule,
    /// 考试安排
    ExamSchedule,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [
        Endpoint::Bootstrap,
        Endpoint::CourseContent,
        Endpoint::ClassSchedule,
        Endpoint::ExamSchedule,
    ];

    /// 用于日志的服务名
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::Bootstrap => "Get Initial Course List",
            Endpoint::CourseContent => "Get Course Offered Contents",
            Endpoint::ClassSchedule => "Get Class Schedule of Course",
            Endpoint::ExamSchedule => "Get Module Exam Schedule",
        }
    }

    pub fn default_url(self) -> &'static str {
        match self {
            Endpoint::Bootstrap => "https://wis.ntu.edu.sg/webexe/owa/AUS_SUBJ_CONT.main_display",
            Endpoint::CourseContent => {
                "https://wis.ntu.edu.sg/webexe/owa/AUS_SUBJ_CONT.main_display1"
            }
            Endpoint::ClassSchedule => {
                "https://wis.ntu.edu.sg/webexe/owa/aus_schedule.main_display1"
            }
            Endpoint::ExamSchedule => {
                "https://wis.ntu.edu.sg/pls/webexe/exam_timetable_und.Get_detail"
            }
        }
    }

    /// 该端点的字段对照表
    pub fn wire_table(self) -> WireTable {
        match self {
            Endpoint::Bootstrap | Endpoint::CourseContent => COURSE_LIST_FIELDS,
            Endpoint::ClassSchedule => CLASS_SCHEDULE_FIELDS,
            Endpoint::ExamSchedule => EXAM_SCHEDULE_FIELDS,
        }
    }

    pub fn wire_name(self, logical: &str) -> Option<&'static str> {
        self.wire_table()
            .iter()
            .find(|(name, _)| *name == logical)
            .map(|(_, wire)| *wire)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 端点地址（可通过配置覆盖，测试时指向本地模拟服务）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointUrls {
    pub bootstrap: String,
    pub course_content: String,
    pub class_schedule: String,
    pub exam_schedule: String,
}

impl Default for EndpointUrls {
    fn default() -> Self {
        Self {
            bootstrap: Endpoint::Bootstrap.default_url().to_string(),
            course_content: Endpoint::CourseContent.default_url().to_string(),
            class_schedule: Endpoint::ClassSchedule.default_url().to_string(),
            exam_schedule: Endpoint::ExamSchedule.default_url().to_string(),
        }
    }
}

impl EndpointUrls {
    /// 所有端点都挂在同一个地址前缀下（本地调试用）
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            bootstrap: format!("{}/bootstrap", base),
            course_content: format!("{}/content", base),
            class_schedule: format!("{}/schedule", base),
            exam_schedule: format!("{}/exam", base),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Bootstrap => &self.bootstrap,
            Endpoint::CourseContent => &self.course_content,
            Endpoint::ClassSchedule => &self.class_schedule,
            Endpoint::ExamSchedule => &self.exam_schedule,
        }
    }
}
