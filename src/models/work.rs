//! 工作项
//!
//! 每个工作项只包含构造一次请求所需的标识，由上游生产、被某个 worker 消费一次。

use std::fmt::Display;

/// 课程组工作项（Stage A / Stage B）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupWork {
    /// 学期，例如 `2023_1`
    pub term: String,
    /// 课程组过滤条件
    pub group: String,
}

impl GroupWork {
    pub fn new(term: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            group: group.into(),
        }
    }
}

impl Display for GroupWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.term, self.group)
    }
}

/// 考试查询工作项（Stage C）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamWork {
    pub term: String,
    pub code: String,
}

impl ExamWork {
    pub fn new(term: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            code: code.into(),
        }
    }
}

impl Display for ExamWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.term, self.code)
    }
}

/// 探测结果：本次要抓取的学期与课程组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkPlan {
    pub term: String,
    pub groups: Vec<String>,
}

impl WorkPlan {
    pub fn group_work(&self) -> impl Iterator<Item = GroupWork> + '_ {
        self.groups
            .iter()
            .map(move |group| GroupWork::new(self.term.clone(), group.clone()))
    }
}
