//! 学期标识
//!
//! 学期写作 `2023_1`（学年 + 学期），特别学期在选择"最新学期"时跳过。

use chrono::{Datelike, Local, NaiveDate};

/// 学期在五月切换：五月之前仍属于上一学年的第二学期
const TERM_ROLLOVER_MONTH: u32 = 5;

/// 下拉框中的一个学期选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcademicTerm {
    /// 表单取值，例如 `2023_1`
    pub value: String,
    /// 显示文本
    pub label: String,
}

impl AcademicTerm {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// 是否为特别学期（短学期）
    pub fn is_special(&self) -> bool {
        self.value.contains("Special Term")
            || self.label.contains("Special Term")
            || self.value.contains("_S")
    }
}

impl From<&str> for AcademicTerm {
    fn from(value: &str) -> Self {
        Self::new(value, value)
    }
}

/// 根据日期推算当前学期
pub fn current_term(date: NaiveDate) -> String {
    if date.month() < TERM_ROLLOVER_MONTH {
        format!("{}_2", date.year() - 1)
    } else {
        format!("{}_1", date.year())
    }
}

/// 按本地时间推算当前学期
pub fn current_term_now() -> String {
    current_term(Local::now().date_naive())
}

/// `2023_1` → (`2023`, `1`)
pub fn split_term(term: &str) -> (&str, &str) {
    term.split_once('_').unwrap_or((term, ""))
}

/// 选出最新的常规学期
///
/// 学期列表按时间先后排列，最新的在最后；从后往前找第一个非特别学期，
/// 全部都是特别学期时退回到最后一个。
pub fn select_latest_term(terms: &[AcademicTerm]) -> Option<&AcademicTerm> {
    terms
        .iter()
        .rev()
        .find(|term| !term.is_special())
        .or_else(|| terms.last())
}
