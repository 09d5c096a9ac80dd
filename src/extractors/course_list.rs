//! 初始课程列表页面：学期下拉框与课程组下拉框

use std::collections::HashSet;

use scraper::Html;

use crate::api::Endpoint;
use crate::error::{ScrapeError, ScrapeResult};
use crate::extractors::text::{element_text, selector};
use crate::models::AcademicTerm;

/// 初始页面中的可选项
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseListPage {
    /// 按页面顺序排列的学期
    pub terms: Vec<AcademicTerm>,
    /// 课程组过滤条件（去重，保持页面顺序）
    pub groups: Vec<String>,
}

pub fn extract_course_list(html: &str) -> ScrapeResult<CourseListPage> {
    let endpoint = Endpoint::Bootstrap;
    let document = Html::parse_document(html);
    let term_options = selector(endpoint, r#"select[name="acadsem"] option"#)?;
    let group_options = selector(endpoint, r#"select[name="r_course_yr"] option"#)?;

    let terms: Vec<AcademicTerm> = document
        .select(&term_options)
        .filter_map(|option| {
            let value = option.value().attr("value")?.trim();
            (!value.is_empty()).then(|| AcademicTerm::new(value, element_text(option)))
        })
        .collect();

    if terms.is_empty() {
        return Err(ScrapeError::extraction(endpoint, "页面中没有学期选项 (acadsem)"));
    }

    let mut seen = HashSet::new();
    let groups = document
        .select(&group_options)
        .filter_map(|option| option.value().attr("value"))
        .map(str::trim)
        .filter(|value| !value.is_empty() && seen.insert(value.to_string()))
        .map(str::to_string)
        .collect();

    Ok(CourseListPage { terms, groups })
}
