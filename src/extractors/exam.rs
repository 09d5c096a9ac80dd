//! 考试安排页面

use scraper::Html;

use crate::api::Endpoint;
use crate::error::{ScrapeError, ScrapeResult};
use crate::extractors::text::{element_text, selector};
use crate::models::ExamEntry;

const EXAM_COLUMNS: usize = 6;

/// 解析 `table[border="1"]` 中的考试行（第一行是表头）
pub fn extract_exams(html: &str) -> ScrapeResult<Vec<ExamEntry>> {
    let endpoint = Endpoint::ExamSchedule;
    let document = Html::parse_document(html);
    let table_sel = selector(endpoint, r#"table[border="1"]"#)?;
    let row_sel = selector(endpoint, "tr")?;
    let cell_sel = selector(endpoint, "td")?;
    let separator_sel = selector(endpoint, r#"td[colspan="7"]"#)?;

    let Some(table) = document.select(&table_sel).next() else {
        return Err(ScrapeError::extraction(endpoint, "页面中没有考试表格"));
    };

    let exams = table
        .select(&row_sel)
        .filter(|row| row.select(&separator_sel).next().is_none())
        .map(|row| row.select(&cell_sel).map(element_text).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .skip(1)
        .filter(|cells| cells.len() >= EXAM_COLUMNS)
        .map(|cells| ExamEntry {
            date: cells[0].clone(),
            day_of_week: cells[1].clone(),
            time: cells[2].clone(),
            code: cells[3].clone(),
            title: cells[4].clone(),
            duration: cells[5].clone(),
        })
        .collect();

    Ok(exams)
}
