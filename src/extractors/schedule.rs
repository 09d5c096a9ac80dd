//! 上课时间表页面
//!
//! 表格成对出现：标题表（代码、名称），明细表（每行一节课）。
//! 明细表的索引号只写在每组第一行，之后的行沿用上一个非空值。

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::api::Endpoint;
use crate::error::{ScrapeError, ScrapeResult};
use crate::extractors::text::{element_text, selector};
use crate::models::{ModuleSchedule, ScheduleEntry};

/// 学期中的教学周
pub const TERM_WEEKS: RangeInclusive<u32> = 1..=13;

const WEEKS_MARKER: &str = "Teaching Wk";
const NOT_CONDUCTED: &str = "Not conducted during Teaching Weeks";

/// 明细表的列数
const DETAIL_COLUMNS: usize = 7;

/// 教学周描述解析器，例如 `Teaching Wk1-4,6-9,11-13`
pub struct WeekParser {
    range: Regex,
}

impl WeekParser {
    pub fn new() -> ScrapeResult<Self> {
        let range = Regex::new(r"(\d+)\s*(?:-\s*(\d+))?").map_err(|e| {
            ScrapeError::extraction(Endpoint::ClassSchedule, format!("教学周正则无效: {}", e))
        })?;
        Ok(Self { range })
    }

    /// 展开为有序的周次列表
    ///
    /// 没有周次说明时为整个学期；明确写明不在教学周上课时为空。
    pub fn expand(&self, remarks: &str) -> Vec<u32> {
        if let Some((_, week_list)) = remarks.split_once(WEEKS_MARKER) {
            let weeks = self.parse_list(week_list);
            if weeks.is_empty() {
                TERM_WEEKS.collect()
            } else {
                weeks
            }
        } else if remarks.contains(NOT_CONDUCTED) {
            Vec::new()
        } else {
            TERM_WEEKS.collect()
        }
    }

    fn parse_list(&self, week_list: &str) -> Vec<u32> {
        let mut weeks = BTreeSet::new();
        for caps in self.range.captures_iter(week_list) {
            let Some(start) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) else {
                continue;
            };
            let end = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(start);
            // 只保留学期内的周次，倒序区间不计
            let start = start.max(*TERM_WEEKS.start());
            let end = end.min(*TERM_WEEKS.end());
            if start <= end {
                weeks.extend(start..=end);
            }
        }
        weeks.into_iter().collect()
    }
}

/// 解析一页时间表
pub fn extract_schedules(html: &str) -> ScrapeResult<Vec<ModuleSchedule>> {
    let endpoint = Endpoint::ClassSchedule;
    let document = Html::parse_document(html);
    let table_sel = selector(endpoint, "table")?;
    let row_sel = selector(endpoint, "tr")?;
    let cell_sel = selector(endpoint, "td")?;
    let weeks = WeekParser::new()?;

    let tables: Vec<ElementRef<'_>> = document.select(&table_sel).collect();
    if tables.is_empty() {
        return Err(ScrapeError::extraction(endpoint, "页面中没有时间表"));
    }

    let mut modules = Vec::new();
    for pair in tables.chunks_exact(2) {
        let (header, detail) = (pair[0], pair[1]);

        let header_cells: Vec<String> = header.select(&cell_sel).map(element_text).collect();
        if header_cells.len() < 2 {
            continue;
        }

        let rows: Vec<Vec<String>> = detail
            .select(&row_sel)
            .skip(1)
            .map(|row| row.select(&cell_sel).map(element_text).collect())
            .collect();

        modules.push(ModuleSchedule {
            code: header_cells[0].clone(),
            title: header_cells[1].trim_matches('*').trim().to_string(),
            entries: build_entries(&rows, &weeks),
        });
    }

    Ok(modules)
}

/// 明细行 → 上课安排
///
/// 索引号作为唯一的状态在行之间传递：非空单元格替换它，空单元格沿用它。
pub fn build_entries(rows: &[Vec<String>], weeks: &WeekParser) -> Vec<ScheduleEntry> {
    rows.iter()
        .filter(|cells| cells.len() >= DETAIL_COLUMNS)
        .scan(String::new(), |current_index, cells| {
            let (index, entry) = schedule_row(std::mem::take(current_index), cells, weeks);
            *current_index = index;
            Some(entry)
        })
        .collect()
}

fn schedule_row(
    current_index: String,
    cells: &[String],
    weeks: &WeekParser,
) -> (String, ScheduleEntry) {
    let index = if cells[0].is_empty() {
        current_index
    } else {
        cells[0].clone()
    };

    let (start_time, end_time) = match cells[4].split_once('-') {
        Some((start, end)) => (start.trim().to_string(), end.trim().to_string()),
        None => (cells[4].clone(), String::new()),
    };

    let remarks = cells[6].clone();
    let entry = ScheduleEntry {
        start_time,
        end_time,
        venue: cells[5].clone(),
        class_type: cells[1].clone(),
        index: index.clone(),
        index_group: cells[2].clone(),
        day_of_week: cells[3].clone(),
        teaching_weeks: weeks.expand(&remarks),
        remarks,
    };

    (index, entry)
}
