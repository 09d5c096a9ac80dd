//! 课程内容页面
//!
//! 页面有两种布局：
//! - 每门课程一个表格，文本都在 `font` 元素里
//! - 一个大表格列出所有课程（辅修 / BDE 列表），课程之间用空行分隔

use phf::phf_map;
use scraper::{ElementRef, Html};

use crate::api::Endpoint;
use crate::error::{ScrapeError, ScrapeResult};
use crate::extractors::text::{element_text, first_token, normalize, selector};
use crate::models::CourseContent;

/// 条款标签对应的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Prerequisite,
    GradeType,
    MutuallyExclusive,
    NotAvailableTo,
    NotAvailableToProgWith,
    NotAvailableAsUe,
    NotAvailableAsPe,
}

static CLAUSE_LABELS: phf::Map<&'static str, Clause> = phf_map! {
    "Prerequisite:" => Clause::Prerequisite,
    "Grade Type:" => Clause::GradeType,
    "Mutually exclusive with:" => Clause::MutuallyExclusive,
    "Not available to Programme:" => Clause::NotAvailableTo,
    "Not available to all Programme with:" => Clause::NotAvailableToProgWith,
    "Not available as BDE/UE to Programme:" => Clause::NotAvailableAsUe,
    "Not available as PE to Programme:" => Clause::NotAvailableAsPe,
};

impl Clause {
    fn from_label(label: &str) -> Option<Self> {
        CLAUSE_LABELS.get(label).copied()
    }

    fn slot(self, course: &mut CourseContent) -> &mut String {
        match self {
            Clause::Prerequisite => &mut course.prerequisite,
            Clause::GradeType => &mut course.grade_type,
            Clause::MutuallyExclusive => &mut course.mutually_exclusive,
            Clause::NotAvailableTo => &mut course.not_available_to,
            Clause::NotAvailableToProgWith => &mut course.not_available_to_prog_with,
            Clause::NotAvailableAsUe => &mut course.not_available_as_ue,
            Clause::NotAvailableAsPe => &mut course.not_available_as_pe,
        }
    }

    /// 追加一段值；以 "OR" 结尾时下一段值仍属于这个条款
    fn append(self, course: &mut CourseContent, value: &str) -> bool {
        push_joined(self.slot(course), value);
        value.ends_with("OR")
    }
}

fn push_joined(target: &mut String, value: &str) {
    if value.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(value);
}

pub fn extract_courses(html: &str) -> ScrapeResult<Vec<CourseContent>> {
    let endpoint = Endpoint::CourseContent;
    let document = Html::parse_document(html);
    let table_sel = selector(endpoint, "table")?;
    let row_sel = selector(endpoint, "tr")?;

    let tables: Vec<ElementRef<'_>> = document.select(&table_sel).collect();
    if tables.is_empty() {
        return Err(ScrapeError::extraction(endpoint, "页面中没有课程表格"));
    }

    let is_listing = document.select(&row_sel).any(|row| {
        row.children()
            .filter_map(ElementRef::wrap)
            .filter(|cell| cell.value().name() == "td" || cell.value().name() == "th")
            .count()
            > 3
    });

    if is_listing {
        extract_listing(tables[0])
    } else {
        let font_sel = selector(endpoint, "font")?;
        Ok(tables
            .into_iter()
            .filter_map(|table| {
                let cells: Vec<String> = table
                    .select(&font_sel)
                    .map(element_text)
                    .filter(|text| !text.is_empty())
                    .collect();
                course_from_cells(&cells)
            })
            .collect())
    }
}

/// 每门课程一个表格：代码、名称、学分、若干 标签/值、简介
fn course_from_cells(cells: &[String]) -> Option<CourseContent> {
    if cells.len() < 3 {
        return None;
    }

    let mut course = CourseContent {
        code: cells[0].clone(),
        title: cells[1].clone(),
        au: first_token(&cells[2]),
        ..Default::default()
    };

    if cells.len() > 3 {
        let last = cells.len() - 1;
        course.description = cells[last].clone();

        let mut label: Option<&str> = None;
        for text in &cells[3..last] {
            match label {
                None => label = Some(text.as_str()),
                Some(current) => {
                    let continues = match Clause::from_label(current) {
                        Some(clause) => clause.append(&mut course, text),
                        None => text.ends_with("OR"),
                    };
                    if !continues {
                        label = None;
                    }
                }
            }
        }
    }

    Some(course)
}

/// 列表布局的解析状态
#[derive(Default)]
struct ListingState {
    current: Option<CourseContent>,
    pending: Option<Clause>,
}

impl ListingState {
    fn finish(&mut self, out: &mut Vec<CourseContent>) {
        self.pending = None;
        if let Some(course) = self.current.take() {
            if !course.code.is_empty() {
                out.push(course);
            }
        }
    }
}

fn extract_listing(table: ElementRef<'_>) -> ScrapeResult<Vec<CourseContent>> {
    let endpoint = Endpoint::CourseContent;
    let row_sel = selector(endpoint, "tr")?;
    let cell_sel = selector(endpoint, "td")?;

    let mut courses = Vec::new();
    let mut state = ListingState::default();

    for row in table.select(&row_sel).skip(1) {
        let cells: Vec<String> = row
            .select(&cell_sel)
            .map(|cell| normalize(&cell.text().collect::<String>()))
            .collect();
        let texts: Vec<&str> = cells.iter().map(String::as_str).filter(|t| !t.is_empty()).collect();

        if texts.is_empty() {
            state.finish(&mut courses);
            continue;
        }

        if state.current.is_none() {
            // 课程首行：代码、名称、学分、开课单位
            if texts.len() >= 3 {
                state.current = Some(CourseContent {
                    code: texts[0].to_string(),
                    title: texts[1].to_string(),
                    au: first_token(texts[2]),
                    ..Default::default()
                });
            }
            continue;
        }
        let Some(course) = state.current.as_mut() else {
            continue;
        };

        if let Some(clause) = Clause::from_label(texts[0]) {
            let value = texts[1..].join(" ");
            state.pending = if value.is_empty() || clause.append(course, &value) {
                Some(clause)
            } else {
                None
            };
        } else if let Some(clause) = state.pending {
            let value = texts.join(" ");
            if !clause.append(course, &value) {
                state.pending = None;
            }
        } else {
            push_joined(&mut course.description, &texts.join(" "));
        }
    }

    state.finish(&mut courses);
    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PER_COURSE: &str = r##"
        <html><body>
        <table>
          <tr><td><b><font color="#0000FF">SC1003</font></b></td>
              <td><b><font color="#0000FF">INTRODUCTION TO COMPUTATIONAL THINKING</font></b></td>
              <td><b><font color="#0000FF">3.0 AU</font></b></td></tr>
          <tr><td><font color="#FF00FF">Prerequisite:</font></td><td><font color="#FF00FF">MH1810 OR</font></td></tr>
          <tr><td></td><td><font color="#FF00FF">MH1812</font></td></tr>
          <tr><td><font color="#FF00FF">Grade Type:</font></td><td><font color="#FF00FF">Letter Graded</font></td></tr>
          <tr><td colspan="3"><font size="2">This course introduces   computational thinking.</font></td></tr>
        </table>
        <table>
          <tr><td><font>SC1004</font></td><td><font>LINEAR ALGEBRA</font></td><td><font>4.0 AU</font></td></tr>
          <tr><td colspan="3"><font>Vectors and matrices.</font></td></tr>
        </table>
        </body></html>
    "##;

    const LISTING: &str = r#"
        <html><body>
        <table>
          <tr><td>Course Code</td><td>Title</td><td>AU</td><td>Dept</td></tr>
          <tr><td>HW0001</td><td>ACADEMIC COMMUNICATION</td><td>2.0 AU</td><td>LMS</td></tr>
          <tr><td>Mutually exclusive with:</td><td>HW0002 OR</td><td></td><td></td></tr>
          <tr><td></td><td>HW0003</td><td></td><td></td></tr>
          <tr><td>Communicating in academic settings.</td><td></td><td></td><td></td></tr>
          <tr><td>&nbsp;</td><td></td><td></td><td></td></tr>
          <tr><td>HW0210</td><td>PROFESSIONAL COMMUNICATION</td><td>3.0 AU</td><td>LMS</td></tr>
          <tr><td>Grade Type:</td><td>Pass/Fail</td><td></td><td></td></tr>
          <tr><td>Writing for the workplace.</td><td></td><td></td><td></td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_per_course_layout() {
        let courses = extract_courses(PER_COURSE).unwrap();
        assert_eq!(courses.len(), 2);

        let first = &courses[0];
        assert_eq!(first.code, "SC1003");
        assert_eq!(first.title, "INTRODUCTION TO COMPUTATIONAL THINKING");
        assert_eq!(first.au, "3.0");
        assert_eq!(first.prerequisite, "MH1810 OR MH1812");
        assert_eq!(first.grade_type, "Letter Graded");
        assert_eq!(first.description, "This course introduces computational thinking.");

        assert_eq!(courses[1].code, "SC1004");
        assert_eq!(courses[1].au, "4.0");
        assert_eq!(courses[1].description, "Vectors and matrices.");
        assert!(courses[1].prerequisite.is_empty());
    }

    #[test]
    fn test_listing_layout() {
        let courses = extract_courses(LISTING).unwrap();
        assert_eq!(courses.len(), 2);

        assert_eq!(courses[0].code, "HW0001");
        assert_eq!(courses[0].au, "2.0");
        assert_eq!(courses[0].mutually_exclusive, "HW0002 OR HW0003");
        assert_eq!(courses[0].description, "Communicating in academic settings.");

        assert_eq!(courses[1].code, "HW0210");
        assert_eq!(courses[1].grade_type, "Pass/Fail");
        assert_eq!(courses[1].description, "Writing for the workplace.");
    }

    #[test]
    fn test_page_without_tables_is_rejected() {
        let err = extract_courses("<html><body><p>No record found</p></body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::Extraction { .. }));
    }
}
