//! 片段获取服务 - 业务能力层
//!
//! 每个方法处理一个工作项：构造请求 → 提交 → 解析。不接触聚合器和队列。

use std::sync::Arc;

use tracing::debug;

use crate::api::{CourseListRequest, Endpoint, ExamRequest, ScheduleRequest};
use crate::clients::FormSubmitter;
use crate::error::ScrapeResult;
use crate::extractors::{extract_courses, extract_exams, extract_schedules};
use crate::models::{CourseContent, ExamEntry, ExamWork, FacultyTable, GroupWork, ModuleSchedule};

/// 片段获取服务，可在多个 worker 之间 clone 共享
#[derive(Clone)]
pub struct FragmentService {
    submitter: Arc<dyn FormSubmitter>,
    faculties: Arc<FacultyTable>,
}

impl FragmentService {
    pub fn new(submitter: Arc<dyn FormSubmitter>, faculties: Arc<FacultyTable>) -> Self {
        Self {
            submitter,
            faculties,
        }
    }

    /// 某个课程组的课程内容（已补齐学院）
    pub async fn fetch_content(&self, work: &GroupWork) -> ScrapeResult<Vec<CourseContent>> {
        let form = CourseListRequest::content(&work.term, &work.group).to_form();
        let html = self.submitter.submit(Endpoint::CourseContent, &form).await?;

        let mut courses = extract_courses(&html)?;
        courses.retain(|course| !course.is_empty());
        for course in &mut courses {
            if let Some(faculty) = self.faculties.resolve(&course.code) {
                course.faculty = faculty.clone();
            }
        }

        debug!("{} 解析出 {} 门课程", work, courses.len());
        Ok(courses)
    }

    /// 某个课程组的时间表
    pub async fn fetch_schedules(&self, work: &GroupWork) -> ScrapeResult<Vec<ModuleSchedule>> {
        let form = ScheduleRequest::new(&work.term, &work.group).to_form();
        let html = self.submitter.submit(Endpoint::ClassSchedule, &form).await?;

        let mut modules = extract_schedules(&html)?;
        modules.retain(|module| !module.is_empty());

        debug!("{} 解析出 {} 门课程的时间表", work, modules.len());
        Ok(modules)
    }

    /// 某门课程的考试安排
    pub async fn fetch_exams(&self, work: &ExamWork) -> ScrapeResult<Vec<ExamEntry>> {
        let form = ExamRequest::new(&work.term, &work.code).to_form();
        let html = self.submitter.submit(Endpoint::ExamSchedule, &form).await?;

        let exams = extract_exams(&html)?;
        debug!("{} 解析出 {} 条考试安排", work, exams.len());
        Ok(exams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FormFields;
    use crate::error::ScrapeError;
    use crate::models::Faculty;
    use async_trait::async_trait;
    use std::collections::HashMap;

    /// 按端点返回固定页面
    struct CannedPages(HashMap<Endpoint, &'static str>);

    #[async_trait]
    impl FormSubmitter for CannedPages {
        async fn submit(&self, endpoint: Endpoint, form: &FormFields) -> ScrapeResult<String> {
            form.encode(endpoint)?;
            self.0
                .get(&endpoint)
                .map(|page| page.to_string())
                .ok_or_else(|| ScrapeError::retrieval(endpoint, 3, "HTTP 500"))
        }
    }

    fn faculties() -> Arc<FacultyTable> {
        let mut grouped = HashMap::new();
        grouped.insert(
            "SC;MH".to_string(),
            Faculty {
                name: "College of Computing and Data Science".to_string(),
                school: "CCDS".to_string(),
            },
        );
        Arc::new(FacultyTable::from_grouped(grouped))
    }

    fn service(pages: &[(Endpoint, &'static str)]) -> FragmentService {
        let pages = CannedPages(pages.iter().copied().collect());
        FragmentService::new(Arc::new(pages), faculties())
    }

    #[tokio::test]
    async fn test_content_gets_faculty() {
        let page = r#"<table>
            <tr><td><font>SC1003</font></td><td><font>INTRO</font></td><td><font>3.0 AU</font></td></tr>
            <tr><td><font>Computational thinking.</font></td></tr>
        </table>"#;
        let service = service(&[(Endpoint::CourseContent, page)]);

        let courses = service
            .fetch_content(&GroupWork::new("2023_1", "CSC;;1;F"))
            .await
            .unwrap();

        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].faculty.school, "CCDS");
    }

    #[tokio::test]
    async fn test_retrieval_error_is_returned() {
        let service = service(&[]);
        let err = service
            .fetch_exams(&ExamWork::new("2023_1", "SC1003"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScrapeError::Retrieval { .. }));
        assert!(!err.is_fatal());
    }
}
