//! 启动探测 - 业务能力层
//!
//! 一次初始页面请求，得到本次要抓取的学期与全部课程组。
//! 任何失败都是致命的：没有学期或课程组就没有可抓取的内容。

use tracing::{debug, info};

use crate::api::{CourseListRequest, Endpoint};
use crate::clients::FormSubmitter;
use crate::error::{ScrapeError, ScrapeResult};
use crate::extractors::extract_course_list;
use crate::models::term::current_term_now;
use crate::models::{select_latest_term, WorkPlan};

/// 以当前日期推算的学期发起探测
pub async fn discover_work<S>(submitter: &S) -> ScrapeResult<WorkPlan>
where
    S: FormSubmitter + ?Sized,
{
    discover_work_for(submitter, &current_term_now()).await
}

/// 以指定学期发起探测
pub async fn discover_work_for<S>(submitter: &S, bootstrap_term: &str) -> ScrapeResult<WorkPlan>
where
    S: FormSubmitter + ?Sized,
{
    info!("🔍 正在探测学期与课程组 (初始学期 {})", bootstrap_term);

    let form = CourseListRequest::bootstrap(bootstrap_term).to_form();
    let html = submitter
        .submit(Endpoint::Bootstrap, &form)
        .await
        .map_err(|e| ScrapeError::discovery(format!("初始页面请求失败: {}", e)))?;

    let page = extract_course_list(&html)
        .map_err(|e| ScrapeError::discovery(format!("初始页面解析失败: {}", e)))?;
    debug!("页面中共有 {} 个学期", page.terms.len());

    let latest = select_latest_term(&page.terms)
        .ok_or_else(|| ScrapeError::discovery("页面中没有可选学期"))?;

    if page.groups.is_empty() {
        return Err(ScrapeError::discovery(format!(
            "学期 {} 没有可抓取的课程组",
            latest.value
        )));
    }

    Ok(WorkPlan {
        term: latest.value.clone(),
        groups: page.groups,
    })
}
