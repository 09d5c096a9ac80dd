//! 端到端：模拟选课系统，跑完整条流水线

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use course_scraper::api::{Endpoint, FormFields};
use course_scraper::clients::FormSubmitter;
use course_scraper::error::{ScrapeError, ScrapeResult};
use course_scraper::models::{Faculty, FacultyTable, WorkPlan};
use course_scraper::orchestrator::{exit_status, App, Pipeline, PipelineSizing, EXIT_DISCOVERY_FAILED};
use course_scraper::services::discover_work_for;
use course_scraper::sink::{LocalFileSink, MODULE_LIST_FILE};
use course_scraper::Config;

const BOOTSTRAP: &str = include_str!("fixtures/bootstrap.html");
const CONTENT_CSC: &str = include_str!("fixtures/content_csc.html");
const CONTENT_MTH: &str = include_str!("fixtures/content_mth.html");
const SCHEDULE_CSC: &str = include_str!("fixtures/schedule_csc.html");
const SCHEDULE_MTH: &str = include_str!("fixtures/schedule_mth.html");
const EXAM: &str = include_str!("fixtures/exam.html");

const CODES: [&str; 4] = ["MH1810", "MH1812", "SC1003", "SC1004"];

/// 模拟的选课系统；考试端点故意变慢
struct MockRegistry {
    exam_delay: Duration,
    failing_content_group: Option<&'static str>,
    bootstrap_down: bool,
    panicking_endpoint: Option<Endpoint>,
    exam_calls: AtomicUsize,
}

impl MockRegistry {
    fn new(exam_delay: Duration) -> Self {
        Self {
            exam_delay,
            failing_content_group: None,
            bootstrap_down: false,
            panicking_endpoint: None,
            exam_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FormSubmitter for MockRegistry {
    async fn submit(&self, endpoint: Endpoint, form: &FormFields) -> ScrapeResult<String> {
        // 与真实客户端一样先按字段表编码
        form.encode(endpoint)?;
        if self.panicking_endpoint == Some(endpoint) {
            panic!("mock registry crashed on {endpoint:?}");
        }

        match endpoint {
            Endpoint::Bootstrap if self.bootstrap_down => {
                Err(ScrapeError::retrieval(endpoint, 3, "connection refused"))
            }
            Endpoint::Bootstrap => Ok(BOOTSTRAP.to_string()),
            Endpoint::CourseContent => {
                let group = form.get("FilterParam").unwrap_or_default();
                if Some(group) == self.failing_content_group {
                    return Err(ScrapeError::retrieval(endpoint, 3, "HTTP 502"));
                }
                match group {
                    "CSC;;1;F" => Ok(CONTENT_CSC.to_string()),
                    "MTH;;1;F" => Ok(CONTENT_MTH.to_string()),
                    other => Err(ScrapeError::extraction(endpoint, format!("unknown group {other}"))),
                }
            }
            Endpoint::ClassSchedule => {
                assert_eq!(form.get("AcadYearSem"), Some("2023;1"));
                match form.get("FilterParam").unwrap_or_default() {
                    "CSC;;1;F" => Ok(SCHEDULE_CSC.to_string()),
                    "MTH;;1;F" => Ok(SCHEDULE_MTH.to_string()),
                    other => Err(ScrapeError::extraction(endpoint, format!("unknown group {other}"))),
                }
            }
            Endpoint::ExamSchedule => {
                tokio::time::sleep(self.exam_delay).await;
                self.exam_calls.fetch_add(1, Ordering::SeqCst);
                let code = form.get("ExamSubject").unwrap_or_default();
                Ok(EXAM.replace("{code}", code))
            }
        }
    }
}

fn faculties() -> Arc<FacultyTable> {
    let mut grouped = HashMap::new();
    grouped.insert(
        "SC".to_string(),
        Faculty {
            name: "College of Computing and Data Science".to_string(),
            school: "CCDS".to_string(),
        },
    );
    grouped.insert(
        "MH;MAS".to_string(),
        Faculty {
            name: "College of Science".to_string(),
            school: "SPMS".to_string(),
        },
    );
    Arc::new(FacultyTable::from_grouped(grouped))
}

fn plan() -> WorkPlan {
    WorkPlan {
        term: "2023_1".to_string(),
        groups: vec!["CSC;;1;F".to_string(), "MTH;;1;F".to_string()],
    }
}

/// 每个池一个 worker、队列容量 1，Stage B 必然会在考试队列上阻塞
fn tight_sizing() -> PipelineSizing {
    PipelineSizing {
        content_workers: 1,
        schedule_workers: 1,
        exam_workers: 1,
        queue_capacity: 1,
        exam_queue_capacity: 1,
    }
}

#[tokio::test]
async fn test_discovery_from_fixture() {
    let registry = MockRegistry::new(Duration::ZERO);
    let plan = discover_work_for(&registry, "2023_1").await.unwrap();

    assert_eq!(plan, self::plan());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_delayed_exams_are_all_merged() {
    let registry = Arc::new(MockRegistry::new(Duration::from_millis(50)));
    let pipeline = Pipeline::new(tight_sizing(), registry.clone(), faculties());

    let output = pipeline.run(&plan()).await.unwrap();

    assert_eq!(registry.exam_calls.load(Ordering::SeqCst), CODES.len());
    assert_eq!(output.report.exam_items_emitted, CODES.len());
    assert_eq!(output.report.exam.processed, CODES.len());
    assert_eq!(output.report.merged_records, CODES.len());
    // 每门课三个片段各合并一次，第一次新建
    assert_eq!(output.report.merges.created, CODES.len());
    assert_eq!(output.report.merges.updated, CODES.len() * 2);

    let codes: Vec<&str> = output.records.iter().map(|(code, _)| code.as_str()).collect();
    assert_eq!(codes, CODES);
    for (code, record) in &output.records {
        assert!(record.is_complete(), "{code} 缺少片段: {record:?}");
        assert_eq!(record.exam.as_ref().unwrap().code, *code);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_default_sizing_merges_all_fragments() {
    let registry = Arc::new(MockRegistry::new(Duration::from_millis(20)));
    let sizing = PipelineSizing::from_config(&Config::default());
    let pipeline = Pipeline::new(sizing, registry, faculties());

    let output = pipeline.run(&plan()).await.unwrap();
    let records: HashMap<_, _> = output.records.into_iter().collect();

    let sc1004 = &records["SC1004"];
    let content = sc1004.content.as_ref().unwrap();
    assert_eq!(content.prerequisite, "MH1810 OR MH1812");
    assert_eq!(content.faculty.school, "CCDS");
    let schedule = sc1004.schedule.as_ref().unwrap();
    assert_eq!(schedule[1].index, "10201");
    assert!(schedule[1].teaching_weeks.is_empty());

    let mh1812 = &records["MH1812"];
    assert_eq!(mh1812.content.as_ref().unwrap().grade_type, "Letter Graded");
    assert_eq!(mh1812.content.as_ref().unwrap().faculty.school, "SPMS");
    assert_eq!(mh1812.schedule.as_ref().unwrap()[1].teaching_weeks, vec![3, 5, 7]);

    let sc1003 = &records["SC1003"].schedule.as_ref().unwrap()[3];
    assert_eq!(sc1003.index, "10102");
    assert_eq!(sc1003.teaching_weeks, vec![1, 2, 3, 4, 6, 7, 8, 9, 11, 12, 13]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_item_is_skipped_not_fatal() {
    let mut registry = MockRegistry::new(Duration::from_millis(5));
    registry.failing_content_group = Some("MTH;;1;F");
    let pipeline = Pipeline::new(tight_sizing(), Arc::new(registry), faculties());

    let output = pipeline.run(&plan()).await.unwrap();

    assert_eq!(output.report.content.processed, 1);
    assert_eq!(output.report.content.skipped, 1);
    assert_eq!(output.report.merged_records, CODES.len());

    let records: HashMap<_, _> = output.records.into_iter().collect();
    let mh1810 = &records["MH1810"];
    assert!(mh1810.content.is_none());
    assert!(mh1810.schedule.is_some());
    assert!(mh1810.exam.is_some());
    assert!(records["SC1003"].is_complete());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_app_writes_term_directory() {
    let out = tempfile::tempdir().unwrap();
    let config = Config {
        output_dir: out.path().to_string_lossy().into_owned(),
        ..Default::default()
    };
    let app = App::with_parts(
        config,
        Arc::new(MockRegistry::new(Duration::ZERO)),
        faculties(),
        Box::new(LocalFileSink::new(out.path())),
    );

    let report = app.run().await.unwrap();
    assert_eq!(report.merged_records, CODES.len());

    let term_dir = out.path().join("2023_1");
    for code in CODES {
        assert!(term_dir.join(format!("{code}.json")).exists(), "缺少 {code}.json");
    }
    let index: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(term_dir.join(MODULE_LIST_FILE)).unwrap()).unwrap();
    assert_eq!(index.as_array().unwrap().len(), CODES.len());
}

#[tokio::test]
async fn test_discovery_failure_maps_to_exit_status() {
    let mut registry = MockRegistry::new(Duration::ZERO);
    registry.bootstrap_down = true;
    let out = tempfile::tempdir().unwrap();
    let app = App::with_parts(
        Config::default(),
        Arc::new(registry),
        faculties(),
        Box::new(LocalFileSink::new(out.path())),
    );

    let err = app.run().await.unwrap_err();
    assert_eq!(exit_status(&err), EXIT_DISCOVERY_FAILED);
    assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dead_exam_pool_does_not_block_run() {
    let mut registry = MockRegistry::new(Duration::ZERO);
    registry.panicking_endpoint = Some(Endpoint::ExamSchedule);
    let sizing = tight_sizing();
    let pipeline = Pipeline::new(sizing, Arc::new(registry), faculties());

    let output = tokio::time::timeout(Duration::from_secs(10), pipeline.run(&plan()))
        .await
        .expect("Stage C 全部退出后流水线仍在等待")
        .unwrap();

    assert_eq!(output.report.exam.panicked, sizing.exam_workers);
    assert_eq!(output.report.exam.processed, 0);
    assert_eq!(output.report.content.processed, 2);
    assert_eq!(output.report.schedule.processed, 2);
    assert_eq!(output.report.merged_records, CODES.len());
    for (code, record) in &output.records {
        assert!(record.content.is_some(), "{code} 缺少内容");
        assert!(record.schedule.is_some(), "{code} 缺少时间表");
        assert!(record.exam.is_none());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_dead_content_pool_stops_distribution() {
    let mut registry = MockRegistry::new(Duration::ZERO);
    registry.panicking_endpoint = Some(Endpoint::CourseContent);
    let sizing = tight_sizing();
    let pipeline = Pipeline::new(sizing, Arc::new(registry), faculties());

    let output = tokio::time::timeout(Duration::from_secs(10), pipeline.run(&plan()))
        .await
        .expect("Stage A 全部退出后流水线仍在等待")
        .unwrap();

    assert_eq!(output.report.content.panicked, sizing.content_workers);
    assert_eq!(output.report.content.processed, 0);
    assert_eq!(output.report.schedule.processed, 2);
    assert_eq!(output.report.exam.processed, CODES.len());
    for (_, record) in &output.records {
        assert!(record.content.is_none());
        assert!(record.exam.is_some());
    }
}
