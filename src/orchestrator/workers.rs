//! 三个阶段的 worker 循环
//!
//! 每个 worker 反复从共享接收端取工作项，队列关闭（`recv()` 返回 `None`）即退出。
//! 单个工作项失败只记录日志并计数，不影响后续工作项。

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::aggregator::{MergeAggregator, PartialUpdate};
use crate::models::{ExamWork, GroupWork};
use crate::orchestrator::report::{PipelineCounters, Stage};
use crate::services::FragmentService;
use crate::utils::logging::truncate_text;

/// 日志中错误信息的最大长度
const MAX_ERROR_LEN: usize = 300;

/// 一个阶段的 N 个 worker 共享同一个接收端
pub(crate) type SharedReceiver<T> = Arc<Mutex<mpsc::Receiver<T>>>;

/// worker 共享的依赖
pub(crate) struct StageContext {
    pub(crate) fragments: FragmentService,
    pub(crate) aggregator: Arc<MergeAggregator>,
    pub(crate) counters: Arc<PipelineCounters>,
}

async fn next_item<T>(queue: &SharedReceiver<T>) -> Option<T> {
    queue.lock().await.recv().await
}

/// Stage A：课程内容
pub(crate) async fn content_worker(
    id: usize,
    queue: SharedReceiver<GroupWork>,
    ctx: Arc<StageContext>,
) {
    let stage = Stage::Content;
    debug!("{} worker {} 启动", stage, id);

    while let Some(work) = next_item(&queue).await {
        info!("{} 处理课程内容 {}", stage, work);

        match ctx.fragments.fetch_content(&work).await {
            Ok(courses) => {
                for course in courses {
                    let code = course.code.clone();
                    let outcome = ctx.aggregator.merge(&code, PartialUpdate::content(course));
                    ctx.counters.record_merge(outcome);
                }
                ctx.counters.stage(stage).record_processed();
            }
            Err(e) => {
                warn!("{} 跳过 {}: {}", stage, work, truncate_text(&e.to_string(), MAX_ERROR_LEN));
                ctx.counters.stage(stage).record_skipped();
            }
        }
    }

    debug!("{} worker {} 退出", stage, id);
}

/// Stage B：时间表，并为每门课程发出考试查询
pub(crate) async fn schedule_worker(
    id: usize,
    queue: SharedReceiver<GroupWork>,
    exam_queue: mpsc::Sender<ExamWork>,
    ctx: Arc<StageContext>,
) {
    let stage = Stage::Schedule;
    debug!("{} worker {} 启动", stage, id);

    while let Some(work) = next_item(&queue).await {
        info!("{} 处理时间表 {}", stage, work);

        let modules = match ctx.fragments.fetch_schedules(&work).await {
            Ok(modules) => modules,
            Err(e) => {
                warn!("{} 跳过 {}: {}", stage, work, truncate_text(&e.to_string(), MAX_ERROR_LEN));
                ctx.counters.stage(stage).record_skipped();
                continue;
            }
        };

        let mut codes = Vec::with_capacity(modules.len());
        for module in modules {
            if !module.code.is_empty() {
                codes.push(module.code.clone());
            }
            let outcome = ctx
                .aggregator
                .merge(&module.code, PartialUpdate::schedule(module.entries));
            ctx.counters.record_merge(outcome);
        }
        ctx.counters.stage(stage).record_processed();

        // 队列满时在这里等待 Stage C
        for code in codes {
            let exam_work = ExamWork::new(work.term.clone(), code);
            if let Err(e) = exam_queue.send(exam_work).await {
                warn!("{} 考试队列已关闭，丢弃 {}", stage, e.0);
                continue;
            }
            ctx.counters.record_exam_emitted();
        }
    }

    debug!("{} worker {} 退出", stage, id);
}

/// Stage C：考试安排
pub(crate) async fn exam_worker(id: usize, queue: SharedReceiver<ExamWork>, ctx: Arc<StageContext>) {
    let stage = Stage::Exam;
    debug!("{} worker {} 启动", stage, id);

    while let Some(work) = next_item(&queue).await {
        info!("{} 处理考试安排 {}", stage, work);

        match ctx.fragments.fetch_exams(&work).await {
            Ok(exams) => {
                for exam in exams {
                    // 以考试行自己的课程代码为准
                    let code = if exam.code.is_empty() {
                        work.code.clone()
                    } else {
                        exam.code.clone()
                    };
                    let outcome = ctx.aggregator.merge(&code, PartialUpdate::exam(exam));
                    ctx.counters.record_merge(outcome);
                }
                ctx.counters.stage(stage).record_processed();
            }
            Err(e) => {
                warn!("{} 跳过 {}: {}", stage, work, truncate_text(&e.to_string(), MAX_ERROR_LEN));
                ctx.counters.stage(stage).record_skipped();
            }
        }
    }

    debug!("{} worker {} 退出", stage, id);
}
