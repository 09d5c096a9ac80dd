//! 三阶段流水线 - 编排层
//!
//! ## 数据流
//!
//! ```text
//! WorkPlan ─┬─> content 队列 ──> Stage A ─┐
//!           └─> schedule 队列 ─> Stage B ─┼─> MergeAggregator
//!                                  │       │
//!                                  └─> exam 队列 ─> Stage C
//! ```
//!
//! ## 关闭顺序
//!
//! 1. 发完全部 A / B 工作项后关闭这两个队列
//! 2. 等待 Stage A 和 Stage B 的所有 worker 退出
//! 3. 关闭 exam 队列（Stage B 是它唯一的生产者）
//! 4. 等待 Stage C 的所有 worker 退出
//! 5. 之后才读取聚合器

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::aggregator::MergeAggregator;
use crate::clients::FormSubmitter;
use crate::config::Config;
use crate::error::{ScrapeError, ScrapeResult};
use crate::models::{CombinedRecord, FacultyTable, WorkPlan};
use crate::orchestrator::report::{PipelineCounters, PipelineReport, Stage};
use crate::orchestrator::workers::{content_worker, exam_worker, schedule_worker, StageContext};
use crate::services::FragmentService;
use crate::utils::logging::log_stage_drained;

/// 池大小与队列容量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSizing {
    pub content_workers: usize,
    pub schedule_workers: usize,
    pub exam_workers: usize,
    pub queue_capacity: usize,
    pub exam_queue_capacity: usize,
}

impl PipelineSizing {
    pub fn from_config(config: &Config) -> Self {
        Self {
            content_workers: config.content_workers,
            schedule_workers: config.schedule_workers,
            exam_workers: config.exam_workers,
            queue_capacity: config.queue_capacity,
            exam_queue_capacity: config.exam_queue_capacity(),
        }
    }

    fn validate(&self) -> ScrapeResult<()> {
        let all = [
            self.content_workers,
            self.schedule_workers,
            self.exam_workers,
            self.queue_capacity,
            self.exam_queue_capacity,
        ];
        if all.contains(&0) {
            return Err(ScrapeError::Pipeline {
                reason: format!("池大小和队列容量必须大于 0: {:?}", self),
            });
        }
        Ok(())
    }
}

/// 流水线运行结果
#[derive(Debug)]
pub struct PipelineOutput {
    pub report: PipelineReport,
    /// 按课程代码排序的最终记录
    pub records: Vec<(String, CombinedRecord)>,
}

/// 三阶段流水线
pub struct Pipeline {
    sizing: PipelineSizing,
    fragments: FragmentService,
}

impl Pipeline {
    pub fn new(
        sizing: PipelineSizing,
        submitter: Arc<dyn FormSubmitter>,
        faculties: Arc<FacultyTable>,
    ) -> Self {
        Self {
            sizing,
            fragments: FragmentService::new(submitter, faculties),
        }
    }

    /// 运行到三个阶段全部结束
    pub async fn run(&self, plan: &WorkPlan) -> ScrapeResult<PipelineOutput> {
        self.sizing.validate()?;

        let aggregator = Arc::new(MergeAggregator::new());
        let counters = Arc::new(PipelineCounters::default());
        let ctx = Arc::new(StageContext {
            fragments: self.fragments.clone(),
            aggregator: Arc::clone(&aggregator),
            counters: Arc::clone(&counters),
        });

        let (content_tx, content_rx) = mpsc::channel(self.sizing.queue_capacity);
        let (schedule_tx, schedule_rx) = mpsc::channel(self.sizing.queue_capacity);
        let (exam_tx, exam_rx) = mpsc::channel(self.sizing.exam_queue_capacity);
        let content_rx = Arc::new(Mutex::new(content_rx));
        let schedule_rx = Arc::new(Mutex::new(schedule_rx));
        let exam_rx = Arc::new(Mutex::new(exam_rx));

        let content_pool: Vec<JoinHandle<()>> = (0..self.sizing.content_workers)
            .map(|id| tokio::spawn(content_worker(id, Arc::clone(&content_rx), Arc::clone(&ctx))))
            .collect();
        let schedule_pool: Vec<JoinHandle<()>> = (0..self.sizing.schedule_workers)
            .map(|id| {
                tokio::spawn(schedule_worker(
                    id,
                    Arc::clone(&schedule_rx),
                    exam_tx.clone(),
                    Arc::clone(&ctx),
                ))
            })
            .collect();
        let exam_pool: Vec<JoinHandle<()>> = (0..self.sizing.exam_workers)
            .map(|id| tokio::spawn(exam_worker(id, Arc::clone(&exam_rx), Arc::clone(&ctx))))
            .collect();
        // 接收端只由 worker 持有，整池退出后发送端才能感知
        drop(content_rx);
        drop(schedule_rx);
        drop(exam_rx);
        drop(ctx);

        // 1. 发出全部 A / B 工作项，然后关闭两个队列
        info!("📤 开始分发 {} 个课程组", plan.groups.len());
        let mut content_open = true;
        let mut schedule_open = true;
        for work in plan.group_work() {
            if content_open && content_tx.send(work.clone()).await.is_err() {
                error!("{} 所有 worker 都已退出，停止分发", Stage::Content);
                content_open = false;
            }
            if schedule_open && schedule_tx.send(work).await.is_err() {
                error!("{} 所有 worker 都已退出，停止分发", Stage::Schedule);
                schedule_open = false;
            }
        }
        drop(content_tx);
        drop(schedule_tx);

        // 2. 等待 Stage A / B 结束
        tokio::join!(
            join_pool(Stage::Content, content_pool, &counters),
            join_pool(Stage::Schedule, schedule_pool, &counters),
        );
        log_drained(Stage::Content, &counters);
        log_drained(Stage::Schedule, &counters);

        // 3. Stage B 已全部退出，关闭 exam 队列
        drop(exam_tx);

        // 4. 等待 Stage C 结束
        join_pool(Stage::Exam, exam_pool, &counters).await;
        log_drained(Stage::Exam, &counters);

        // 5. 所有 worker 都已释放聚合器
        let aggregator = Arc::try_unwrap(aggregator).map_err(|_| ScrapeError::Pipeline {
            reason: "仍有 worker 持有聚合器".to_string(),
        })?;
        let report = counters.report(aggregator.len());

        Ok(PipelineOutput {
            report,
            records: aggregator.into_records(),
        })
    }
}

/// 等待一个池的所有 worker；panic 只记录不传播
async fn join_pool(stage: Stage, pool: Vec<JoinHandle<()>>, counters: &PipelineCounters) {
    for result in join_all(pool).await {
        if let Err(e) = result {
            error!("{} worker 异常退出: {}", stage, e);
            counters.stage(stage).record_panicked();
        }
    }
}

fn log_drained(stage: Stage, counters: &PipelineCounters) {
    let snapshot = counters.stage(stage).snapshot(stage);
    log_stage_drained(snapshot.name, snapshot.processed, snapshot.skipped);
}
