//! 运行统计

use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::aggregator::MergeOutcome;

/// 流水线的三个阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// 课程内容
    Content,
    /// 时间表（同时产生考试查询）
    Schedule,
    /// 考试安排
    Exam,
}

impl Stage {
    pub fn tag(self) -> &'static str {
        match self {
            Stage::Content => "[Stage A]",
            Stage::Schedule => "[Stage B]",
            Stage::Exam => "[Stage C]",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// 单个阶段的计数器，worker 之间共享
#[derive(Debug, Default)]
pub(crate) struct StageCounters {
    processed: AtomicUsize,
    skipped: AtomicUsize,
    panicked: AtomicUsize,
}

impl StageCounters {
    pub(crate) fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_panicked(&self) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, stage: Stage) -> StageReport {
        StageReport {
            name: stage.tag(),
            processed: self.processed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
        }
    }
}

/// 整条流水线的计数器
#[derive(Debug, Default)]
pub(crate) struct PipelineCounters {
    pub(crate) content: StageCounters,
    pub(crate) schedule: StageCounters,
    pub(crate) exam: StageCounters,
    exam_items_emitted: AtomicUsize,
    merges_created: AtomicUsize,
    merges_updated: AtomicUsize,
    merges_unchanged: AtomicUsize,
    merges_ignored: AtomicUsize,
}

impl PipelineCounters {
    pub(crate) fn stage(&self, stage: Stage) -> &StageCounters {
        match stage {
            Stage::Content => &self.content,
            Stage::Schedule => &self.schedule,
            Stage::Exam => &self.exam,
        }
    }

    pub(crate) fn record_exam_emitted(&self) {
        self.exam_items_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_merge(&self, outcome: MergeOutcome) {
        let counter = match outcome {
            MergeOutcome::Created => &self.merges_created,
            MergeOutcome::Updated => &self.merges_updated,
            MergeOutcome::Unchanged => &self.merges_unchanged,
            MergeOutcome::Ignored => &self.merges_ignored,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn report(&self, merged_records: usize) -> PipelineReport {
        PipelineReport {
            content: self.content.snapshot(Stage::Content),
            schedule: self.schedule.snapshot(Stage::Schedule),
            exam: self.exam.snapshot(Stage::Exam),
            exam_items_emitted: self.exam_items_emitted.load(Ordering::Relaxed),
            merges: MergeStats {
                created: self.merges_created.load(Ordering::Relaxed),
                updated: self.merges_updated.load(Ordering::Relaxed),
                unchanged: self.merges_unchanged.load(Ordering::Relaxed),
                ignored: self.merges_ignored.load(Ordering::Relaxed),
            },
            merged_records,
        }
    }
}

/// 单个阶段的统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub name: &'static str,
    /// 成功处理的工作项
    pub processed: usize,
    /// 请求或解析失败而跳过的工作项
    pub skipped: usize,
    /// 异常退出的 worker
    pub panicked: usize,
}

/// 各类合并结果的次数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub ignored: usize,
}

/// 一次运行的统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    pub content: StageReport,
    pub schedule: StageReport,
    pub exam: StageReport,
    /// Stage B 发出的考试查询数量
    pub exam_items_emitted: usize,
    pub merges: MergeStats,
    /// 聚合器中的课程数量
    pub merged_records: usize,
}

impl PipelineReport {
    pub fn stages(&self) -> [&StageReport; 3] {
        [&self.content, &self.schedule, &self.exam]
    }
}
