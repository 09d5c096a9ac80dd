//! 合并聚合器
//!
//! 按课程代码保存三种片段。每次更新都在 `DashMap::entry` 持有的分片写锁内
//! 完成 读取 → 合并 → 写回，同一个 key 的并发更新不会互相覆盖。

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::models::{CombinedRecord, CourseContent, ExamEntry, ScheduleEntry};

/// 一次部分更新，未设置的片段保持原值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialUpdate {
    pub content: Option<CourseContent>,
    pub schedule: Option<Vec<ScheduleEntry>>,
    pub exam: Option<ExamEntry>,
}

impl PartialUpdate {
    pub fn content(content: CourseContent) -> Self {
        Self {
            content: Some(content),
            ..Default::default()
        }
    }

    pub fn schedule(entries: Vec<ScheduleEntry>) -> Self {
        Self {
            schedule: Some(entries),
            ..Default::default()
        }
    }

    pub fn exam(exam: ExamEntry) -> Self {
        Self {
            exam: Some(exam),
            ..Default::default()
        }
    }

    /// 空片段视为"没有数据"
    fn without_empty(self) -> Self {
        Self {
            content: self.content.filter(|c| !c.is_empty()),
            schedule: self
                .schedule
                .filter(|entries| entries.iter().any(|e| !e.is_empty())),
            exam: self.exam.filter(|e| !e.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.schedule.is_none() && self.exam.is_none()
    }

    /// 写入记录，返回记录是否发生变化
    fn apply_to(self, record: &mut CombinedRecord) -> bool {
        let mut changed = false;
        changed |= replace_if_different(&mut record.content, self.content);
        changed |= replace_if_different(&mut record.schedule, self.schedule);
        changed |= replace_if_different(&mut record.exam, self.exam);
        changed
    }
}

fn replace_if_different<T: PartialEq>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(value) if slot.as_ref() != Some(&value) => {
            *slot = Some(value);
            true
        }
        _ => false,
    }
}

/// 一次合并的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// 新建了记录
    Created,
    /// 已有记录被修改
    Updated,
    /// 内容相同，无变化
    Unchanged,
    /// 空更新或空课程代码，被忽略
    Ignored,
}

/// 合并聚合器，由编排层持有并以 `Arc` 分发给所有 worker
#[derive(Debug, Default)]
pub struct MergeAggregator {
    records: DashMap<String, CombinedRecord>,
}

impl MergeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 原子地把部分更新合并进 `code` 对应的记录
    pub fn merge(&self, code: &str, update: PartialUpdate) -> MergeOutcome {
        let code = code.trim();
        if code.is_empty() {
            return MergeOutcome::Ignored;
        }

        let update = update.without_empty();
        if update.is_empty() {
            return MergeOutcome::Ignored;
        }

        match self.records.entry(code.to_string()) {
            Entry::Occupied(mut existing) => {
                if update.apply_to(existing.get_mut()) {
                    MergeOutcome::Updated
                } else {
                    MergeOutcome::Unchanged
                }
            }
            Entry::Vacant(slot) => {
                let mut record = CombinedRecord::default();
                update.apply_to(&mut record);
                slot.insert(record);
                MergeOutcome::Created
            }
        }
    }

    /// 某门课程当前的记录（副本）
    pub fn get(&self, code: &str) -> Option<CombinedRecord> {
        self.records.get(code).map(|record| record.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 取出全部记录，按课程代码排序
    ///
    /// 需要所有权，因此只能在所有 worker 都退出之后调用。
    pub fn into_records(self) -> Vec<(String, CombinedRecord)> {
        let mut records: Vec<_> = self.records.into_iter().collect();
        records.sort_by(|a, b| a.0.cmp(&b.0));
        records
    }
}
