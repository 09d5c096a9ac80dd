//! 写到本地目录：`<root>/<term>/<CODE>.json` + `<root>/<term>/moduleList.json`

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ScrapeError, ScrapeResult};
use crate::models::{CombinedRecord, ModuleLite};
use crate::sink::RecordSink;

/// 索引文件名
pub const MODULE_LIST_FILE: &str = "moduleList.json";

pub struct LocalFileSink {
    root: PathBuf,
}

impl LocalFileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ScrapeResult<()> {
        let display = path.display().to_string();
        let body = serde_json::to_vec_pretty(value).map_err(|e| ScrapeError::sink(&display, e))?;
        tokio::fs::write(path, body)
            .await
            .map_err(|e| ScrapeError::sink(display, e))
    }
}

/// 课程代码 → 文件名
fn file_name(code: &str) -> String {
    let safe: String = code
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("{}.json", safe)
}

#[async_trait]
impl RecordSink for LocalFileSink {
    async fn write_records(&self, term: &str, records: &[(String, CombinedRecord)]) -> ScrapeResult<usize> {
        let dir = self.root.join(term);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ScrapeError::sink(dir.display().to_string(), e))?;

        let mut module_list: Vec<ModuleLite> = Vec::new();
        for (code, record) in records {
            let path = dir.join(file_name(code));
            Self::write_json(&path, &record.to_export(code)).await?;
            debug!("已写出 {}", path.display());

            if let Some(lite) = record.to_lite() {
                module_list.push(lite);
            }
        }

        Self::write_json(&dir.join(MODULE_LIST_FILE), &module_list).await?;
        info!(
            "💾 已导出 {} 门课程到 {} (索引 {} 条)",
            records.len(),
            dir.display(),
            module_list.len()
        );

        Ok(records.len())
    }
}
