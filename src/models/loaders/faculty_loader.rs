use crate::error::{ScrapeError, ScrapeResult};
use crate::models::faculty::{Faculty, FacultyTable};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// 从 JSON 文件加载学院对照表
pub async fn load_faculty_table(path: &Path) -> ScrapeResult<FacultyTable> {
    let path_display = path.display().to_string();

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ScrapeError::Faculty {
            path: path_display.clone(),
            reason: e.to_string(),
        })?;

    let table = parse_faculty_table(&content).map_err(|e| ScrapeError::Faculty {
        path: path_display.clone(),
        reason: e.to_string(),
    })?;

    tracing::info!("已加载学院对照表: {} 个前缀 ({})", table.len(), path_display);
    Ok(table)
}

/// 解析 `{"AA;AB": {"name": .., "school": ..}}` 格式的对照表
pub fn parse_faculty_table(content: &str) -> serde_json::Result<FacultyTable> {
    let grouped: HashMap<String, Faculty> = serde_json::from_str(content)?;
    Ok(FacultyTable::from_grouped(grouped))
}
