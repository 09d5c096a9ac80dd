//! 文本工具

use scraper::{ElementRef, Selector};

use crate::api::Endpoint;
use crate::error::{ScrapeError, ScrapeResult};

/// 合并连续空白并去掉首尾空白（包括 `&nbsp;`）
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 元素的全部文本，已规范化
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize(&element.text().collect::<String>())
}

/// `"3.0 AU"` → `"3.0"`
pub fn first_token(text: &str) -> String {
    text.split_whitespace().next().unwrap_or_default().to_string()
}

pub(crate) fn selector(endpoint: Endpoint, css: &str) -> ScrapeResult<Selector> {
    Selector::parse(css)
        .map_err(|e| ScrapeError::extraction(endpoint, format!("无效的选择器 {}: {:?}", css, e)))
}
