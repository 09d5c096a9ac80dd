use std::path::Path;

use serde::Deserialize;

use crate::api::EndpointUrls;
use crate::error::{ScrapeError, ScrapeResult};

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "SCRAPER_CONFIG";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stage A（课程内容）worker 数量
    pub content_workers: usize,
    /// Stage B（时间表）worker 数量
    pub schedule_workers: usize,
    /// Stage C（考试安排）worker 数量
    pub exam_workers: usize,
    /// Stage A / B 队列容量
    pub queue_capacity: usize,
    /// 考试队列容量 = queue_capacity × 该倍数
    pub exam_queue_multiplier: usize,
    /// 每个请求的最大尝试次数
    pub max_retries: u32,
    /// 重试基础延迟（毫秒）
    pub retry_base_delay_ms: u64,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    pub endpoints: EndpointUrls,
    /// 学院对照表
    pub faculty_file: String,
    /// 导出目录
    pub output_dir: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_workers: 3,
            schedule_workers: 3,
            exam_workers: 6,
            queue_capacity: 3,
            exam_queue_multiplier: 2,
            max_retries: 3,
            retry_base_delay_ms: 5000,
            request_timeout_secs: 30,
            endpoints: EndpointUrls::default(),
            faculty_file: "data/faculty.json".to_string(),
            output_dir: "out".to_string(),
            output_log_file: "scrape_log.txt".to_string(),
            verbose_logging: false,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> Self {
        Self::default().overlay_env()
    }

    /// 读取 TOML 配置文件，缺省字段取默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> ScrapeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScrapeError::config(format!("无法读取 {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ScrapeResult<Self> {
        toml::from_str(content).map_err(|e| ScrapeError::config(format!("TOML 解析失败: {}", e)))
    }

    /// `SCRAPER_CONFIG` 指定的文件（可选），再用环境变量覆盖，最后校验
    pub fn load() -> ScrapeResult<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_toml_file(path.trim())?.overlay_env(),
            _ => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    fn overlay_env(self) -> Self {
        let base = self;
        Self {
            content_workers: env_parse("CONTENT_WORKERS").unwrap_or(base.content_workers),
            schedule_workers: env_parse("SCHEDULE_WORKERS").unwrap_or(base.schedule_workers),
            exam_workers: env_parse("EXAM_WORKERS").unwrap_or(base.exam_workers),
            queue_capacity: env_parse("QUEUE_CAPACITY").unwrap_or(base.queue_capacity),
            exam_queue_multiplier: env_parse("EXAM_QUEUE_MULTIPLIER").unwrap_or(base.exam_queue_multiplier),
            max_retries: env_parse("MAX_RETRIES").unwrap_or(base.max_retries),
            retry_base_delay_ms: env_parse("RETRY_BASE_DELAY_MS").unwrap_or(base.retry_base_delay_ms),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS").unwrap_or(base.request_timeout_secs),
            endpoints: EndpointUrls {
                bootstrap: std::env::var("BOOTSTRAP_URL").unwrap_or(base.endpoints.bootstrap),
                course_content: std::env::var("COURSE_CONTENT_URL").unwrap_or(base.endpoints.course_content),
                class_schedule: std::env::var("CLASS_SCHEDULE_URL").unwrap_or(base.endpoints.class_schedule),
                exam_schedule: std::env::var("EXAM_SCHEDULE_URL").unwrap_or(base.endpoints.exam_schedule),
            },
            faculty_file: std::env::var("FACULTY_FILE").unwrap_or(base.faculty_file),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(base.output_dir),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(base.output_log_file),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(base.verbose_logging),
        }
    }

    pub fn validate(&self) -> ScrapeResult<()> {
        let sizes = [
            ("content_workers", self.content_workers),
            ("schedule_workers", self.schedule_workers),
            ("exam_workers", self.exam_workers),
            ("queue_capacity", self.queue_capacity),
            ("exam_queue_multiplier", self.exam_queue_multiplier),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, value)| *value == 0) {
            return Err(ScrapeError::config(format!("{} 必须大于 0", name)));
        }
        if self.max_retries == 0 {
            return Err(ScrapeError::config("max_retries 必须大于 0"));
        }
        Ok(())
    }

    /// 考试队列容量
    pub fn exam_queue_capacity(&self) -> usize {
        self.queue_capacity * self.exam_queue_multiplier
    }
}
