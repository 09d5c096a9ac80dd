//! 选课系统客户端
//!
//! 只负责"提交表单、拿回页面"，不认识课程；无逐次调用状态，可被所有 Stage 并发共享。

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{Endpoint, EndpointUrls, FormFields};
use crate::clients::backoff::{retry_with_backoff, BackoffPolicy};
use crate::config::Config;
use crate::error::{ScrapeError, ScrapeResult};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// 表单提交能力
#[async_trait]
pub trait FormSubmitter: Send + Sync {
    /// 提交表单并返回响应正文
    async fn submit(&self, endpoint: Endpoint, form: &FormFields) -> ScrapeResult<String>;
}

/// 基于 reqwest 的实现
pub struct RegistryClient {
    http: reqwest::Client,
    urls: EndpointUrls,
    policy: BackoffPolicy,
}

impl RegistryClient {
    /// 根据配置创建客户端
    pub fn new(config: &Config) -> ScrapeResult<Self> {
        Self::with_parts(
            config.endpoints.clone(),
            BackoffPolicy::from_config(config),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn with_parts(
        urls: EndpointUrls,
        policy: BackoffPolicy,
        timeout: Duration,
    ) -> ScrapeResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScrapeError::config(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self { http, urls, policy })
    }
}

#[async_trait]
impl FormSubmitter for RegistryClient {
    async fn submit(&self, endpoint: Endpoint, form: &FormFields) -> ScrapeResult<String> {
        let fields = form.encode(endpoint)?;
        let fields = &fields;
        let http = &self.http;
        let url = self.urls.url(endpoint);

        retry_with_backoff(self.policy, endpoint, move |attempt| {
            debug!("[{}] POST {} (尝试 {})", endpoint, url, attempt + 1);
            post_form(http, url, fields)
        })
        .await
    }
}

/// 单次表单 POST；非 2xx 状态码同样视为失败
async fn post_form(
    http: &reqwest::Client,
    url: &str,
    fields: &[(&'static str, String)],
) -> Result<String, reqwest::Error> {
    let response = http
        .post(url)
        .form(fields)
        .send()
        .await?
        .error_for_status()?;

    response.text().await
}
