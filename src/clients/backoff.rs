//! 指数退避重试
//!
//! 第 i 次失败后等待 `base × 2^i + uniform(0, base)`，最后一次失败后不再等待。

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;
use tracing::warn;

use crate::api::Endpoint;
use crate::config::Config;
use crate::error::{ScrapeError, ScrapeResult};

/// 默认最大尝试次数
pub const MAX_RETRIES: u32 = 3;

/// 默认基础等待时间
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// 最大尝试次数（含第一次）
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_delay: RETRY_DELAY,
        }
    }
}

impl BackoffPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_base_delay_ms),
        )
    }

    /// 不含抖动的等待下限：`base × 2^attempt`
    pub fn floor_delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// 第 `attempt` 次失败后的等待时间（含随机抖动）
    pub fn delay_for<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let jitter = self.base_delay.mul_f64(rng.gen::<f64>());
        self.floor_delay(attempt).saturating_add(jitter)
    }
}

/// 按策略重试 `op`，重试耗尽后返回 [`ScrapeError::Retrieval`]
///
/// `op` 的参数是从 0 开始的尝试序号。
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: BackoffPolicy,
    endpoint: Endpoint,
    mut op: F,
) -> ScrapeResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut last_cause = String::from("未发起请求");

    for attempt in 0..policy.max_attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                last_cause = e.to_string();

                if attempt + 1 >= policy.max_attempts {
                    break;
                }

                let delay = policy.delay_for(attempt, &mut rand::thread_rng());
                warn!(
                    "[{}] 请求失败 (尝试 {}/{}): {}，{:?} 后重试",
                    endpoint,
                    attempt + 1,
                    policy.max_attempts,
                    last_cause,
                    delay
                );
                sleep(delay).await;
            }
        }
    }

    Err(ScrapeError::retrieval(
        endpoint,
        policy.max_attempts,
        last_cause,
    ))
}
