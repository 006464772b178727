//! 带指数退避的通用重试逻辑，所有外部服务调用都经过这里

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;

/// 重试策略：最大尝试次数、初始间隔、退避倍率
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            factor: 2.0,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            factor: config.factor,
        }
    }
}

/// 单次等待的上限，倍率过大或尝试次数过多时截断到这里
pub const MAX_DELAY: Duration = Duration::from_secs(600);

impl RetryPolicy {
    /// 第 `failed_attempts` 次失败之后的等待时间，`d * f^(n-1)`，不超过 [`MAX_DELAY`]
    pub fn delay_after(&self, failed_attempts: u32) -> Duration {
        let exponent = i32::try_from(failed_attempts.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.factor.powi(exponent);
        Duration::try_from_secs_f64(secs)
            .map(|delay| delay.min(MAX_DELAY))
            .unwrap_or(MAX_DELAY)
    }
}

/// 执行 `operation`，失败后按退避策略重试。
///
/// 每次失败都会重试，不区分错误类型；最后一次失败原样返回给调用方，
/// 最后一次之后不再等待。重试期间会真实地 sleep，调用方不应在需要保持响应的线程上等待它。
pub async fn with_backoff<T, E, F, Fut>(policy: &RetryPolicy, label: &str, operation: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) => {
                if attempt >= max_attempts {
                    tracing::error!(
                        operation = label,
                        attempts = attempt,
                        error = %err,
                        "giving up after exhausting retries"
                    );
                    return Err(err);
                }
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    operation = label,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "call failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
