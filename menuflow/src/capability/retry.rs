//! Bounded retry for capability calls.
//!
//! The retry policy lives here and nowhere else: stages call the capability
//! once and see either a result or the last error after the policy gave up.

use super::{OutputSchema, TextCapability};
use crate::errors::CapabilityError;
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Backoff strategy for retry delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    /// delay = base * 2^retry
    #[default]
    Exponential,
    /// delay = base * (retry + 1)
    Linear,
    /// delay = base (constant)
    Constant,
}

/// Jitter strategy to prevent thundering herd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JitterStrategy {
    /// No jitter
    None,
    /// Random from 0 to delay
    #[default]
    Full,
    /// Half fixed, half random
    Equal,
}

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts, including the first call.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Base delay between attempts in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Maximum delay cap in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Backoff strategy.
    #[serde(default)]
    pub backoff_strategy: BackoffStrategy,
    /// Jitter strategy.
    #[serde(default)]
    pub jitter_strategy: JitterStrategy,
}

const fn default_max_attempts() -> usize {
    3
}

const fn default_base_delay_ms() -> u64 {
    1000
}

const fn default_max_delay_ms() -> u64 {
    30000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_strategy: BackoffStrategy::Exponential,
            jitter_strategy: JitterStrategy::Full,
        }
    }
}

impl RetryConfig {
    /// Creates a new retry config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy that makes a single attempt.
    #[must_use]
    pub fn no_retry() -> Self {
        Self::default().with_max_attempts(1)
    }

    /// Sets the maximum attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay_ms(mut self, delay: u64) -> Self {
        self.base_delay_ms = delay;
        self
    }

    /// Sets the maximum delay.
    #[must_use]
    pub fn with_max_delay_ms(mut self, delay: u64) -> Self {
        self.max_delay_ms = delay;
        self
    }

    /// Sets the backoff strategy.
    #[must_use]
    pub fn with_backoff(mut self, strategy: BackoffStrategy) -> Self {
        self.backoff_strategy = strategy;
        self
    }

    /// Sets the jitter strategy.
    #[must_use]
    pub fn with_jitter(mut self, strategy: JitterStrategy) -> Self {
        self.jitter_strategy = strategy;
        self
    }

    /// Calculates the delay before retry number `retry` (0-indexed).
    #[must_use]
    pub fn delay_for_retry(&self, retry: usize) -> Duration {
        let base = self.base_delay_ms;
        let max = self.max_delay_ms;
        let exponent = u32::try_from(retry).unwrap_or(u32::MAX);

        let delay = match self.backoff_strategy {
            BackoffStrategy::Exponential => base
                .saturating_mul(2u64.saturating_pow(exponent))
                .min(max),
            BackoffStrategy::Linear => base
                .saturating_mul(u64::from(exponent).saturating_add(1))
                .min(max),
            BackoffStrategy::Constant => base.min(max),
        };

        let jittered = match self.jitter_strategy {
            JitterStrategy::None => delay,
            JitterStrategy::Full => {
                if delay == 0 {
                    0
                } else {
                    rand::thread_rng().gen_range(0..=delay)
                }
            }
            JitterStrategy::Equal => {
                let half = delay / 2;
                if half == 0 {
                    delay
                } else {
                    half + rand::thread_rng().gen_range(0..=half)
                }
            }
        };

        Duration::from_millis(jittered)
    }
}

/// Executes an operation, retrying while `retryable` approves the error and
/// attempts remain.
pub async fn with_retry<T, E, F, Fut, P>(
    config: &RetryConfig,
    key: &str,
    retryable: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt < max_attempts && retryable(&e) => {
                let delay = config.delay_for_retry(attempt - 1);
                tracing::debug!(
                    key = %key,
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "Retrying after error"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// A capability that retries transient failures of an inner capability.
///
/// Only errors for which [`CapabilityError::is_retryable`] holds are retried;
/// schema violations are returned immediately.
pub struct RetryingCapability {
    inner: Arc<dyn TextCapability>,
    config: RetryConfig,
}

impl RetryingCapability {
    /// Wraps a capability with a retry policy.
    #[must_use]
    pub fn new(inner: Arc<dyn TextCapability>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// The retry policy.
    #[must_use]
    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl std::fmt::Debug for RetryingCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingCapability")
            .field("inner", &self.inner.name())
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl TextCapability for RetryingCapability {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn invoke(
        &self,
        prompt: &str,
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, CapabilityError> {
        with_retry(
            &self.config,
            schema.name(),
            CapabilityError::is_retryable,
            || self.inner.invoke(prompt, schema),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedCapability;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig::new()
            .with_base_delay_ms(1)
            .with_jitter(JitterStrategy::None)
    }

    #[test]
    fn test_retry_config_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay_ms, 1000);
        assert_eq!(config.max_delay_ms, 30000);
        assert_eq!(config.backoff_strategy, BackoffStrategy::Exponential);
    }

    #[test]
    fn test_delay_exponential_no_jitter() {
        let config = RetryConfig::new()
            .with_base_delay_ms(100)
            .with_jitter(JitterStrategy::None);

        assert_eq!(config.delay_for_retry(0), Duration::from_millis(100));
        assert_eq!(config.delay_for_retry(1), Duration::from_millis(200));
        assert_eq!(config.delay_for_retry(2), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_linear_and_constant() {
        let linear = RetryConfig::new()
            .with_base_delay_ms(100)
            .with_backoff(BackoffStrategy::Linear)
            .with_jitter(JitterStrategy::None);
        assert_eq!(linear.delay_for_retry(2), Duration::from_millis(300));

        let constant = linear.with_backoff(BackoffStrategy::Constant);
        assert_eq!(constant.delay_for_retry(5), Duration::from_millis(100));
    }

    #[test]
    fn test_delay_capped_at_max() {
        let config = RetryConfig::new()
            .with_base_delay_ms(1000)
            .with_max_delay_ms(5000)
            .with_jitter(JitterStrategy::None);

        assert_eq!(config.delay_for_retry(10), Duration::from_millis(5000));
    }

    #[test]
    fn test_full_jitter_stays_below_delay() {
        let config = RetryConfig::new()
            .with_base_delay_ms(100)
            .with_backoff(BackoffStrategy::Constant);

        assert!((0..10).all(|_| config.delay_for_retry(0) <= Duration::from_millis(100)));
    }

    #[tokio::test]
    async fn test_with_retry_success_after_failures() {
        let calls = AtomicUsize::new(0);

        let result: Result<i32, String> = with_retry(&fast(), "test", |_| true, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(format!("attempt {n}"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_stops_at_max_attempts() {
        let calls = AtomicUsize::new(0);

        let result: Result<i32, String> = with_retry(&fast(), "test", |_| true, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("always fails".to_string()) }
        })
        .await;

        assert_eq!(result, Err("always fails".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_with_retry_skips_non_retryable() {
        let calls = AtomicUsize::new(0);

        let result: Result<i32, String> = with_retry(&fast(), "test", |_| false, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err("permanent".to_string()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retrying_capability_recovers_from_unavailable() {
        let scripted = Arc::new(
            ScriptedCapability::new()
                .then_err(CapabilityError::unavailable("mock", "timeout"))
                .then_ok(serde_json::json!({"dishes": ["Pizza"]})),
        );
        let capability = RetryingCapability::new(scripted.clone(), fast());

        let value = capability
            .invoke("prompt", &OutputSchema::candidate_dishes())
            .await
            .unwrap();

        assert_eq!(value, serde_json::json!({"dishes": ["Pizza"]}));
        assert_eq!(scripted.call_count(), 2);
    }

    #[tokio::test]
    async fn test_retrying_capability_does_not_retry_schema_violation() {
        let scripted = Arc::new(
            ScriptedCapability::new()
                .then_err(CapabilityError::schema_violation("CandidateDishList", "not json"))
                .then_ok(serde_json::json!({"dishes": []})),
        );
        let capability = RetryingCapability::new(scripted.clone(), fast());

        let err = capability
            .invoke("prompt", &OutputSchema::candidate_dishes())
            .await
            .unwrap_err();

        assert!(matches!(err, CapabilityError::SchemaViolation { .. }));
        assert_eq!(scripted.call_count(), 1);
    }
}
