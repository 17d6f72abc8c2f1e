//! Key lookup retry logic.
//!
//! # Responsibilities
//! - Bound every lookup attempt with a timeout
//! - Retry transient failures with exponential backoff + jitter
//! - Surface the last error once attempts are spent
//!
//! # Design Decisions
//! - Only timeouts and unavailable backends are retried
//! - Malformed key records fail immediately
//! - Jittered backoff keeps parallel lookups from retrying in lockstep

use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::schema::LookupConfig;
use crate::routing::types::{RoutingError, RoutingResult};

/// Timeout and retry budget applied to each key lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupPolicy {
    pub timeout: Duration,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl LookupPolicy {
    /// A single attempt with the given timeout.
    pub fn single_attempt(timeout: Duration) -> Self {
        Self {
            timeout,
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }
}

impl Default for LookupPolicy {
    fn default() -> Self {
        Self::from(&LookupConfig::default())
    }
}

impl From<&LookupConfig> for LookupPolicy {
    fn from(config: &LookupConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            max_attempts: config.max_attempts.max(1),
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }
}

/// Exponential backoff delay with up to 10% jitter. Attempt 0 has no delay.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let delay_ms = base_ms
        .saturating_mul(2u64.saturating_pow(attempt - 1))
        .min(max_ms);

    let jitter_range = delay_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(delay_ms + jitter)
}

/// Run `op` under `policy` for a lookup on `chain`.
pub async fn with_retries<T, F, Fut>(policy: &LookupPolicy, chain: &str, mut op: F) -> RoutingResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RoutingResult<T>>,
{
    let mut attempt = 0;
    loop {
        let err = match timeout(policy.timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => e,
            Err(_) => RoutingError::Timeout {
                chain: chain.to_string(),
                timeout_ms: policy.timeout.as_millis() as u64,
            },
        };

        attempt += 1;
        if !err.is_retryable() || attempt >= policy.max_attempts {
            return Err(err);
        }

        let delay = calculate_backoff(attempt, policy.base_delay_ms, policy.max_delay_ms);
        tracing::debug!(
            chain = %chain,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "Key lookup failed, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}
