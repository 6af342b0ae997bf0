//! Retry/backoff controller.
//!
//! A generic exponential-backoff executor wrapping any single network
//! operation, shared by every strategy. Retries only [`rate-limited`] and
//! [`transient`] failures; every other failure aborts immediately without
//! consuming remaining attempts.
//!
//! [`rate-limited`]: StrategyFailure::RateLimited
//! [`transient`]: StrategyFailure::Transient

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use postrake_core::{AcquisitionAttempt, AttemptLog};

use crate::error::StrategyFailure;

/// Default maximum attempts per operation.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base delay unit for generic transient failures.
const TRANSIENT_BASE: Duration = Duration::from_millis(1000);

/// Base delay unit for rate-limit failures.
const RATE_LIMIT_BASE: Duration = Duration::from_millis(2000);

// ============================================================================
// Retry Policy
// ============================================================================

/// Policy for retrying a failed network operation.
///
/// The delay before retry `n` (attempts counted from 1) is
/// `2^n * base`, where the base unit depends on the failure kind. A
/// rate-limit response carrying an explicit wait hint overrides the formula.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, clamped to `[1, 5]`.
    pub max_attempts: u32,
    /// Base delay unit for transient failures.
    pub transient_base: Duration,
    /// Base delay unit for rate-limit failures.
    pub rate_limit_base: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.clamp(1, 5),
            transient_base: TRANSIENT_BASE,
            rate_limit_base: RATE_LIMIT_BASE,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    /// Sets the transient base delay.
    pub fn with_transient_base(mut self, base: Duration) -> Self {
        self.transient_base = base;
        self
    }

    /// Sets the rate-limit base delay.
    pub fn with_rate_limit_base(mut self, base: Duration) -> Self {
        self.rate_limit_base = base;
        self
    }

    /// Calculates the delay before the retry following `attempt`.
    pub fn delay_for(&self, attempt: u32, failure: &StrategyFailure) -> Duration {
        match failure {
            StrategyFailure::RateLimited {
                retry_after: Some(secs),
            } => Duration::from_secs(*secs),
            StrategyFailure::RateLimited { retry_after: None } => {
                self.rate_limit_base * 2u32.pow(attempt)
            }
            _ => self.transient_base * 2u32.pow(attempt),
        }
    }

    /// Executes `op` under this policy, recording one [`AcquisitionAttempt`]
    /// per call into `log`.
    ///
    /// Returns the first success, or the last observed failure once the
    /// attempt budget is spent. Non-retryable failures abort on the spot.
    pub async fn execute<T, F, Fut>(
        &self,
        strategy_id: &str,
        log: &mut AttemptLog,
        mut op: F,
    ) -> Result<T, StrategyFailure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StrategyFailure>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => {
                    log.record(AcquisitionAttempt::success(strategy_id, None));
                    return Ok(value);
                }
                Err(failure) => {
                    log.record(AcquisitionAttempt::failure(
                        strategy_id,
                        failure.http_status(),
                        failure.attempt_outcome(),
                        failure.to_string(),
                    ));

                    if !failure.is_retryable() {
                        debug!(strategy = %strategy_id, failure = %failure, "Non-retryable failure, aborting");
                        return Err(failure);
                    }
                    if attempt >= self.max_attempts {
                        warn!(
                            strategy = %strategy_id,
                            attempts = attempt,
                            failure = %failure,
                            "Retry budget exhausted"
                        );
                        return Err(failure);
                    }

                    let delay = self.delay_for(attempt, &failure);
                    debug!(
                        strategy = %strategy_id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        failure = %failure,
                        "Retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn test_max_attempts_clamped() {
        assert_eq!(RetryPolicy::new(0).max_attempts, 1);
        assert_eq!(RetryPolicy::new(3).max_attempts, 3);
        assert_eq!(RetryPolicy::new(99).max_attempts, 5);
    }

    #[test]
    fn test_exponential_delay() {
        let policy = RetryPolicy::default();
        let transient = StrategyFailure::Transient("x".into());
        let limited = StrategyFailure::RateLimited { retry_after: None };

        assert_eq!(policy.delay_for(1, &transient), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2, &transient), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(1, &limited), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(2, &limited), Duration::from_millis(8000));
    }

    #[test]
    fn test_retry_after_hint_overrides_formula() {
        let policy = RetryPolicy::default();
        let hinted = StrategyFailure::RateLimited {
            retry_after: Some(30),
        };
        assert_eq!(policy.delay_for(1, &hinted), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limited_then_success() {
        // Three 429s followed by a success, within a 4-attempt budget:
        // exactly 4 calls, with increasing delays between them.
        let policy = RetryPolicy::new(4);
        let calls = AtomicU32::new(0);
        let mut log = AttemptLog::new();

        let started = tokio::time::Instant::now();
        let result = policy
            .execute("test.embed", &mut log, || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n <= 3 {
                        Err(StrategyFailure::RateLimited { retry_after: None })
                    } else {
                        Ok("payload")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "payload");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(log.count_for("test.embed"), 4);
        // Backoffs: 4s + 8s + 16s with the 2s rate-limit base.
        assert_eq!(started.elapsed(), Duration::from_secs(28));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_failure_aborts_immediately() {
        let policy = RetryPolicy::new(5);
        let calls = AtomicU32::new(0);
        let mut log = AttemptLog::new();

        let result: Result<(), _> = policy
            .execute("test.page", &mut log, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(StrategyFailure::NotFound) }
            })
            .await;

        assert!(matches!(result, Err(StrategyFailure::NotFound)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(log.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_last_failure_after_exhaustion() {
        let policy = RetryPolicy::new(2);
        let calls = AtomicU32::new(0);
        let mut log = AttemptLog::new();

        let result: Result<(), _> = policy
            .execute("test.embed", &mut log, || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n == 1 {
                        Err(StrategyFailure::RateLimited { retry_after: None })
                    } else {
                        Err(StrategyFailure::Transient("still failing".into()))
                    }
                }
            })
            .await;

        match result {
            Err(StrategyFailure::Transient(msg)) => assert_eq!(msg, "still failing"),
            other => panic!("expected last transient failure, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
