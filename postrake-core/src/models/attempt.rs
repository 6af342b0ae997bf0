//! Per-attempt observability records.
//!
//! One [`AcquisitionAttempt`] is recorded for every network attempt a
//! pipeline run makes, including retries. The log is append-only, owned by
//! the orchestrator for the lifetime of one run, and discarded afterwards;
//! it exists for logging and test assertions, not persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Attempt Outcome
// ============================================================================

/// How one acquisition attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttemptOutcome {
    /// The attempt produced a payload.
    Success,
    /// The attempt failed in a way the retry controller may retry.
    RetryableFailure,
    /// The attempt failed in a way that aborts the strategy.
    FatalFailure,
}

// ============================================================================
// Acquisition Attempt
// ============================================================================

/// Record of a single acquisition attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionAttempt {
    /// The strategy that made the attempt.
    pub strategy_id: String,
    /// When the attempt started.
    pub started_at: DateTime<Utc>,
    /// HTTP status observed, when the attempt got that far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// How the attempt ended.
    pub outcome: AttemptOutcome,
    /// Failure description for unsuccessful attempts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AcquisitionAttempt {
    /// Creates a successful attempt record.
    pub fn success(strategy_id: impl Into<String>, http_status: Option<u16>) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            started_at: Utc::now(),
            http_status,
            outcome: AttemptOutcome::Success,
            error: None,
        }
    }

    /// Creates a failed attempt record.
    pub fn failure(
        strategy_id: impl Into<String>,
        http_status: Option<u16>,
        outcome: AttemptOutcome,
        error: impl Into<String>,
    ) -> Self {
        Self {
            strategy_id: strategy_id.into(),
            started_at: Utc::now(),
            http_status,
            outcome,
            error: Some(error.into()),
        }
    }
}

// ============================================================================
// Attempt Log
// ============================================================================

/// Append-only list of attempts for one pipeline run.
#[derive(Debug, Default)]
pub struct AttemptLog {
    attempts: Vec<AcquisitionAttempt>,
}

impl AttemptLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attempt record.
    pub fn record(&mut self, attempt: AcquisitionAttempt) {
        self.attempts.push(attempt);
    }

    /// Number of attempts recorded so far.
    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    /// Returns true if no attempts have been recorded.
    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Number of attempts made by the given strategy.
    pub fn count_for(&self, strategy_id: &str) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.strategy_id == strategy_id)
            .count()
    }

    /// All recorded attempts, in order.
    pub fn attempts(&self) -> &[AcquisitionAttempt] {
        &self.attempts
    }

    /// Consumes the log, yielding the attempt list.
    pub fn into_attempts(self) -> Vec<AcquisitionAttempt> {
        self.attempts
    }
}

// ============================================================================
// Tests
// ============================================================================
