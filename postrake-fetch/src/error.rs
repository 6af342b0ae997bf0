//! Failure types for acquisition strategies and the pipeline.
//!
//! Retry and chain-advance decisions are driven by these tagged unions, never
//! by string-matching on error messages.

use std::time::Duration;

use thiserror::Error;

use postrake_core::AttemptOutcome;

// ============================================================================
// Strategy Failure
// ============================================================================

/// Typed failure from one acquisition strategy attempt.
///
/// The variant decides both the local retry policy (only [`RateLimited`] and
/// [`Transient`] are retried) and the orchestrator's advance/abort decision.
///
/// [`RateLimited`]: StrategyFailure::RateLimited
/// [`Transient`]: StrategyFailure::Transient
#[derive(Debug, Clone, Error)]
pub enum StrategyFailure {
    /// The source throttled the request.
    #[error("rate limited")]
    RateLimited {
        /// Server-supplied wait hint in seconds, when present.
        retry_after: Option<u64>,
    },

    /// The content does not exist under this strategy.
    #[error("content not found")]
    NotFound,

    /// The source refused the request outright.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The supplied session credentials were rejected.
    #[error("session credentials rejected: {0}")]
    AuthInvalid(String),

    /// A failure worth retrying: network error, timeout, 5xx, missing
    /// rendering variant.
    #[error("transient failure: {0}")]
    Transient(String),

    /// A payload was fetched but normalization rejected it.
    #[error("unparseable payload: {0}")]
    UnparseablePayload(String),
}

impl StrategyFailure {
    /// Returns true if the retry controller may retry this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Transient(_))
    }

    /// Returns true if this failure means credentials need refreshing.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthInvalid(_))
    }

    /// The HTTP status implied by this failure, for attempt records.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::NotFound => Some(404),
            Self::AccessDenied(_) => Some(403),
            Self::AuthInvalid(_) => Some(401),
            Self::Transient(_) | Self::UnparseablePayload(_) => None,
        }
    }

    /// The attempt outcome this failure records as.
    pub fn attempt_outcome(&self) -> AttemptOutcome {
        if self.is_retryable() {
            AttemptOutcome::RetryableFailure
        } else {
            AttemptOutcome::FatalFailure
        }
    }
}

impl From<reqwest::Error> for StrategyFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transient(format!("request timed out: {err}"))
        } else {
            Self::Transient(err.to_string())
        }
    }
}

impl From<BrowserError> for StrategyFailure {
    fn from(err: BrowserError) -> Self {
        Self::Transient(err.to_string())
    }
}

// ============================================================================
// Pipeline Error
// ============================================================================

fn fmt_failures(failures: &[StrategyFailure]) -> String {
    match failures.last() {
        Some(last) => format!("{} failures, last: {last}", failures.len()),
        None => "no strategies applicable".to_string(),
    }
}

/// Terminal failure of one whole pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No content identifier could be derived from the input URL. Fatal
    /// before any network call.
    #[error("no content identifier found in URL: {0}")]
    IdentifierUnresolvable(String),

    /// The run ended without success and the session credentials were
    /// rejected along the way. Surfaced distinctly from generic exhaustion
    /// so the caller knows to refresh credentials.
    #[error("session credentials rejected: {0}")]
    AuthInvalid(String),

    /// Every applicable strategy failed.
    #[error("all strategies exhausted ({})", fmt_failures(.failures))]
    Exhausted {
        /// The terminal failure of each strategy, in attempt order.
        failures: Vec<StrategyFailure>,
    },
}

impl PipelineError {
    /// Returns true if the caller should refresh credentials.
    pub fn is_auth_invalid(&self) -> bool {
        matches!(self, Self::AuthInvalid(_))
    }

    /// The per-strategy failures behind an exhaustion, when applicable.
    pub fn exhausted_failures(&self) -> Option<&[StrategyFailure]> {
        match self {
            Self::Exhausted { failures } => Some(failures),
            _ => None,
        }
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// Error from the wrapped HTTP client.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid proxy endpoint.
    #[error("Invalid proxy endpoint: {0}")]
    InvalidProxy(String),
}

impl From<HttpError> for StrategyFailure {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Request(e) => e.into(),
            other => Self::Transient(other.to_string()),
        }
    }
}

// ============================================================================
// Browser Error
// ============================================================================

/// Error from an injected browser driver.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Navigation failed or timed out.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// The awaited selector never appeared.
    #[error("selector wait timed out after {0:?}")]
    SelectorTimeout(Duration),

    /// Driver-level protocol failure.
    #[error("browser protocol error: {0}")]
    Protocol(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_variants() {
        assert!(StrategyFailure::RateLimited { retry_after: None }.is_retryable());
        assert!(StrategyFailure::Transient("boom".into()).is_retryable());

        assert!(!StrategyFailure::NotFound.is_retryable());
        assert!(!StrategyFailure::AccessDenied("no".into()).is_retryable());
        assert!(!StrategyFailure::AuthInvalid("expired".into()).is_retryable());
        assert!(!StrategyFailure::UnparseablePayload("empty".into()).is_retryable());
    }

    #[test]
    fn test_implied_http_status() {
        assert_eq!(
            StrategyFailure::RateLimited { retry_after: None }.http_status(),
            Some(429)
        );
        assert_eq!(StrategyFailure::NotFound.http_status(), Some(404));
        assert_eq!(StrategyFailure::AuthInvalid("x".into()).http_status(), Some(401));
        assert_eq!(StrategyFailure::Transient("x".into()).http_status(), None);
    }

    #[test]
    fn test_exhausted_display_names_last_failure() {
        let err = PipelineError::Exhausted {
            failures: vec![
                StrategyFailure::Transient("embed died".into()),
                StrategyFailure::NotFound,
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("2 failures"));
        assert!(msg.contains("content not found"));
    }
}
