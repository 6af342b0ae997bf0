//! Acquisition strategy trait and types.
//!
//! A strategy represents one retrieval technique for a post (embed page,
//! public page, private API, rendered DOM). Strategies are tried in
//! priority order by the pipeline; each returns a normalized record or a
//! typed failure, so the orchestrator is never coupled to how a payload was
//! obtained.

use std::fmt;

use async_trait::async_trait;
use postrake_core::{AttemptLog, CanonicalPost, ContentIdentifier};
use serde::{Deserialize, Serialize};

use crate::context::FetchContext;
use crate::error::StrategyFailure;

// ============================================================================
// Strategy Kind
// ============================================================================

/// The kind of retrieval technique a strategy uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Public embed rendering of a single post.
    Embed,
    /// Unauthenticated fetch of the canonical post page.
    PublicPage,
    /// Authenticated private JSON API.
    PrivateApi,
    /// Fully rendered DOM via a headless browser.
    Browser,
}

impl StrategyKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Embed => "Embed",
            Self::PublicPage => "Public Page",
            Self::PrivateApi => "Private API",
            Self::Browser => "Rendered DOM",
        }
    }

    /// Default chain position for this kind (higher = tried first).
    ///
    /// Cheapest and most reliable without credentials first:
    /// - Embed: 100
    /// - Public Page: 80
    /// - Private API: 60
    /// - Rendered DOM: 40
    pub fn default_priority(&self) -> u32 {
        match self {
            Self::Embed => 100,
            Self::PublicPage => 80,
            Self::PrivateApi => 60,
            Self::Browser => 40,
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Post Target
// ============================================================================

/// One post to acquire: the original URL plus its resolved identifier.
///
/// Produced once per pipeline run, before any network call.
#[derive(Debug, Clone)]
pub struct PostTarget {
    /// The URL as supplied by the caller.
    pub source_url: String,
    /// The identifier resolved from it.
    pub identifier: ContentIdentifier,
}

impl PostTarget {
    /// Resolves a target from a post URL.
    ///
    /// Returns `None` when no content identifier can be derived, a fatal
    /// precondition failure for the whole pipeline.
    pub fn resolve(url: &str) -> Option<Self> {
        ContentIdentifier::resolve(url).map(|identifier| Self {
            source_url: url.to_string(),
            identifier,
        })
    }
}

// ============================================================================
// Acquire Result
// ============================================================================

/// The result of a successful, accepted acquisition.
#[derive(Debug, Clone)]
pub struct AcquireResult {
    /// The normalized record.
    pub post: CanonicalPost,
    /// The strategy that succeeded.
    pub strategy_id: String,
    /// The kind of retrieval used.
    pub kind: StrategyKind,
}

impl AcquireResult {
    /// Creates a new acquire result.
    pub fn new(post: CanonicalPost, strategy_id: impl Into<String>, kind: StrategyKind) -> Self {
        Self {
            post,
            strategy_id: strategy_id.into(),
            kind,
        }
    }
}

// ============================================================================
// Acquire Strategy Trait
// ============================================================================

/// One retrieval technique for a post.
///
/// Implementations perform their network calls through the retry controller
/// ([`crate::retry::RetryPolicy::execute`]) so every attempt lands in the
/// run's [`AttemptLog`].
#[async_trait]
pub trait AcquireStrategy: Send + Sync {
    /// Unique identifier for this strategy (e.g. `"linkedin.embed"`).
    fn id(&self) -> &str;

    /// The kind of retrieval this strategy uses.
    fn kind(&self) -> StrategyKind;

    /// Human-readable name for this strategy.
    fn display_name(&self) -> String {
        format!("{} ({})", self.id(), self.kind().display_name())
    }

    /// Whether this strategy can run at all with the given context.
    ///
    /// A quick, local check: the private API needs session credentials, the
    /// rendered-DOM strategy needs a browser driver. Unavailable strategies
    /// are skipped, not failed.
    async fn is_available(&self, ctx: &FetchContext) -> bool;

    /// Attempts to acquire and normalize the post.
    ///
    /// # Errors
    ///
    /// Returns a [`StrategyFailure`] describing why this technique could not
    /// produce a payload; the pipeline decides whether to advance the chain.
    async fn acquire(
        &self,
        target: &PostTarget,
        ctx: &FetchContext,
        log: &mut AttemptLog,
    ) -> Result<CanonicalPost, StrategyFailure>;

    /// Whether the pipeline should try the next strategy after `failure`.
    ///
    /// The chain advances on every failure by default; auth failures are
    /// still surfaced distinctly at exhaustion by the pipeline itself.
    fn should_fallback(&self, _failure: &StrategyFailure) -> bool {
        true
    }

    /// Priority of this strategy (higher = tried first).
    fn priority(&self) -> u32 {
        self.kind().default_priority()
    }
}

// ============================================================================
// Tests
// ============================================================================
