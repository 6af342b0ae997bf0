//! Strategy orchestrator.
//!
//! The pipeline resolves the content identifier once, then walks the
//! strategy chain in priority order. Each strategy's normalized record must
//! pass the acceptance test before it wins; rejected or failed strategies
//! advance the chain. A run that exhausts every strategy yields a typed
//! failure, distinctly tagged when session credentials were rejected along
//! the way.

use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use postrake_core::{AcquisitionAttempt, AttemptLog, CanonicalPost};

use crate::context::FetchContext;
use crate::error::{PipelineError, StrategyFailure};
use crate::strategy::{AcquireResult, AcquireStrategy, PostTarget};

/// Acceptance predicate applied to each normalized record.
type AcceptFn = Box<dyn Fn(&CanonicalPost) -> bool + Send + Sync>;

// ============================================================================
// Fetch Outcome
// ============================================================================

/// The outcome of one pipeline run.
#[derive(Debug)]
pub struct FetchOutcome {
    /// The result (accepted record or terminal error).
    pub result: Result<AcquireResult, PipelineError>,
    /// Every acquisition attempt made, including retries.
    pub attempts: Vec<AcquisitionAttempt>,
    /// Total duration of the run.
    pub duration: Duration,
}

impl FetchOutcome {
    /// Returns true if the run produced an accepted record.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The successful strategy ID, if any.
    pub fn successful_strategy(&self) -> Option<&str> {
        self.result.as_ref().ok().map(|r| r.strategy_id.as_str())
    }

    /// Converts the outcome into the caller-facing record.
    ///
    /// A failed run becomes a `success: false` record carrying the error
    /// text, so batch callers always get one record per input URL.
    pub fn into_post(self, source_url: &str) -> CanonicalPost {
        match self.result {
            Ok(result) => result.post,
            Err(error) => CanonicalPost::failure(source_url, error.to_string()),
        }
    }
}

// ============================================================================
// Acquire Pipeline
// ============================================================================

/// A chain of acquisition strategies tried in priority order.
pub struct AcquirePipeline {
    strategies: Vec<Box<dyn AcquireStrategy>>,
    accept: AcceptFn,
}

impl AcquirePipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
            accept: Box::new(|post| post.success),
        }
    }

    /// Creates a pipeline with the given strategies, sorted by priority.
    pub fn with_strategies(strategies: Vec<Box<dyn AcquireStrategy>>) -> Self {
        let mut pipeline = Self {
            strategies,
            accept: Box::new(|post| post.success),
        };
        pipeline.sort_by_priority();
        pipeline
    }

    /// Adds a strategy to the pipeline.
    pub fn add_strategy(&mut self, strategy: Box<dyn AcquireStrategy>) {
        self.strategies.push(strategy);
        self.sort_by_priority();
    }

    /// Replaces the acceptance predicate.
    ///
    /// The default accepts any record with `success == true` (nonempty post
    /// text or author name). Callers needing stricter precision can tighten
    /// this without forking the orchestrator.
    pub fn with_acceptance<F>(mut self, accept: F) -> Self
    where
        F: Fn(&CanonicalPost) -> bool + Send + Sync + 'static,
    {
        self.accept = Box::new(accept);
        self
    }

    /// Sorts strategies by priority (highest first).
    fn sort_by_priority(&mut self) {
        self.strategies.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Number of strategies in the chain.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Runs the pipeline for one post URL.
    ///
    /// Strategies are tried one at a time; the first accepted record wins
    /// and short-circuits the rest of the chain. No state carries over from
    /// a rejected attempt, and nothing is shared between runs.
    #[instrument(skip(self, ctx), fields(strategies = self.strategies.len()))]
    pub async fn run(&self, url: &str, ctx: &FetchContext) -> FetchOutcome {
        let start = Instant::now();
        let mut log = AttemptLog::new();
        let mut failures: Vec<StrategyFailure> = Vec::new();

        let Some(target) = PostTarget::resolve(url) else {
            warn!(url, "No content identifier in URL, aborting before any network call");
            return FetchOutcome {
                result: Err(PipelineError::IdentifierUnresolvable(url.to_string())),
                attempts: log.into_attempts(),
                duration: start.elapsed(),
            };
        };

        info!(urn = %target.identifier, count = self.strategies.len(), "Executing acquisition chain");

        for strategy in &self.strategies {
            let strategy_id = strategy.id();

            if !strategy.is_available(ctx).await {
                debug!(strategy = %strategy_id, "Strategy not available, skipping");
                log.record(AcquisitionAttempt::failure(
                    strategy_id,
                    None,
                    postrake_core::AttemptOutcome::FatalFailure,
                    "strategy not available",
                ));
                continue;
            }

            debug!(strategy = %strategy_id, "Executing strategy");

            match strategy.acquire(&target, ctx, &mut log).await {
                Ok(post) => {
                    if (self.accept)(&post) {
                        info!(strategy = %strategy_id, "Strategy produced an accepted record");
                        return FetchOutcome {
                            result: Ok(AcquireResult::new(post, strategy_id, strategy.kind())),
                            attempts: log.into_attempts(),
                            duration: start.elapsed(),
                        };
                    }

                    // Payload fetched, normalization yielded nothing usable.
                    warn!(strategy = %strategy_id, "Normalized record rejected by acceptance test");
                    failures.push(StrategyFailure::UnparseablePayload(format!(
                        "{strategy_id}: normalized record has no post text or author"
                    )));
                }
                Err(failure) => {
                    warn!(strategy = %strategy_id, failure = %failure, "Strategy failed");
                    let fallback = strategy.should_fallback(&failure);
                    failures.push(failure);

                    if !fallback {
                        debug!(strategy = %strategy_id, "Strategy indicates no fallback");
                        break;
                    }
                }
            }
        }

        warn!(url, failures = failures.len(), "All strategies exhausted");
        FetchOutcome {
            result: Err(Self::exhaustion_error(failures)),
            attempts: log.into_attempts(),
            duration: start.elapsed(),
        }
    }

    /// Tags exhaustion distinctly when credentials were rejected en route,
    /// so the caller knows a refresh may unblock the run.
    fn exhaustion_error(failures: Vec<StrategyFailure>) -> PipelineError {
        if let Some(StrategyFailure::AuthInvalid(message)) =
            failures.iter().find(|f| f.is_auth())
        {
            return PipelineError::AuthInvalid(message.clone());
        }
        PipelineError::Exhausted { failures }
    }
}

impl Default for AcquirePipeline {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
