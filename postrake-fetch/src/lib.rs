// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Postrake Fetch
//!
//! Acquisition strategies, retry control, and the pipeline orchestrator.
//!
//! This crate provides the machinery for acquiring one post through a
//! ranked chain of retrieval techniques:
//!
//! ## Host Capabilities
//!
//! The [`host`] module holds the capabilities the surrounding system
//! injects:
//!
//! - [`host::http`] - HTTP client with tracing, browser-profile headers and
//!   a domain allowlist
//! - [`host::browser`] - the headless browser driver trait
//! - [`host::artifacts`] - diagnostic artifact sink
//!
//! ## Acquisition Pipeline
//!
//! - [`strategy::AcquireStrategy`] - trait for retrieval techniques
//! - [`pipeline::AcquirePipeline`] - tries strategies in priority order
//! - [`retry::RetryPolicy`] - exponential backoff around each network call
//! - [`context::FetchContext`] - injected capabilities and settings
//!
//! ## Example
//!
//! ```ignore
//! use postrake_fetch::{AcquirePipeline, FetchContext};
//!
//! let ctx = FetchContext::new();
//! let pipeline = AcquirePipeline::with_strategies(vec![
//!     Box::new(EmbedStrategy::new()),
//!     Box::new(PublicPageStrategy::new()),
//! ]);
//!
//! let outcome = pipeline.run(post_url, &ctx).await;
//! let record = outcome.into_post(post_url);
//! ```

pub mod context;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod retry;
pub mod strategy;

// Re-export key types at crate root

// Errors
pub use error::{BrowserError, HttpError, PipelineError, StrategyFailure};

// Host capabilities
pub use host::{
    artifacts::{ArtifactSink, DiscardSink, MemorySink},
    browser::BrowserDriver,
    http::{HttpClient, ResponseExt},
};

// Strategy & Pipeline
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use pipeline::{AcquirePipeline, FetchOutcome};
pub use retry::RetryPolicy;
pub use strategy::{AcquireResult, AcquireStrategy, PostTarget, StrategyKind};
