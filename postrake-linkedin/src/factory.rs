//! Default pipeline assembly.
//!
//! The central place that knows which strategies exist and in what order
//! they are chained.

use postrake_core::CanonicalPost;
use postrake_fetch::{AcquirePipeline, AcquireStrategy, FetchContext};

use crate::strategies::{
    EmbedStrategy, PrivateApiStrategy, PublicPageStrategy, RenderedDomStrategy,
};

/// The full strategy set in default priority order.
pub fn default_strategies() -> Vec<Box<dyn AcquireStrategy>> {
    vec![
        Box::new(EmbedStrategy::new()),
        Box::new(PublicPageStrategy::new()),
        Box::new(PrivateApiStrategy::new()),
        Box::new(RenderedDomStrategy::new()),
    ]
}

/// Builds the default acquisition pipeline.
pub fn build_pipeline() -> AcquirePipeline {
    AcquirePipeline::with_strategies(default_strategies())
}

/// Fetches one post through the default pipeline, always yielding a record.
///
/// A failed run becomes a `success: false` record carrying the error text;
/// nothing is thrown past this boundary.
pub async fn fetch_post(url: &str, ctx: &FetchContext) -> CanonicalPost {
    build_pipeline().run(url, ctx).await.into_post(url)
}

// ============================================================================
// Tests
// ============================================================================
