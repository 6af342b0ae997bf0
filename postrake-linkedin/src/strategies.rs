//! LinkedIn acquisition strategies.
//!
//! Four retrieval techniques, tried in this priority order:
//!
//! 1. **Embed** - public embed rendering, no credentials needed
//! 2. **Public page** - unauthenticated fetch of the canonical post URL
//! 3. **Private API** - authenticated JSON graph endpoint
//! 4. **Rendered DOM** - headless-browser navigation and extraction

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use postrake_core::{AttemptLog, CanonicalPost, ContentIdentifier, IdentifierKind};
use postrake_fetch::{
    AcquireStrategy, BrowserDriver, FetchContext, PostTarget, ResponseExt, StrategyFailure,
    StrategyKind,
};

use crate::headers::{browser_headers, embed_headers};
use crate::html::parse_post_html;
use crate::page::parse_public_page;
use crate::selectors::{AUTH_WALL_MARKERS, CONTENT_WAIT_SELECTOR, EMBED, FEED, NOT_FOUND_MARKER};
use crate::urls::{BASE_URL, embed_url, feed_update_url};
use crate::voyager::{EndpointShape, VoyagerApi, parse_update_graph};

// ============================================================================
// Embed Strategy (Highest Priority)
// ============================================================================

/// Fetches the public embed rendering of a post.
///
/// The embed endpoint serves the same content under sibling URN kinds, so a
/// miss under the resolved kind falls through to the siblings before the
/// strategy gives up.
pub struct EmbedStrategy {
    base_url: String,
}

impl EmbedStrategy {
    /// Creates the strategy against the production endpoint.
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
        }
    }

    /// Points the strategy at a different base URL (tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// One embed fetch. `Ok(None)` means a definitive miss for this URN
    /// kind, worth a sibling rather than a retry.
    async fn fetch_once(
        &self,
        ctx: &FetchContext,
        url: &str,
    ) -> Result<Option<String>, StrategyFailure> {
        let response = ctx.http.get_with_headers(url, embed_headers()).await?;
        let status = response.status();

        if response.is_rate_limited() {
            return Err(StrategyFailure::RateLimited {
                retry_after: response.retry_after_secs(),
            });
        }
        if status.is_server_error() {
            return Err(StrategyFailure::Transient(format!(
                "embed endpoint returned {status}"
            )));
        }

        let body = response.text().await?;
        if status != StatusCode::OK || body.contains(NOT_FOUND_MARKER) {
            return Ok(None);
        }
        Ok(Some(body))
    }
}

impl Default for EmbedStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AcquireStrategy for EmbedStrategy {
    fn id(&self) -> &str {
        "linkedin.embed"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Embed
    }

    async fn is_available(&self, _ctx: &FetchContext) -> bool {
        true
    }

    #[instrument(skip(self, ctx, log), fields(urn = %target.identifier))]
    async fn acquire(
        &self,
        target: &PostTarget,
        ctx: &FetchContext,
        log: &mut AttemptLog,
    ) -> Result<CanonicalPost, StrategyFailure> {
        let mut kinds: Vec<IdentifierKind> = vec![target.identifier.kind];
        kinds.extend_from_slice(target.identifier.kind.siblings());

        let mut saw_unparseable = false;
        for kind in kinds {
            let url = embed_url(&self.base_url, &target.identifier, kind);
            debug!(kind = %kind, "Trying embed rendering");

            match ctx
                .retry()
                .execute(self.id(), log, || self.fetch_once(ctx, &url))
                .await
            {
                Ok(Some(body)) => {
                    let post = parse_post_html(&body, &EMBED, &target.source_url);
                    if post.success {
                        return Ok(post);
                    }
                    debug!(kind = %kind, "Embed payload parsed empty, trying sibling URN kind");
                    saw_unparseable = true;
                }
                Ok(None) => {
                    debug!(kind = %kind, "No embed rendering under this URN kind");
                }
                // Retry budget spent on a real failure; let the chain decide.
                Err(failure) => return Err(failure),
            }
        }

        if saw_unparseable {
            Err(StrategyFailure::UnparseablePayload(
                "embed rendering fetched but produced no usable record".to_string(),
            ))
        } else {
            Err(StrategyFailure::Transient(
                "no embed rendering under any URN kind".to_string(),
            ))
        }
    }
}

// ============================================================================
// Public Page Strategy
// ============================================================================

/// Fetches the canonical post URL as an unauthenticated browser would.
pub struct PublicPageStrategy;

impl PublicPageStrategy {
    /// Creates the strategy.
    pub fn new() -> Self {
        Self
    }

    async fn fetch_once(
        &self,
        ctx: &FetchContext,
        url: &str,
    ) -> Result<String, StrategyFailure> {
        let response = ctx.http.get_with_headers(url, browser_headers()).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StrategyFailure::NotFound);
        }
        if response.is_rate_limited() {
            return Err(StrategyFailure::RateLimited {
                retry_after: response.retry_after_secs(),
            });
        }
        if !status.is_success() {
            return Err(StrategyFailure::Transient(format!(
                "post page returned {status}"
            )));
        }

        Ok(response.text().await?)
    }
}

impl Default for PublicPageStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AcquireStrategy for PublicPageStrategy {
    fn id(&self) -> &str {
        "linkedin.page"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::PublicPage
    }

    async fn is_available(&self, _ctx: &FetchContext) -> bool {
        true
    }

    #[instrument(skip(self, ctx, log), fields(url = %target.source_url))]
    async fn acquire(
        &self,
        target: &PostTarget,
        ctx: &FetchContext,
        log: &mut AttemptLog,
    ) -> Result<CanonicalPost, StrategyFailure> {
        let body = ctx
            .retry()
            .execute(self.id(), log, || self.fetch_once(ctx, &target.source_url))
            .await?;

        parse_public_page(&body, &target.source_url).ok_or_else(|| {
            StrategyFailure::UnparseablePayload(
                "public page is an access wall or carries no post data".to_string(),
            )
        })
    }
}

// ============================================================================
// Private API Strategy
// ============================================================================

/// Queries the private feed API with caller-supplied session credentials.
///
/// Two endpoint shapes are tried (direct per-URN lookup, then batch/list);
/// a `401`/`403` on either aborts immediately so the caller can refresh
/// credentials instead of burning further requests.
pub struct PrivateApiStrategy {
    api: VoyagerApi,
}

impl PrivateApiStrategy {
    /// Creates the strategy against the production endpoint.
    pub fn new() -> Self {
        Self {
            api: VoyagerApi::new(BASE_URL),
        }
    }

    /// Points the strategy at a different base URL (tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api: VoyagerApi::new(base_url),
        }
    }
}

impl Default for PrivateApiStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AcquireStrategy for PrivateApiStrategy {
    fn id(&self) -> &str {
        "linkedin.api"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::PrivateApi
    }

    async fn is_available(&self, ctx: &FetchContext) -> bool {
        ctx.session.is_some()
    }

    #[instrument(skip(self, ctx, log), fields(urn = %target.identifier))]
    async fn acquire(
        &self,
        target: &PostTarget,
        ctx: &FetchContext,
        log: &mut AttemptLog,
    ) -> Result<CanonicalPost, StrategyFailure> {
        let Some(session) = ctx.session.as_ref() else {
            return Err(StrategyFailure::AuthInvalid(
                "no session credentials supplied".to_string(),
            ));
        };

        let urn = target.identifier.urn();
        let mut last_failure: Option<StrategyFailure> = None;

        for shape in EndpointShape::ALL {
            debug!(shape = ?shape, "Querying private API");

            match ctx
                .retry()
                .execute(self.id(), log, || {
                    self.api.fetch_update(&ctx.http, session, *shape, &urn)
                })
                .await
            {
                Ok(document) => {
                    let post = parse_update_graph(&document, &target.source_url);
                    if post.success {
                        return Ok(post);
                    }
                    debug!(shape = ?shape, "Private API document produced no usable record");
                    last_failure = Some(StrategyFailure::UnparseablePayload(
                        "private API document produced no usable record".to_string(),
                    ));
                }
                // Invalid credentials: no further endpoint shapes.
                Err(failure @ StrategyFailure::AuthInvalid(_)) => return Err(failure),
                Err(failure) => {
                    debug!(shape = ?shape, failure = %failure, "Endpoint shape failed");
                    last_failure = Some(failure);
                }
            }
        }

        Err(last_failure.unwrap_or_else(|| {
            StrategyFailure::Transient("no private API endpoint produced a document".to_string())
        }))
    }
}

// ============================================================================
// Rendered DOM Strategy
// ============================================================================

/// Navigates a headless browser to the post and extracts from the rendered
/// document.
///
/// Absence of the expected content selector is not fatal; extraction is
/// attempted anyway and acceptance is decided by the normalized record's
/// success flag. On an empty extraction the raw document and a screenshot
/// are handed to the artifact sink for offline inspection.
pub struct RenderedDomStrategy {
    base_url: String,
}

impl RenderedDomStrategy {
    /// Creates the strategy against the production site.
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
        }
    }

    /// Points the strategy at a different base URL (tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    async fn render_once(
        &self,
        browser: &dyn BrowserDriver,
        ctx: &FetchContext,
        url: &str,
    ) -> Result<String, StrategyFailure> {
        browser.navigate(url).await?;

        let current = browser.current_url().await?;
        if AUTH_WALL_MARKERS.iter().any(|marker| current.contains(marker)) {
            return Err(StrategyFailure::AuthInvalid(format!(
                "redirected to {current}"
            )));
        }

        let found = browser
            .wait_for_selector(CONTENT_WAIT_SELECTOR, ctx.settings.selector_timeout)
            .await
            .unwrap_or(false);
        if !found {
            debug!("Content selector did not appear, extracting anyway");
        }

        Ok(browser.content().await?)
    }

    async fn emit_debug_artifacts(
        &self,
        browser: &dyn BrowserDriver,
        ctx: &FetchContext,
        content_id: &ContentIdentifier,
        html: &str,
    ) {
        let base = format!("debug-post-{}", content_id.id);

        if let Ok(shot) = browser.screenshot().await {
            if let Err(e) = ctx
                .artifacts
                .store(&format!("{base}.png"), "image/png", &shot)
                .await
            {
                warn!(error = %e, "Failed to store debug screenshot");
            }
        }
        if let Err(e) = ctx
            .artifacts
            .store(&format!("{base}.html"), "text/html", html.as_bytes())
            .await
        {
            warn!(error = %e, "Failed to store debug document");
        }
    }
}

impl Default for RenderedDomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AcquireStrategy for RenderedDomStrategy {
    fn id(&self) -> &str {
        "linkedin.dom"
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Browser
    }

    async fn is_available(&self, ctx: &FetchContext) -> bool {
        ctx.browser.is_some()
    }

    #[instrument(skip(self, ctx, log), fields(urn = %target.identifier))]
    async fn acquire(
        &self,
        target: &PostTarget,
        ctx: &FetchContext,
        log: &mut AttemptLog,
    ) -> Result<CanonicalPost, StrategyFailure> {
        let Some(browser) = ctx.browser.as_ref() else {
            return Err(StrategyFailure::Transient(
                "no browser driver injected".to_string(),
            ));
        };

        let url = feed_update_url(&self.base_url, &target.identifier);
        let html = ctx
            .retry()
            .execute(self.id(), log, || {
                self.render_once(browser.as_ref(), ctx, &url)
            })
            .await?;

        let post = parse_post_html(&html, &FEED, &target.source_url);
        if !post.success {
            warn!("Rendered document produced no usable record, emitting debug artifacts");
            self.emit_debug_artifacts(browser.as_ref(), ctx, &target.identifier, &html)
                .await;
        }

        Ok(post)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_ids_and_kinds() {
        assert_eq!(EmbedStrategy::new().id(), "linkedin.embed");
        assert_eq!(EmbedStrategy::new().kind(), StrategyKind::Embed);

        assert_eq!(PublicPageStrategy::new().id(), "linkedin.page");
        assert_eq!(PublicPageStrategy::new().kind(), StrategyKind::PublicPage);

        assert_eq!(PrivateApiStrategy::new().id(), "linkedin.api");
        assert_eq!(PrivateApiStrategy::new().kind(), StrategyKind::PrivateApi);

        assert_eq!(RenderedDomStrategy::new().id(), "linkedin.dom");
        assert_eq!(RenderedDomStrategy::new().kind(), StrategyKind::Browser);
    }

    #[test]
    fn test_strategy_priority_order() {
        let embed = EmbedStrategy::new().priority();
        let page = PublicPageStrategy::new().priority();
        let api = PrivateApiStrategy::new().priority();
        let dom = RenderedDomStrategy::new().priority();

        assert!(embed > page);
        assert!(page > api);
        assert!(api > dom);
    }

    #[tokio::test]
    async fn test_availability_gating() {
        let ctx = FetchContext::new();

        assert!(EmbedStrategy::new().is_available(&ctx).await);
        assert!(PublicPageStrategy::new().is_available(&ctx).await);
        // No session, no browser driver wired.
        assert!(!PrivateApiStrategy::new().is_available(&ctx).await);
        assert!(!RenderedDomStrategy::new().is_available(&ctx).await);
    }
}
