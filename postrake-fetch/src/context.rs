//! Fetch context providing strategies with injected capabilities.
//!
//! The context bundles everything a strategy might need: the HTTP client,
//! an optional browser driver, optional session credentials, and the
//! diagnostic artifact sink. Strategies never construct these themselves.

use std::sync::Arc;
use std::time::Duration;

use postrake_core::SessionCredentials;

use crate::error::HttpError;
use crate::host::artifacts::{ArtifactSink, DiscardSink};
use crate::host::browser::BrowserDriver;
use crate::host::http::HttpClient;
use crate::retry::RetryPolicy;

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Per-request timeout for HTTP strategies.
    pub timeout: Duration,
    /// Navigation timeout for the browser strategy.
    pub nav_timeout: Duration,
    /// How long the browser strategy waits for a content-bearing selector.
    pub selector_timeout: Duration,
    /// Retry policy applied to each strategy's network calls.
    pub retry: RetryPolicy,
    /// Outbound proxy endpoint, opaque to the pipeline.
    pub proxy: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            nav_timeout: Duration::from_secs(45),
            selector_timeout: Duration::from_secs(20),
            retry: RetryPolicy::default(),
            proxy: None,
        }
    }
}

impl FetchSettings {
    /// Sets the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the proxy endpoint.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context passed to every acquisition strategy.
pub struct FetchContext {
    /// HTTP client shared by the HTTP-based strategies.
    pub http: Arc<HttpClient>,
    /// Headless browser driver, when the caller supplies one.
    pub browser: Option<Arc<dyn BrowserDriver>>,
    /// Session credentials for authenticated strategies.
    pub session: Option<SessionCredentials>,
    /// Diagnostic artifact sink.
    pub artifacts: Arc<dyn ArtifactSink>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with default settings and no credentials.
    ///
    /// # Panics
    ///
    /// Panics if the default HTTP client cannot be built (broken TLS
    /// configuration). Use [`FetchContext::builder`] with explicit settings
    /// to handle construction errors.
    pub fn new() -> Self {
        Self::builder()
            .build()
            .expect("default context must build without a proxy")
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// The effective per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.settings.timeout
    }

    /// The retry policy for strategy network calls.
    pub fn retry(&self) -> &RetryPolicy {
        &self.settings.retry
    }
}

impl Default for FetchContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .field("has_browser", &self.browser.is_some())
            .field("has_session", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a [`FetchContext`].
pub struct FetchContextBuilder {
    http: Option<Arc<HttpClient>>,
    browser: Option<Arc<dyn BrowserDriver>>,
    session: Option<SessionCredentials>,
    artifacts: Option<Arc<dyn ArtifactSink>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            http: None,
            browser: None,
            session: None,
            artifacts: None,
            settings: FetchSettings::default(),
        }
    }

    /// Sets a prebuilt HTTP client, bypassing settings-based construction.
    pub fn http(mut self, http: Arc<HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the browser driver.
    pub fn browser(mut self, browser: Arc<dyn BrowserDriver>) -> Self {
        self.browser = Some(browser);
        self
    }

    /// Sets the session credentials.
    pub fn session(mut self, session: SessionCredentials) -> Self {
        self.session = Some(session);
        self
    }

    /// Sets the artifact sink.
    pub fn artifacts(mut self, artifacts: Arc<dyn ArtifactSink>) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the HTTP timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.settings.retry = retry;
        self
    }

    /// Sets the proxy endpoint.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.settings.proxy = Some(proxy.into());
        self
    }

    /// Builds the fetch context.
    ///
    /// # Errors
    ///
    /// Returns `HttpError` when the HTTP client cannot be built from the
    /// settings (for example an unparseable proxy endpoint).
    pub fn build(self) -> Result<FetchContext, HttpError> {
        let http = match self.http {
            Some(http) => http,
            None => Arc::new(HttpClient::with_settings(
                self.settings.timeout,
                self.settings.proxy.as_deref(),
            )?),
        };

        Ok(FetchContext {
            http,
            browser: self.browser,
            session: self.session,
            artifacts: self.artifacts.unwrap_or_else(|| Arc::new(DiscardSink)),
            settings: self.settings,
        })
    }
}

impl Default for FetchContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
