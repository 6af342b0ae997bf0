//! Headless browser driver capability.
//!
//! The rendered-DOM strategy needs a controllable browser. The pipeline
//! never launches or configures one itself; the surrounding system injects
//! an implementation of [`BrowserDriver`] (a CDP bridge, a remote rendering
//! service, a test double). One driver serves one pipeline at a time:
//! navigation history and cookies are per-driver state, so callers must
//! serialize browser-based runs per driver instance.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::BrowserError;

/// Controllable headless-browser capability, supplied by the caller.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigates to the given URL and waits for the load to settle.
    async fn navigate(&self, url: &str) -> Result<(), BrowserError>;

    /// The URL the browser ended up on after redirects.
    async fn current_url(&self) -> Result<String, BrowserError>;

    /// Waits for any element matching `selector` to appear.
    ///
    /// Returns `Ok(false)` when the timeout elapses without a match; the
    /// caller decides whether that is fatal.
    async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<bool, BrowserError>;

    /// The rendered document as an HTML string.
    async fn content(&self) -> Result<String, BrowserError>;

    /// Captures a screenshot of the current viewport as PNG bytes.
    async fn screenshot(&self) -> Result<Vec<u8>, BrowserError>;
}
