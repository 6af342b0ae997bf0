//! Host capabilities injected into acquisition strategies.
//!
//! - [`http`] - HTTP client with tracing, browser-profile headers, and a
//!   domain allowlist
//! - [`browser`] - the headless browser driver capability
//! - [`artifacts`] - sink for diagnostic artifacts (payload dumps,
//!   screenshots)

pub mod artifacts;
pub mod browser;
pub mod http;
