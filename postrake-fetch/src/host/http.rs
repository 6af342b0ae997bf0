//! HTTP client with tracing, browser-profile headers, and domain allowlist.
//!
//! All unauthenticated strategies go through this wrapper. It presents a
//! realistic browser profile (user agent, accept headers, bounded redirect
//! following) because the source site serves degraded markup to obvious
//! automation.

use std::time::Duration;

use reqwest::{Client, Response, header, header::HeaderMap, redirect};
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Maximum redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// Desktop browser user agent presented on every request.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

// ============================================================================
// HTTP Client
// ============================================================================

/// HTTP client wrapper used by all HTTP-based strategies.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a client with default settings.
    ///
    /// # Panics
    ///
    /// Panics if the underlying client cannot be built, which only happens
    /// when the system TLS configuration is fundamentally broken.
    pub fn new() -> Self {
        Self::with_settings(Duration::from_secs(DEFAULT_TIMEOUT_SECS), None)
            .expect("default HTTP client must build without a proxy")
    }

    /// Creates a client with a custom timeout and optional proxy endpoint.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::InvalidProxy` when the proxy endpoint cannot be
    /// parsed, and `HttpError::Request` when the client cannot be built.
    pub fn with_settings(
        timeout: Duration,
        proxy: Option<&str>,
    ) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .parse()
                .expect("static header value"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            "en-US,en;q=0.5".parse().expect("static header value"),
        );
        headers.insert(
            header::UPGRADE_INSECURE_REQUESTS,
            "1".parse().expect("static header value"),
        );

        let mut builder = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS));

        if let Some(endpoint) = proxy {
            let proxy = reqwest::Proxy::all(endpoint)
                .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            inner: builder.build()?,
            allowed_domains: None,
        })
    }

    /// Restricts the client to the given domains (and their subdomains).
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), HttpError> {
        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| HttpError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(HttpError::DomainNotAllowed(host.to_string()))
        }
    }

    /// Performs a GET request.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn get(&self, url: &str) -> Result<Response, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("GET request");

        let response = self.inner.get(url).send().await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs a GET request with custom headers.
    #[instrument(skip(self, headers), fields(url = %url))]
    pub async fn get_with_headers(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<Response, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("GET request with headers");

        let response = self.inner.get(url).headers(headers).send().await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }

    /// Performs a GET request with a session cookie header.
    #[instrument(skip(self, cookies), fields(url = %url))]
    pub async fn get_with_cookies(
        &self,
        url: &str,
        cookies: &str,
    ) -> Result<Response, HttpError> {
        self.is_domain_allowed(url)?;
        debug!("GET request with cookies");

        let response = self
            .inner
            .get(url)
            .header(header::COOKIE, cookies)
            .send()
            .await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Response Extensions
// ============================================================================

/// Extension trait for Response handling.
pub trait ResponseExt {
    /// Check if the response indicates rate limiting.
    fn is_rate_limited(&self) -> bool;

    /// Get the Retry-After header value in seconds.
    fn retry_after_secs(&self) -> Option<u64>;
}

impl ResponseExt for Response {
    fn is_rate_limited(&self) -> bool {
        self.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
    }

    fn retry_after_secs(&self) -> Option<u64> {
        self.headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_allowlist() {
        let client = HttpClient::new()
            .with_allowed_domains(vec!["linkedin.com".to_string(), "licdn.com".to_string()]);

        assert!(client
            .is_domain_allowed("https://www.linkedin.com/feed/update/urn:li:activity:1/")
            .is_ok());
        assert!(client
            .is_domain_allowed("https://media.licdn.com/dms/image/abc.jpg")
            .is_ok());
        assert!(client.is_domain_allowed("https://evil.com/steal").is_err());
    }

    #[test]
    fn test_no_domain_restrictions() {
        let client = HttpClient::new();
        assert!(client.is_domain_allowed("https://any.domain.com").is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let client = HttpClient::new().with_allowed_domains(vec!["linkedin.com".to_string()]);
        assert!(client.is_domain_allowed("not-a-valid-url").is_err());
    }

    #[test]
    fn test_invalid_proxy_rejected() {
        let result = HttpClient::with_settings(Duration::from_secs(5), Some("::bad::"));
        assert!(matches!(result, Err(HttpError::InvalidProxy(_))));
    }
}
