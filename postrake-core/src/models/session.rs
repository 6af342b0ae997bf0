//! Caller-supplied session credentials.
//!
//! The authenticated strategies (private API, rendered DOM) need a session
//! cookie pair that only the surrounding system can supply. The pipeline
//! never derives or defaults these values: constructing credentials from an
//! empty token is rejected, so a run without real credentials fails closed
//! instead of running with a baked-in secret.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Opaque session credential bundle for authenticated strategies.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionCredentials {
    /// Primary session token (the `li_at` cookie value).
    li_at: String,
    /// Secondary session identifier (the `JSESSIONID` cookie value), doubling
    /// as the CSRF token for private-API calls.
    jsessionid: Option<String>,
}

impl SessionCredentials {
    /// Creates a credential bundle from caller-supplied values.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if the primary token is empty.
    pub fn new(
        li_at: impl Into<String>,
        jsessionid: Option<String>,
    ) -> Result<Self, CoreError> {
        let li_at = li_at.into();
        if li_at.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "session token must not be empty".to_string(),
            ));
        }

        // The secondary id is sometimes pasted with surrounding quotes.
        let jsessionid = jsessionid
            .map(|j| j.trim_matches('"').to_string())
            .filter(|j| !j.is_empty());

        Ok(Self { li_at, jsessionid })
    }

    /// The primary session token.
    pub fn li_at(&self) -> &str {
        &self.li_at
    }

    /// The secondary session identifier, when supplied.
    pub fn jsessionid(&self) -> Option<&str> {
        self.jsessionid.as_deref()
    }

    /// CSRF token derived from the secondary identifier.
    ///
    /// The private API requires the `JSESSIONID` value (sans quotes) echoed
    /// back in a `csrf-token` header.
    pub fn csrf_token(&self) -> Option<&str> {
        self.jsessionid()
    }

    /// Renders the `Cookie` header value for authenticated requests.
    pub fn cookie_header(&self) -> String {
        match &self.jsessionid {
            Some(jsessionid) => {
                format!("li_at={}; JSESSIONID=\"{}\"", self.li_at, jsessionid)
            }
            None => format!("li_at={}", self.li_at),
        }
    }
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("li_at", &"<redacted>")
            .field("jsessionid", &self.jsessionid.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
