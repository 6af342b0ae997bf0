//! Request header sets for the LinkedIn strategies.
//!
//! The embed and public-page strategies present a plain browser profile;
//! the private API wants its own protocol headers plus the session cookie
//! pair with the CSRF token echoed back.

use reqwest::header::{self, HeaderMap, HeaderValue};

use postrake_core::SessionCredentials;
use postrake_fetch::StrategyFailure;

use crate::urls::BASE_URL;

/// Headers for embed-page requests.
pub fn embed_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        header::REFERER,
        HeaderValue::from_static("https://www.linkedin.com/"),
    );
    headers
}

/// Headers for public-page requests.
///
/// The HTTP client already carries the browser-profile defaults; this adds
/// the pieces that differ per navigation.
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

/// Headers for private-API requests.
///
/// # Errors
///
/// Returns `StrategyFailure::AuthInvalid` when the supplied token values
/// cannot be carried in a header.
pub fn voyager_headers(session: &SessionCredentials) -> Result<HeaderMap, StrategyFailure> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/vnd.linkedin.normalized+json+2.1"),
    );
    headers.insert(
        "x-restli-protocol-version",
        HeaderValue::from_static("2.0.0"),
    );
    headers.insert("x-li-lang", HeaderValue::from_static("en_US"));

    if let Some(csrf) = session.csrf_token() {
        headers.insert(
            "csrf-token",
            HeaderValue::from_str(csrf).map_err(|_| {
                StrategyFailure::AuthInvalid("session id not usable as a header value".to_string())
            })?,
        );
    }

    headers.insert(
        header::COOKIE,
        HeaderValue::from_str(&session.cookie_header()).map_err(|_| {
            StrategyFailure::AuthInvalid("session token not usable as a header value".to_string())
        })?,
    );
    headers.insert(header::REFERER, HeaderValue::from_static(BASE_URL));

    Ok(headers)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voyager_headers_carry_session() {
        let session = SessionCredentials::new("tok", Some("ajax:123".to_string())).unwrap();
        let headers = voyager_headers(&session).unwrap();

        assert_eq!(headers["csrf-token"], "ajax:123");
        assert_eq!(
            headers[header::ACCEPT],
            "application/vnd.linkedin.normalized+json+2.1"
        );
        let cookie = headers[header::COOKIE].to_str().unwrap();
        assert!(cookie.contains("li_at=tok"));
        assert!(cookie.contains("JSESSIONID"));
    }

    #[test]
    fn test_voyager_headers_reject_bad_token() {
        let session = SessionCredentials::new("tok\nwith-newline", None).unwrap();
        assert!(matches!(
            voyager_headers(&session),
            Err(StrategyFailure::AuthInvalid(_))
        ));
    }

    #[test]
    fn test_embed_headers() {
        let headers = embed_headers();
        assert!(headers.contains_key(header::ACCEPT));
        assert!(headers.contains_key(header::REFERER));
    }
}
