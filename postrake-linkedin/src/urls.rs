//! LinkedIn URL construction and recognition.
//!
//! Every endpoint the strategies hit is built here, parameterized over a
//! base URL so tests can point the strategies at a local server.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use postrake_core::{ContentIdentifier, IdentifierKind};

/// Production base URL.
pub const BASE_URL: &str = "https://www.linkedin.com";

/// Builds the public embed rendering URL for an identifier under `kind`.
pub fn embed_url(base: &str, identifier: &ContentIdentifier, kind: IdentifierKind) -> String {
    format!("{}/embed/feed/update/{}", base, identifier.urn_as(kind))
}

/// Builds the canonical feed-update URL for an identifier.
pub fn feed_update_url(base: &str, identifier: &ContentIdentifier) -> String {
    format!("{}/feed/update/{}/", base, identifier.urn())
}

/// Builds the recent-activity listing URL for a profile username.
pub fn activity_url(base: &str, username: &str) -> String {
    format!("{base}/in/{username}/recent-activity/all/")
}

/// Builds the direct private-API lookup URL for a URN.
pub fn voyager_update_url(base: &str, urn: &str) -> String {
    format!("{base}/voyager/api/feed/updates/{urn}")
}

/// Builds the batch/list private-API lookup URL for a URN.
pub fn voyager_batch_url(base: &str, urn: &str) -> String {
    format!("{base}/voyager/api/feed/updates?ids=List({urn})")
}

/// Returns true if the URL points at LinkedIn.
pub fn is_linkedin_url(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h == "linkedin.com" || h.ends_with(".linkedin.com")))
        .unwrap_or(false)
}

fn username_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/in/([^/?#]+)").expect("static pattern"))
}

/// Extracts the username from a profile URL (`.../in/<username>/...`).
pub fn extract_username(profile_url: &str) -> Option<String> {
    username_re()
        .captures(profile_url)
        .map(|caps| caps[1].to_string())
}

/// Normalizes a profile link found in a payload: strips tracking query
/// parameters and resolves site-relative paths.
pub fn normalize_profile_url(href: &str) -> String {
    let trimmed = href.split('?').next().unwrap_or(href);
    if trimmed.starts_with('/') {
        format!("{BASE_URL}{trimmed}")
    } else {
        trimmed.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ident() -> ContentIdentifier {
        ContentIdentifier::new(IdentifierKind::Activity, "7123")
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            embed_url(BASE_URL, &ident(), IdentifierKind::UgcPost),
            "https://www.linkedin.com/embed/feed/update/urn:li:ugcPost:7123"
        );
    }

    #[test]
    fn test_feed_update_url() {
        assert_eq!(
            feed_update_url(BASE_URL, &ident()),
            "https://www.linkedin.com/feed/update/urn:li:activity:7123/"
        );
    }

    #[test]
    fn test_voyager_urls() {
        assert_eq!(
            voyager_update_url(BASE_URL, "urn:li:activity:7123"),
            "https://www.linkedin.com/voyager/api/feed/updates/urn:li:activity:7123"
        );
        assert_eq!(
            voyager_batch_url(BASE_URL, "urn:li:activity:7123"),
            "https://www.linkedin.com/voyager/api/feed/updates?ids=List(urn:li:activity:7123)"
        );
    }

    #[test]
    fn test_is_linkedin_url() {
        assert!(is_linkedin_url("https://www.linkedin.com/posts/x-activity-1-y"));
        assert!(is_linkedin_url("https://linkedin.com/feed/"));
        assert!(!is_linkedin_url("https://example.com/linkedin.com"));
        assert!(!is_linkedin_url("not a url"));
    }

    #[test]
    fn test_extract_username() {
        assert_eq!(
            extract_username("https://www.linkedin.com/in/jane-doe/"),
            Some("jane-doe".to_string())
        );
        assert_eq!(
            extract_username("https://www.linkedin.com/in/jane-doe?trk=nav"),
            Some("jane-doe".to_string())
        );
        assert_eq!(extract_username("https://www.linkedin.com/feed/"), None);
    }

    #[test]
    fn test_normalize_profile_url() {
        assert_eq!(
            normalize_profile_url("/in/jane-doe?trk=public_post"),
            "https://www.linkedin.com/in/jane-doe"
        );
        assert_eq!(
            normalize_profile_url("https://www.linkedin.com/in/jane-doe?utm=x"),
            "https://www.linkedin.com/in/jane-doe"
        );
    }
}
