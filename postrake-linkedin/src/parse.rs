//! Shared normalization helpers.
//!
//! Common post-processing applied after every normalizer: count parsing,
//! hashtag extraction, content-kind resolution and timestamp promotion.

use std::sync::OnceLock;

use chrono::DateTime;
use regex::Regex;

use postrake_core::CanonicalPost;

/// Parses an engagement count from display text by stripping every
/// non-digit character ("1,234 reactions" → 1234).
pub fn parse_count(text: &str) -> u64 {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

fn hashtag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Word characters plus the Latin-extended accented range.
    RE.get_or_init(|| Regex::new(r"#[\w\u{00C0}-\u{024F}]+").expect("static pattern"))
}

/// Extracts hashtags from post text: deduplicated, first-seen order.
///
/// Idempotent: re-running over the same text yields the same list.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for m in hashtag_re().find_iter(text) {
        let tag = m.as_str();
        if !seen.iter().any(|s| s == tag) {
            seen.push(tag.to_string());
        }
    }
    seen
}

/// Final post-processing shared by every normalizer.
///
/// Derives hashtags from the final post text, resolves the content-kind
/// precedence, promotes a machine-readable timestamp when the raw text
/// happens to be one, and recomputes the success flag.
pub fn finalize(post: &mut CanonicalPost) {
    post.hashtags = extract_hashtags(&post.post_text);
    post.resolve_content_kind();

    if post.timestamp_iso.is_none() && !post.timestamp_text.is_empty() {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&post.timestamp_text) {
            post.timestamp_iso = Some(parsed.to_rfc3339());
        }
    }

    post.recompute_success();
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1,234"), 1234);
        assert_eq!(parse_count("56 comments"), 56);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("no digits"), 0);
    }

    #[test]
    fn test_hashtags_dedup_first_seen_order() {
        let tags = extract_hashtags("Loving #rust and #async, more #rust soon, même #café");
        assert_eq!(tags, vec!["#rust", "#async", "#café"]);
    }

    #[test]
    fn test_hashtag_extraction_is_idempotent() {
        let text = "#one #two #one #three #two";
        let first = extract_hashtags(text);
        let second = extract_hashtags(text);
        assert_eq!(first, second);
        assert_eq!(first, vec!["#one", "#two", "#three"]);
    }

    #[test]
    fn test_finalize_promotes_rfc3339_timestamp() {
        let mut post = CanonicalPost::new("https://example.com/p");
        post.post_text = "Launch day #ship".to_string();
        post.timestamp_text = "2024-05-01T10:00:00+00:00".to_string();
        finalize(&mut post);

        assert!(post.success);
        assert_eq!(post.hashtags, vec!["#ship"]);
        assert!(post.timestamp_iso.is_some());
    }

    #[test]
    fn test_finalize_leaves_display_timestamp_alone() {
        let mut post = CanonicalPost::new("https://example.com/p");
        post.author_name = "Jane".to_string();
        post.timestamp_text = "3d ago".to_string();
        finalize(&mut post);

        assert!(post.success);
        assert!(post.timestamp_iso.is_none());
    }
}
