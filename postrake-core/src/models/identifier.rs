//! Content identifier resolution.
//!
//! LinkedIn post URLs name the same content in several shapes: a
//! `.../posts/slug-activity-<digits>-suffix` path, a
//! `urn:li:activity:<digits>` token, or a `urn:li:ugcPost:<digits>` token.
//! [`ContentIdentifier::resolve`] recognizes all of them and yields one
//! stable identifier per URL, used by every acquisition strategy.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// Identifier Kind
// ============================================================================

/// The URN kind of a content identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentifierKind {
    /// A feed activity (`urn:li:activity:...`).
    Activity,
    /// A share (`urn:li:share:...`).
    Share,
    /// A user-generated content post (`urn:li:ugcPost:...`).
    UgcPost,
}

impl IdentifierKind {
    /// The URN segment naming this kind.
    pub fn urn_segment(&self) -> &'static str {
        match self {
            Self::Activity => "activity",
            Self::Share => "share",
            Self::UgcPost => "ugcPost",
        }
    }

    /// Sibling kinds worth trying when a rendering for this kind is missing.
    ///
    /// The embed endpoint serves the same content under more than one URN
    /// kind; the order here is the order the embed strategy tries them.
    pub fn siblings(&self) -> &'static [IdentifierKind] {
        match self {
            Self::Activity => &[Self::UgcPost, Self::Share],
            Self::Share => &[Self::Activity, Self::UgcPost],
            Self::UgcPost => &[Self::Activity, Self::Share],
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.urn_segment())
    }
}

// ============================================================================
// Content Identifier
// ============================================================================

/// A stable identifier for one piece of content, resolved from a post URL.
///
/// Immutable once resolved; produced exactly once per pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentIdentifier {
    /// The URN kind the identifier was found under.
    pub kind: IdentifierKind,
    /// The numeric content id (nonempty digit string).
    pub id: String,
}

fn activity_path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)activity[- ](\d+)").expect("static pattern"))
}

fn activity_urn_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"urn:li:activity:(\d+)").expect("static pattern"))
}

fn ugc_post_urn_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"urn:li:ugcPost:(\d+)").expect("static pattern"))
}

impl ContentIdentifier {
    /// Creates an identifier from parts.
    pub fn new(kind: IdentifierKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Resolves an identifier from an arbitrary post URL.
    ///
    /// Recognized shapes, first match wins:
    /// 1. a path segment `activity-<digits>` (hyphen or space separated)
    /// 2. `urn:li:activity:<digits>`
    /// 3. `urn:li:ugcPost:<digits>`
    ///
    /// Returns `None` when no pattern matches. Callers treat `None` as a
    /// fatal precondition failure for the whole pipeline.
    pub fn resolve(url: &str) -> Option<Self> {
        if let Some(caps) = activity_path_re().captures(url) {
            return Some(Self::new(IdentifierKind::Activity, &caps[1]));
        }
        if let Some(caps) = activity_urn_re().captures(url) {
            return Some(Self::new(IdentifierKind::Activity, &caps[1]));
        }
        if let Some(caps) = ugc_post_urn_re().captures(url) {
            return Some(Self::new(IdentifierKind::UgcPost, &caps[1]));
        }
        None
    }

    /// Renders the URN for this identifier.
    pub fn urn(&self) -> String {
        self.urn_as(self.kind)
    }

    /// Renders the URN for this id under a different kind.
    pub fn urn_as(&self, kind: IdentifierKind) -> String {
        format!("urn:li:{}:{}", kind.urn_segment(), self.id)
    }
}

impl fmt::Display for ContentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.urn())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_activity_path() {
        let id = ContentIdentifier::resolve(
            "https://www.linkedin.com/posts/jane-doe_rust-activity-7123456789-abcd",
        )
        .unwrap();
        assert_eq!(id.kind, IdentifierKind::Activity);
        assert_eq!(id.id, "7123456789");
    }

    #[test]
    fn test_resolve_activity_path_space_separated() {
        let id = ContentIdentifier::resolve("share activity 7123456789").unwrap();
        assert_eq!(id.kind, IdentifierKind::Activity);
        assert_eq!(id.id, "7123456789");
    }

    #[test]
    fn test_resolve_activity_urn() {
        let id = ContentIdentifier::resolve(
            "https://www.linkedin.com/feed/update/urn:li:activity:9876543210/",
        )
        .unwrap();
        assert_eq!(id.kind, IdentifierKind::Activity);
        assert_eq!(id.id, "9876543210");
    }

    #[test]
    fn test_resolve_ugc_post_urn() {
        let id = ContentIdentifier::resolve(
            "https://www.linkedin.com/feed/update/urn:li:ugcPost:5554443332/",
        )
        .unwrap();
        assert_eq!(id.kind, IdentifierKind::UgcPost);
        assert_eq!(id.id, "5554443332");
    }

    #[test]
    fn test_resolve_prefers_path_over_urn() {
        // Both shapes present: the path pattern wins.
        let id = ContentIdentifier::resolve(
            "https://www.linkedin.com/posts/x-activity-111-y?urn=urn:li:ugcPost:222",
        )
        .unwrap();
        assert_eq!(id.kind, IdentifierKind::Activity);
        assert_eq!(id.id, "111");
    }

    #[test]
    fn test_resolve_no_match() {
        assert!(ContentIdentifier::resolve("https://www.linkedin.com/in/jane-doe/").is_none());
        assert!(ContentIdentifier::resolve("https://example.com/").is_none());
        assert!(ContentIdentifier::resolve("").is_none());
    }

    #[test]
    fn test_urn_rendering() {
        let id = ContentIdentifier::new(IdentifierKind::Activity, "123");
        assert_eq!(id.urn(), "urn:li:activity:123");
        assert_eq!(id.urn_as(IdentifierKind::UgcPost), "urn:li:ugcPost:123");
        assert_eq!(id.to_string(), "urn:li:activity:123");
    }

    #[test]
    fn test_sibling_order_for_activity() {
        assert_eq!(
            IdentifierKind::Activity.siblings(),
            &[IdentifierKind::UgcPost, IdentifierKind::Share]
        );
    }
}
