//! The canonical post record.
//!
//! Every acquisition strategy converges on [`CanonicalPost`], regardless of
//! whether the raw payload was embed HTML, a public page, a private API
//! entity graph, or a rendered DOM snapshot. The serialized field names are
//! camelCase to match the downstream dataset schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Media
// ============================================================================

/// The kind of a media attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A still image.
    Image,
    /// A video stream or file.
    Video,
}

/// One media attachment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Media kind.
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Direct URL of the media asset.
    pub url: String,
}

impl MediaItem {
    /// Creates an image attachment.
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Image,
            url: url.into(),
        }
    }

    /// Creates a video attachment.
    pub fn video(url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Video,
            url: url.into(),
        }
    }
}

// ============================================================================
// Content Kind
// ============================================================================

/// The dominant content type of a post.
///
/// Precedence when multiple signals are present: video > article > image >
/// text. `Text` is the default for bare commentary posts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Plain commentary, no media.
    #[default]
    Text,
    /// One or more image attachments.
    Image,
    /// A video attachment.
    Video,
    /// A shared external article.
    Article,
}

// ============================================================================
// Canonical Post
// ============================================================================

/// The normalized output record for one post URL.
///
/// Invariant: `success` is true iff `post_text` or `author_name` is
/// nonempty. Use [`CanonicalPost::recompute_success`] after mutating either
/// field so the flag never drifts from the content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalPost {
    /// The post URL this record was resolved from.
    pub source_url: String,
    /// Whether extraction produced a usable record.
    pub success: bool,
    /// Display name of the post author.
    pub author_name: String,
    /// Author headline/subtitle, when present.
    pub author_headline: String,
    /// Canonical profile URL of the author.
    pub author_profile_url: String,
    /// Full post text.
    pub post_text: String,
    /// Raw timestamp text as found in the payload.
    pub timestamp_text: String,
    /// ISO 8601 timestamp, when the payload carried a machine-readable one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_iso: Option<String>,
    /// Reaction count.
    pub like_count: u64,
    /// Comment count.
    pub comment_count: u64,
    /// Share/repost count.
    pub share_count: u64,
    /// Media attachments.
    pub media: Vec<MediaItem>,
    /// Title of a shared article, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_title: Option<String>,
    /// Link of a shared article, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_link: Option<String>,
    /// Hashtags from the post text, deduplicated, first-seen order.
    pub hashtags: Vec<String>,
    /// Dominant content type.
    pub content_type: ContentKind,
    /// When this record was produced.
    pub fetched_at: DateTime<Utc>,
    /// Failure description, set only on unsuccessful records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CanonicalPost {
    /// Creates an empty record for the given source URL.
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            success: false,
            author_name: String::new(),
            author_headline: String::new(),
            author_profile_url: String::new(),
            post_text: String::new(),
            timestamp_text: String::new(),
            timestamp_iso: None,
            like_count: 0,
            comment_count: 0,
            share_count: 0,
            media: Vec::new(),
            article_title: None,
            article_link: None,
            hashtags: Vec::new(),
            content_type: ContentKind::Text,
            fetched_at: Utc::now(),
            error: None,
        }
    }

    /// Creates a failure record for the given source URL.
    pub fn failure(source_url: impl Into<String>, error: impl Into<String>) -> Self {
        let mut post = Self::new(source_url);
        post.error = Some(error.into());
        post
    }

    /// Recomputes the `success` flag from the record's content.
    ///
    /// A record counts as usable when it carries post text or at least an
    /// author name. Returns the new flag value.
    pub fn recompute_success(&mut self) -> bool {
        self.success = !self.post_text.is_empty() || !self.author_name.is_empty();
        self.success
    }

    /// Applies the content-kind precedence given the record's media state.
    ///
    /// `Video` and `Article` always win once set; `Image` only upgrades a
    /// `Text` record that actually has an image attachment.
    pub fn resolve_content_kind(&mut self) {
        if self.content_type == ContentKind::Text
            && self.media.iter().any(|m| m.kind == MediaKind::Image)
        {
            self.content_type = ContentKind::Image;
        }
    }

    /// Returns true if the record has any media attachments.
    pub fn has_media(&self) -> bool {
        !self.media.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_requires_text_or_author() {
        let mut post = CanonicalPost::new("https://example.com/post");
        assert!(!post.recompute_success());

        post.post_text = "hello".to_string();
        assert!(post.recompute_success());

        post.post_text.clear();
        post.author_name = "Jane Doe".to_string();
        assert!(post.recompute_success());

        post.author_name.clear();
        assert!(!post.recompute_success());
    }

    #[test]
    fn test_content_kind_image_upgrade() {
        let mut post = CanonicalPost::new("https://example.com/post");
        post.media.push(MediaItem::image("https://cdn.example.com/a.jpg"));
        post.resolve_content_kind();
        assert_eq!(post.content_type, ContentKind::Image);
    }

    #[test]
    fn test_content_kind_video_precedence() {
        let mut post = CanonicalPost::new("https://example.com/post");
        post.content_type = ContentKind::Video;
        post.media.push(MediaItem::image("https://cdn.example.com/a.jpg"));
        post.resolve_content_kind();
        // An image attachment never demotes a video post.
        assert_eq!(post.content_type, ContentKind::Video);
    }

    #[test]
    fn test_serialized_field_names() {
        let post = CanonicalPost::new("https://example.com/post");
        let json = serde_json::to_value(&post).unwrap();

        assert!(json.get("sourceUrl").is_some());
        assert!(json.get("authorName").is_some());
        assert!(json.get("likeCount").is_some());
        assert!(json.get("fetchedAt").is_some());
        assert_eq!(json["contentType"], "text");
        // Optional fields stay off the wire until set.
        assert!(json.get("articleTitle").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_record() {
        let post = CanonicalPost::failure("https://example.com/post", "all strategies exhausted");
        assert!(!post.success);
        assert_eq!(post.error.as_deref(), Some("all strategies exhausted"));
    }
}
