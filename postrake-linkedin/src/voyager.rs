//! Private-API client and entity-graph normalizer.
//!
//! The private feed API returns a normalized entity graph: a flat
//! `included` list of typed entities cross-referenced by URN, plus a root
//! element. Assembling one post means locating the content, author,
//! social-counts and media entities by shape and stitching them together.
//! Older deployments answer with a nested (non-normalized) document
//! instead; both shapes are accepted.

use serde_json::Value;

use postrake_core::{CanonicalPost, ContentKind, MediaItem, SessionCredentials};
use postrake_fetch::{HttpClient, ResponseExt, StrategyFailure};

use crate::headers::voyager_headers;
use crate::parse::finalize;
use crate::urls::{voyager_batch_url, voyager_update_url};

// ============================================================================
// Endpoint Shapes
// ============================================================================

/// The two lookup shapes the API exposes for one URN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointShape {
    /// Direct per-URN lookup (`/feed/updates/{urn}`).
    Direct,
    /// Batch/list lookup (`/feed/updates?ids=List({urn})`).
    Batch,
}

impl EndpointShape {
    /// The variants in the order they are tried.
    pub const ALL: &'static [EndpointShape] = &[Self::Direct, Self::Batch];
}

// ============================================================================
// Voyager API Client
// ============================================================================

/// Client for the private feed API.
#[derive(Debug, Clone)]
pub struct VoyagerApi {
    base_url: String,
}

impl VoyagerApi {
    /// Creates a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Fetches the update document for a URN through one endpoint shape.
    ///
    /// # Errors
    ///
    /// Maps the response status onto the failure taxonomy: `401`/`403` are
    /// `AuthInvalid` (fatal, credentials need refreshing), `404` is
    /// `NotFound`, `429` is `RateLimited` with the server's wait hint, and
    /// everything else non-200 is `Transient`.
    pub async fn fetch_update(
        &self,
        http: &HttpClient,
        session: &SessionCredentials,
        shape: EndpointShape,
        urn: &str,
    ) -> Result<Value, StrategyFailure> {
        let url = match shape {
            EndpointShape::Direct => voyager_update_url(&self.base_url, urn),
            EndpointShape::Batch => voyager_batch_url(&self.base_url, urn),
        };

        let headers = voyager_headers(session)?;
        let response = http.get_with_headers(&url, headers).await?;
        let status = response.status();

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(StrategyFailure::AuthInvalid(format!(
                "private API returned {status}"
            )));
        }
        if status.as_u16() == 404 {
            return Err(StrategyFailure::NotFound);
        }
        if response.is_rate_limited() {
            return Err(StrategyFailure::RateLimited {
                retry_after: response.retry_after_secs(),
            });
        }
        if !status.is_success() {
            return Err(StrategyFailure::Transient(format!(
                "private API returned {status}"
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| StrategyFailure::UnparseablePayload(format!("invalid JSON: {e}")))
    }
}

// ============================================================================
// Entity Graph Normalization
// ============================================================================

/// Normalizes an update document (either response shape) into the
/// canonical record.
pub fn parse_update_graph(document: &Value, source_url: &str) -> CanonicalPost {
    let mut post = CanonicalPost::new(source_url);

    if let Some(included) = document.get("included").and_then(Value::as_array) {
        parse_normalized(included, &mut post);
    } else {
        parse_nested(document, &mut post);
    }

    finalize(&mut post);
    post
}

/// Walks the flat `included` entity list of a normalized response.
fn parse_normalized(included: &[Value], post: &mut CanonicalPost) {
    // Content entity: URN-prefix match, or the typed update wrapper.
    let content = included.iter().find(|item| {
        let urn_match = item
            .get("entityUrn")
            .and_then(Value::as_str)
            .is_some_and(|urn| urn.contains(":ugcPost:") || urn.contains(":share:"));
        urn_match || type_ends(item, "UpdateV2")
    });
    if let Some(content) = content {
        apply_update(content, post);
    }

    // Author fallback: a profile entity with a public identifier. Only used
    // when the content entity carried no actor block.
    if post.author_name.is_empty() {
        if let Some(profile) = included.iter().find(|item| {
            item.get("firstName").is_some()
                && item.get("lastName").is_some()
                && item.get("publicIdentifier").is_some()
        }) {
            let first = text_of(profile.get("firstName")).unwrap_or_default();
            let last = text_of(profile.get("lastName")).unwrap_or_default();
            post.author_name = format!("{first} {last}").trim().to_string();
            if let Some(public_id) = profile.get("publicIdentifier").and_then(Value::as_str) {
                post.author_profile_url = format!("https://www.linkedin.com/in/{public_id}");
            }
        }
    }

    // Social counts: first matching triple wins, except a specifically
    // typed counts entity overrides a looser heuristic match.
    let mut have_counts = false;
    let mut have_typed = false;
    for item in included {
        let Some((likes, comments, shares)) = counts_triple(item) else {
            continue;
        };
        let is_typed = type_ends(item, "SocialActivityCounts");
        if !have_counts || (is_typed && !have_typed) {
            post.like_count = likes;
            post.comment_count = comments;
            post.share_count = shares;
            have_counts = true;
            have_typed = is_typed;
        }
    }

    // Media and article entities.
    let mut has_video = false;
    let mut has_article = false;
    for item in included {
        if type_ends(item, "VideoPlayMetadata") {
            if let Some(url) = video_stream_url(item) {
                post.media.push(MediaItem::video(url));
                has_video = true;
            }
        } else if let Some(url) = vector_image_url(item) {
            if !post.media.iter().any(|m| m.url == url) {
                post.media.push(MediaItem::image(url));
            }
        } else if type_ends(item, "MiniArticle") {
            has_article = true;
            if let Some(title) = text_of(item.get("title")) {
                post.article_title = Some(title);
            }
            if let Some(link) = item.get("permalink").and_then(Value::as_str) {
                post.article_link = Some(link.to_string());
            }
        }
    }

    if has_video {
        post.content_type = ContentKind::Video;
    } else if has_article {
        post.content_type = ContentKind::Article;
    }
}

/// Handles the legacy nested response shape: the update document sits
/// directly under `value`, no entity graph to walk.
fn parse_nested(document: &Value, post: &mut CanonicalPost) {
    let update = document
        .get("value")
        .and_then(|v| v.get("com.linkedin.voyager.feed.render.UpdateV2"))
        .unwrap_or(document);

    apply_update(update, post);

    if let Some(counts) = update
        .get("socialDetail")
        .and_then(|d| d.get("totalSocialActivityCounts"))
    {
        post.like_count = counts.get("numLikes").and_then(Value::as_u64).unwrap_or(0);
        post.comment_count = counts
            .get("numComments")
            .and_then(Value::as_u64)
            .unwrap_or(0);
        post.share_count = counts.get("numShares").and_then(Value::as_u64).unwrap_or(0);
    }
}

/// Copies commentary and actor fields out of an update entity.
fn apply_update(update: &Value, post: &mut CanonicalPost) {
    if post.post_text.is_empty() {
        if let Some(text) = text_of(update.get("commentary").and_then(|c| c.get("text"))) {
            post.post_text = text;
        }
    }

    if let Some(actor) = update.get("actor") {
        if let Some(name) = text_of(actor.get("name")) {
            post.author_name = name;
        }
        if let Some(description) = text_of(actor.get("description")) {
            post.author_headline = description;
        }
        if let Some(nav) = actor.get("navigationUrl").and_then(Value::as_str) {
            post.author_profile_url = nav.split('?').next().unwrap_or(nav).to_string();
        }
    }
}

/// Reads a text field that is either a bare string or `{ "text": ... }`.
fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj.get("text").and_then(Value::as_str).map(String::from),
        _ => None,
    }
}

fn type_ends(item: &Value, suffix: &str) -> bool {
    item.get("$type")
        .and_then(Value::as_str)
        .is_some_and(|t| t.ends_with(suffix))
}

/// A numeric like/comment/share triple identifies a counts entity.
fn counts_triple(item: &Value) -> Option<(u64, u64, u64)> {
    Some((
        item.get("numLikes").and_then(Value::as_u64)?,
        item.get("numComments").and_then(Value::as_u64)?,
        item.get("numShares").and_then(Value::as_u64)?,
    ))
}

/// Resolves a vector-image entity to its largest artifact.
///
/// The artifacts list is assumed ascending by size, so the last element is
/// taken as the largest rendition. Pinned by a unit test in case a real
/// payload ever contradicts the assumption.
fn vector_image_url(item: &Value) -> Option<String> {
    let root = item.get("rootUrl").and_then(Value::as_str)?;
    let artifacts = item.get("artifacts").and_then(Value::as_array)?;
    let segment = artifacts
        .last()?
        .get("fileIdentifyingUrlPathSegment")
        .and_then(Value::as_str)?;
    Some(format!("{root}{segment}"))
}

fn video_stream_url(item: &Value) -> Option<String> {
    item.get("progressiveStreams")
        .and_then(Value::as_array)?
        .first()?
        .get("streamingLocations")
        .and_then(Value::as_array)?
        .first()?
        .get("url")
        .and_then(Value::as_str)
        .map(String::from)
}

// ============================================================================
// Tests
// ============================================================================
