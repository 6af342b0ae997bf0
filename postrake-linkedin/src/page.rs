//! Public post-page normalizer.
//!
//! The unauthenticated post page carries no stable post markup, but usually
//! embeds a JSON-LD structured block; failing that, the Open-Graph meta
//! tags still describe the post. A page whose title is a login/signup wall
//! is a failed fetch, not a sparse post; normalization signals that
//! upward instead of fabricating a record.

use scraper::{Html, Selector};
use serde_json::Value;

use postrake_core::{CanonicalPost, MediaItem};

use crate::parse::finalize;

/// Title fragments identifying an access wall instead of a post.
const WALL_MARKERS: &[&str] = &["Sign Up", "Log In", "Sign In"];

/// Normalizes a public post page.
///
/// Returns `None` when the page is an access wall or carries nothing
/// extractable; the strategy reports that as an unparseable payload.
pub fn parse_public_page(html: &str, source_url: &str) -> Option<CanonicalPost> {
    let doc = Html::parse_document(html);

    if let Some(structured) = find_structured_block(&doc) {
        return Some(from_structured(&structured, source_url));
    }

    from_open_graph(&doc, source_url)
}

/// Finds the first JSON-LD block describing a post or article.
fn find_structured_block(doc: &Html) -> Option<Value> {
    let selector = Selector::parse("script[type=\"application/ld+json\"]").expect("static selector");

    for script in doc.select(&selector) {
        let raw = script.text().collect::<String>();
        let Ok(data) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };

        let type_matches = data
            .get("@type")
            .and_then(Value::as_str)
            .is_some_and(|t| t == "Article" || t == "SocialMediaPosting");
        if type_matches || data.get("articleBody").is_some() {
            return Some(data);
        }
    }
    None
}

fn from_structured(data: &Value, source_url: &str) -> CanonicalPost {
    let mut post = CanonicalPost::new(source_url);

    post.post_text = data
        .get("articleBody")
        .or_else(|| data.get("description"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if let Some(author) = data.get("author") {
        if let Some(name) = author.get("name").and_then(Value::as_str) {
            post.author_name = name.to_string();
        }
        if let Some(url) = author.get("url").and_then(Value::as_str) {
            post.author_profile_url = url.to_string();
        }
    }

    post.like_count = interaction_count(data, "Like");
    post.comment_count = interaction_count(data, "Comment");

    if let Some(published) = data
        .get("datePublished")
        .or_else(|| data.get("dateCreated"))
        .and_then(Value::as_str)
    {
        post.timestamp_text = published.to_string();
    }

    match data.get("image") {
        Some(Value::String(url)) => post.media.push(MediaItem::image(url)),
        Some(Value::Object(image)) => {
            if let Some(url) = image.get("url").and_then(Value::as_str) {
                post.media.push(MediaItem::image(url));
            }
        }
        _ => {}
    }

    finalize(&mut post);
    post
}

/// Pulls a count out of the JSON-LD `interactionStatistic` list.
fn interaction_count(data: &Value, interaction: &str) -> u64 {
    let Some(stats) = data.get("interactionStatistic").and_then(Value::as_array) else {
        return 0;
    };

    stats
        .iter()
        .find(|stat| {
            stat.get("interactionType")
                .and_then(Value::as_str)
                .is_some_and(|t| t.contains(interaction))
        })
        .and_then(|stat| stat.get("userInteractionCount"))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

/// Last-resort normalization from Open-Graph meta tags.
fn from_open_graph(doc: &Html, source_url: &str) -> Option<CanonicalPost> {
    let title = meta_content(doc, "og:title").unwrap_or_default();
    let description = meta_content(doc, "og:description").unwrap_or_default();

    // A wall page advertises the site, not the post.
    if description.is_empty() || WALL_MARKERS.iter().any(|marker| title.contains(marker)) {
        return None;
    }

    let mut post = CanonicalPost::new(source_url);
    post.post_text = description;
    post.author_name = author_from_title(&title);

    if let Some(image) = meta_content(doc, "og:image") {
        post.media.push(MediaItem::image(image));
    }

    finalize(&mut post);
    Some(post)
}

fn meta_content(doc: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!("meta[property=\"{property}\"]")).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// The OG title reads "Author Name on LinkedIn: ..."; keep the name.
fn author_from_title(title: &str) -> String {
    let name = title
        .split(" on LinkedIn:")
        .next()
        .unwrap_or(title)
        .split(" posted on LinkedIn")
        .next()
        .unwrap_or(title);
    name.trim().to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "https://www.linkedin.com/posts/jane-activity-1-x";

    #[test]
    fn test_structured_block_wins() {
        let html = r#"
            <html><head>
              <script type="application/ld+json">
              {
                "@type": "SocialMediaPosting",
                "articleBody": "Big release today #launch",
                "author": {"name": "Jane Doe", "url": "https://www.linkedin.com/in/jane-doe"},
                "datePublished": "2024-05-01T10:00:00+00:00",
                "interactionStatistic": [
                  {"interactionType": "https://schema.org/LikeAction", "userInteractionCount": 42},
                  {"interactionType": "https://schema.org/CommentAction", "userInteractionCount": 7}
                ],
                "image": {"url": "https://media.licdn.com/dms/image/a.jpg"}
              }
              </script>
              <meta property="og:title" content="ignored"/>
            </head><body></body></html>
        "#;

        let post = parse_public_page(html, SOURCE).unwrap();
        assert!(post.success);
        assert_eq!(post.author_name, "Jane Doe");
        assert_eq!(post.post_text, "Big release today #launch");
        assert_eq!(post.like_count, 42);
        assert_eq!(post.comment_count, 7);
        assert_eq!(post.hashtags, vec!["#launch"]);
        assert!(post.timestamp_iso.is_some());
        assert_eq!(post.media.len(), 1);
    }

    #[test]
    fn test_open_graph_fallback() {
        let html = r#"
            <html><head>
              <meta property="og:title" content="Jane Doe on LinkedIn: Big release today"/>
              <meta property="og:description" content="Big release today #launch"/>
              <meta property="og:image" content="https://media.licdn.com/dms/image/a.jpg"/>
            </head><body></body></html>
        "#;

        let post = parse_public_page(html, SOURCE).unwrap();
        assert!(post.success);
        assert_eq!(post.author_name, "Jane Doe");
        assert_eq!(post.post_text, "Big release today #launch");
        assert_eq!(post.media.len(), 1);
    }

    #[test]
    fn test_login_wall_signals_failure() {
        let html = r#"
            <html><head>
              <meta property="og:title" content="Sign Up | LinkedIn"/>
              <meta property="og:description" content="500 million+ members"/>
            </head><body></body></html>
        "#;

        assert!(parse_public_page(html, SOURCE).is_none());
    }

    #[test]
    fn test_empty_page_signals_failure() {
        assert!(parse_public_page("<html><body></body></html>", SOURCE).is_none());
    }
}
