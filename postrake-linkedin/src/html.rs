//! Selector-table HTML normalizer.
//!
//! One extraction routine serves both HTML-shaped payloads, the embed page
//! and the rendered feed DOM, differing only in which [`SelectorSet`] is
//! applied. Every field is resolved through its ordered candidate list;
//! the first candidate yielding a non-empty value wins.

use scraper::{ElementRef, Html, Selector};

use postrake_core::{CanonicalPost, ContentKind, MediaItem};

use crate::parse::{finalize, parse_count};
use crate::selectors::SelectorSet;
use crate::urls::normalize_profile_url;

/// Extracts a canonical record from an HTML payload using the given
/// selector table.
pub fn parse_post_html(html: &str, selectors: &SelectorSet, source_url: &str) -> CanonicalPost {
    let doc = Html::parse_document(html);
    let mut post = CanonicalPost::new(source_url);

    if let Some(name) = first_text(&doc, selectors.author_name) {
        post.author_name = name;
    }
    if let Some(headline) = first_text(&doc, selectors.author_headline) {
        post.author_headline = headline;
    }
    if let Some(href) = first_attr(&doc, selectors.author_profile, &["href"]) {
        post.author_profile_url = normalize_profile_url(&href);
    }
    if let Some(text) = first_text(&doc, selectors.post_text) {
        post.post_text = text;
    }

    extract_timestamp(&doc, selectors, &mut post);

    post.like_count = first_text(&doc, selectors.like_count)
        .map(|t| parse_count(&t))
        .unwrap_or(0);
    post.comment_count = first_text(&doc, selectors.comment_count)
        .map(|t| parse_count(&t))
        .unwrap_or(0);
    post.share_count = first_text(&doc, selectors.share_count)
        .map(|t| parse_count(&t))
        .unwrap_or(0);

    extract_images(&doc, selectors, &mut post);
    let has_video = extract_video(&doc, selectors, &mut post);
    let has_article = extract_article(&doc, selectors, &mut post);

    // Precedence: video > article; image vs. text is settled in finalize().
    if has_video {
        post.content_type = ContentKind::Video;
    } else if has_article {
        post.content_type = ContentKind::Article;
    }

    finalize(&mut post);
    post
}

/// First element matching any candidate, in candidate order.
fn first_element<'a>(doc: &'a Html, candidates: &[&str]) -> Option<ElementRef<'a>> {
    for candidate in candidates {
        if let Ok(selector) = Selector::parse(candidate) {
            if let Some(element) = doc.select(&selector).next() {
                return Some(element);
            }
        }
    }
    None
}

/// First non-empty text produced by any candidate, in candidate order.
fn first_text(doc: &Html, candidates: &[&str]) -> Option<String> {
    for candidate in candidates {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        for element in doc.select(&selector) {
            let text = element_text(element);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// First non-empty attribute value produced by any candidate.
fn first_attr(doc: &Html, candidates: &[&str], attrs: &[&str]) -> Option<String> {
    for candidate in candidates {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        for element in doc.select(&selector) {
            for attr in attrs {
                if let Some(value) = element.value().attr(attr) {
                    let value = value.trim();
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }
    }
    None
}

fn element_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for chunk in element.text() {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(chunk);
    }
    text
}

fn extract_timestamp(doc: &Html, selectors: &SelectorSet, post: &mut CanonicalPost) {
    if let Some(element) = first_element(doc, selectors.timestamp) {
        if let Some(datetime) = element.value().attr("datetime") {
            post.timestamp_text = datetime.trim().to_string();
        } else {
            post.timestamp_text = element_text(element);
        }
    }
}

fn extract_images(doc: &Html, selectors: &SelectorSet, post: &mut CanonicalPost) {
    for candidate in selectors.images {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        for element in doc.select(&selector) {
            let Some(src) = element
                .value()
                .attr("src")
                .or_else(|| element.value().attr("data-delayed-url"))
            else {
                continue;
            };
            // Skip inline placeholders and avatar imagery.
            if src.starts_with("data:")
                || src.contains("profile-photo")
                || src.contains("actor-image")
            {
                continue;
            }
            if !post.media.iter().any(|m| m.url == src) {
                post.media.push(MediaItem::image(src));
            }
        }
    }
}

fn extract_video(doc: &Html, selectors: &SelectorSet, post: &mut CanonicalPost) -> bool {
    if let Some(element) = first_element(doc, selectors.video) {
        if let Some(src) = element
            .value()
            .attr("src")
            .or_else(|| element.value().attr("data-sources"))
        {
            post.media.push(MediaItem::video(src));
            return true;
        }
    }
    false
}

fn extract_article(doc: &Html, selectors: &SelectorSet, post: &mut CanonicalPost) -> bool {
    let Some(container) = first_element(doc, selectors.article) else {
        return false;
    };

    for candidate in selectors.article_title {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        if let Some(title) = container.select(&selector).next() {
            let title = element_text(title);
            if !title.is_empty() {
                post.article_title = Some(title);
                break;
            }
        }
    }

    let link_selector = Selector::parse("a").expect("static selector");
    if let Some(link) = container.select(&link_selector).next() {
        if let Some(href) = link.value().attr("href") {
            post.article_link = Some(href.to_string());
        }
    }

    true
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use postrake_core::MediaKind;

    use super::*;
    use crate::selectors::{EMBED, FEED};

    const SOURCE: &str = "https://www.linkedin.com/feed/update/urn:li:activity:1/";

    const EMBED_HTML: &str = r#"
        <html><body>
          <div class="feed-shared-update-v2">
            <span class="feed-shared-actor__name">Jane Doe</span>
            <span class="feed-shared-actor__description">Staff Engineer</span>
            <a class="feed-shared-actor__container-link"
               href="/in/jane-doe?trk=public_post"></a>
            <p class="attributed-text-segment-list__content">
                Shipping the new pipeline today #rust #async
            </p>
            <time datetime="2024-05-01T10:00:00+00:00">May 1</time>
            <span class="social-details-social-counts__reactions-count">1,234</span>
            <span class="social-details-social-counts__comments">56 comments</span>
            <img class="feed-shared-image__image"
                 src="https://media.licdn.com/dms/image/post.jpg"/>
            <img class="feed-shared-image__image" src="data:image/gif;base64,R0lG"/>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_embed_extraction() {
        let post = parse_post_html(EMBED_HTML, &EMBED, SOURCE);

        assert!(post.success);
        assert_eq!(post.author_name, "Jane Doe");
        assert_eq!(post.author_headline, "Staff Engineer");
        assert_eq!(post.author_profile_url, "https://www.linkedin.com/in/jane-doe");
        assert!(post.post_text.starts_with("Shipping the new pipeline"));
        assert_eq!(post.like_count, 1234);
        assert_eq!(post.comment_count, 56);
        assert_eq!(post.share_count, 0);
        assert_eq!(post.hashtags, vec!["#rust", "#async"]);
        assert_eq!(post.timestamp_text, "2024-05-01T10:00:00+00:00");
        assert!(post.timestamp_iso.is_some());
        // The data: placeholder is dropped, the real image kept.
        assert_eq!(post.media.len(), 1);
        assert_eq!(post.media[0].kind, MediaKind::Image);
        assert_eq!(post.content_type, ContentKind::Image);
    }

    #[test]
    fn test_feed_dom_extraction() {
        let html = r#"
            <div class="feed-shared-update-v2">
              <span class="update-components-actor__name">
                <span dir="ltr"><span aria-hidden="true">John Smith</span></span>
              </span>
              <div class="update-components-text__text-view">Hello feed #welcome</div>
              <button aria-label="1,024 reactions on this post">1,024</button>
              <button aria-label="87 comments">87</button>
              <button aria-label="12 reposts">12</button>
            </div>
        "#;
        let post = parse_post_html(html, &FEED, SOURCE);

        assert!(post.success);
        assert_eq!(post.author_name, "John Smith");
        assert_eq!(post.post_text, "Hello feed #welcome");
        assert_eq!(post.like_count, 1024);
        assert_eq!(post.comment_count, 87);
        assert_eq!(post.share_count, 12);
    }

    #[test]
    fn test_video_takes_precedence_over_article() {
        let html = r#"
            <div>
              <span class="feed-shared-actor__name">Jane</span>
              <video src="https://cdn.example.com/clip.mp4"></video>
              <div class="feed-shared-article">
                <span class="feed-shared-article__title">Some Article</span>
                <a href="https://blog.example.com/post"></a>
              </div>
            </div>
        "#;
        let post = parse_post_html(html, &EMBED, SOURCE);

        assert_eq!(post.content_type, ContentKind::Video);
        assert_eq!(post.article_title.as_deref(), Some("Some Article"));
        assert_eq!(post.article_link.as_deref(), Some("https://blog.example.com/post"));
        assert!(post.media.iter().any(|m| m.kind == MediaKind::Video));
    }

    #[test]
    fn test_empty_payload_is_unsuccessful() {
        let post = parse_post_html("<html><body></body></html>", &EMBED, SOURCE);
        assert!(!post.success);
        assert!(post.post_text.is_empty());
        assert!(post.author_name.is_empty());
    }
}
