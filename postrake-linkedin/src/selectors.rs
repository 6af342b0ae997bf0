//! Per-field selector-candidate tables.
//!
//! The source site renders the same post through several markup generations
//! at once, so each field is looked up through an ordered candidate list;
//! first non-empty match wins. The embed page and the rendered feed DOM use
//! different generations, hence two tables. Extending coverage for a new
//! markup generation means appending here, never touching control flow.

/// Ordered selector candidates for every extracted field.
#[derive(Debug, Clone, Copy)]
pub struct SelectorSet {
    /// Author display name.
    pub author_name: &'static [&'static str],
    /// Author headline/subtitle.
    pub author_headline: &'static [&'static str],
    /// Anchor carrying the author profile link.
    pub author_profile: &'static [&'static str],
    /// Post body text.
    pub post_text: &'static [&'static str],
    /// Timestamp element (a `datetime` attribute is preferred over text).
    pub timestamp: &'static [&'static str],
    /// Reaction count.
    pub like_count: &'static [&'static str],
    /// Comment count.
    pub comment_count: &'static [&'static str],
    /// Share/repost count.
    pub share_count: &'static [&'static str],
    /// Image elements.
    pub images: &'static [&'static str],
    /// Video elements.
    pub video: &'static [&'static str],
    /// Shared-article container.
    pub article: &'static [&'static str],
    /// Article title, scoped inside the article container.
    pub article_title: &'static [&'static str],
}

/// Selector table for the public embed rendering.
pub const EMBED: SelectorSet = SelectorSet {
    author_name: &[
        ".feed-shared-actor__name",
        ".update-components-actor__name",
        "h3.base-main-card__title",
        ".profile-card-one-to-one__actor-info h3",
        "[data-tracking-control-name=\"public_post_feed-actor-name\"]",
    ],
    author_headline: &[
        ".feed-shared-actor__description",
        ".update-components-actor__description",
        "h4.base-main-card__subtitle",
    ],
    author_profile: &[
        "a.feed-shared-actor__container-link",
        "a.update-components-actor__container-link",
        "a[data-tracking-control-name=\"public_post_feed-actor-name\"]",
    ],
    post_text: &[
        ".feed-shared-update-v2__description .feed-shared-text__text-view",
        ".feed-shared-text__text-view",
        ".update-components-text__text-view",
        ".attributed-text-segment-list__content",
        ".feed-shared-update-v2__commentary .break-words",
        ".feed-shared-inline-show-more-text",
    ],
    timestamp: &[
        "time",
        "span.feed-shared-actor__sub-description",
        ".update-components-actor__sub-description",
    ],
    like_count: &[
        ".social-details-social-counts__reactions-count",
        ".social-counts-reactions__count",
    ],
    comment_count: &[
        ".social-details-social-counts__comments",
        ".social-counts-comments__count",
    ],
    share_count: &[],
    images: &[
        "img.feed-shared-image__image",
        "img.update-components-image__image",
        ".feed-shared-image img",
    ],
    video: &["video source", "video[src]"],
    article: &[".feed-shared-article", ".update-components-article"],
    article_title: &[
        ".feed-shared-article__title",
        ".update-components-article__title",
    ],
};

/// Selector table for the rendered (logged-in) feed DOM.
pub const FEED: SelectorSet = SelectorSet {
    author_name: &[
        ".update-components-actor__name span[dir=\"ltr\"] span[aria-hidden=\"true\"]",
        ".feed-shared-actor__name span[dir=\"ltr\"] span[aria-hidden=\"true\"]",
        ".feed-shared-actor__title span",
    ],
    author_headline: &[
        ".update-components-actor__description span[dir=\"ltr\"]",
        ".feed-shared-actor__description span[dir=\"ltr\"]",
    ],
    author_profile: &[
        "a.update-components-actor__container-link",
        "a.feed-shared-actor__container-link",
        "a.update-components-actor__meta-link",
    ],
    post_text: &[
        ".feed-shared-update-v2__description .update-components-text",
        ".update-components-text__text-view",
        ".feed-shared-text__text-view",
        ".break-words .update-components-text",
        "[data-ad-preview=\"message\"] span[dir=\"ltr\"]",
    ],
    timestamp: &[
        ".update-components-actor__sub-description span[aria-hidden=\"true\"]",
        ".feed-shared-actor__sub-description span[aria-hidden=\"true\"]",
        "time",
    ],
    like_count: &[
        ".social-details-social-counts__reactions-count",
        "button[aria-label*=\"reaction\"]",
        "button[aria-label*=\"like\"]",
    ],
    comment_count: &[
        "button[aria-label*=\"comment\"]",
        ".social-details-social-counts__comments",
    ],
    share_count: &[
        "button[aria-label*=\"repost\"]",
        "button[aria-label*=\"share\"]",
    ],
    images: &[
        ".update-components-image__image img",
        ".feed-shared-image__image img",
        "img.update-components-image__image",
    ],
    video: &["video source", "video[src]"],
    article: &[".update-components-article", ".feed-shared-article"],
    article_title: &[
        ".update-components-article__title",
        ".feed-shared-article__title",
    ],
};

/// Body marker for an embed rendering that does not exist under a URN kind.
pub const NOT_FOUND_MARKER: &str = "Page not found";

/// Selector the browser strategy waits on before reading the document.
pub const CONTENT_WAIT_SELECTOR: &str = ".update-components-text, \
     .feed-shared-text__text-view, .feed-shared-update-v2__description, \
     .break-words, [data-urn], .scaffold-finite-scroll";

/// URL path fragments indicating a login/verification redirect.
pub const AUTH_WALL_MARKERS: &[&str] = &["login", "authwall", "signup", "checkpoint", "challenge"];

// ============================================================================
// Tests
// ============================================================================
