//! Profile-level post discovery.
//!
//! A thin consumer of the same pipeline: fetch a profile's recent-activity
//! listing, scan it for content URNs, and hand back post URLs for the
//! caller to feed through the acquisition chain.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use reqwest::StatusCode;
use tracing::{debug, info, instrument};

use postrake_fetch::{FetchContext, ResponseExt, StrategyFailure};

use crate::headers::browser_headers;
use crate::urls::{BASE_URL, activity_url, extract_username};

fn urn_scan_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"urn:li:(activity|share|ugcPost):(\d+)").expect("static pattern")
    })
}

/// Discovers recent post URLs from a profile's activity listing.
#[derive(Debug, Clone)]
pub struct ProfileDiscovery {
    base_url: String,
}

impl ProfileDiscovery {
    /// Creates a discovery client against the production site.
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
        }
    }

    /// Points discovery at a different base URL (tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Fetches up to `max_posts` post URLs from the profile's activity page.
    ///
    /// URLs are deduplicated by numeric content id and returned in
    /// first-seen order.
    ///
    /// # Errors
    ///
    /// Returns a [`StrategyFailure`] when the profile URL carries no
    /// username or the listing cannot be fetched.
    #[instrument(skip(self, ctx))]
    pub async fn discover(
        &self,
        profile_url: &str,
        max_posts: usize,
        ctx: &FetchContext,
    ) -> Result<Vec<String>, StrategyFailure> {
        let username = extract_username(profile_url).ok_or_else(|| {
            StrategyFailure::UnparseablePayload(format!(
                "no username in profile URL: {profile_url}"
            ))
        })?;

        let listing_url = activity_url(&self.base_url, &username);
        info!(username = %username, "Fetching profile activity listing");

        let response = ctx.http.get_with_headers(&listing_url, browser_headers()).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(StrategyFailure::NotFound);
        }
        if response.is_rate_limited() {
            return Err(StrategyFailure::RateLimited {
                retry_after: response.retry_after_secs(),
            });
        }
        if !status.is_success() {
            return Err(StrategyFailure::Transient(format!(
                "activity listing returned {status}"
            )));
        }

        let body = response.text().await?;
        let urls = scan_post_urls(&body, max_posts);
        info!(count = urls.len(), username = %username, "Discovered post URLs");
        Ok(urls)
    }
}

impl Default for ProfileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

/// Scans markup for content URNs, deduplicating by numeric id.
fn scan_post_urls(body: &str, max_posts: usize) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut urls = Vec::new();

    for caps in urn_scan_re().captures_iter(body) {
        let id = caps[2].to_string();
        if !seen.insert(id) {
            continue;
        }
        urls.push(format!(
            "{}/feed/update/urn:li:{}:{}",
            BASE_URL, &caps[1], &caps[2]
        ));
        if urls.len() >= max_posts {
            debug!(max_posts, "Reached discovery cap");
            break;
        }
    }
    urls
}

// ============================================================================
// Tests
// ============================================================================
