//! Profile discovery command.

use anyhow::{Context, Result};
use tracing::info;

use postrake_fetch::FetchContext;
use postrake_linkedin::ProfileDiscovery;

/// Discovers recent post URLs from a profile's activity listing.
pub async fn run(
    profile_url: &str,
    max_posts: usize,
    ctx: &FetchContext,
) -> Result<Vec<String>> {
    let discovery = ProfileDiscovery::new();
    let urls = discovery
        .discover(profile_url, max_posts, ctx)
        .await
        .with_context(|| format!("discovering posts for {profile_url}"))?;

    info!(count = urls.len(), "Profile discovery complete");
    Ok(urls)
}
