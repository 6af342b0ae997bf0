//! Batch fetch command.
//!
//! Processes input URLs either strictly sequentially with an inter-request
//! delay, or with small bounded concurrency when the caller opts in.
//! Records come back in input order and one URL's failure never halts the
//! rest of the batch.

use std::time::Duration;

use futures::StreamExt;
use tracing::info;

use postrake_core::CanonicalPost;
use postrake_fetch::FetchContext;
use postrake_linkedin::fetch_post;

/// Hard cap on concurrent pipelines; the source rate-limits aggressively.
const MAX_CONCURRENCY: usize = 3;

/// Batch processing options.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Delay between requests in sequential mode.
    pub delay: Duration,
    /// Number of concurrent pipelines, clamped to `[1, 3]`.
    pub concurrency: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(2),
            concurrency: 1,
        }
    }
}

/// Fetches every URL, yielding one record per input in input order.
pub async fn run_batch(
    urls: &[String],
    ctx: &FetchContext,
    options: &BatchOptions,
) -> Vec<CanonicalPost> {
    let concurrency = options.concurrency.clamp(1, MAX_CONCURRENCY);

    if concurrency == 1 {
        return run_sequential(urls, ctx, options.delay).await;
    }
    run_concurrent(urls, ctx, concurrency).await
}

async fn run_sequential(
    urls: &[String],
    ctx: &FetchContext,
    delay: Duration,
) -> Vec<CanonicalPost> {
    let mut records = Vec::with_capacity(urls.len());

    for (index, url) in urls.iter().enumerate() {
        info!(index = index + 1, total = urls.len(), url = %url, "Fetching post");
        records.push(fetch_post(url, ctx).await);

        if index + 1 < urls.len() && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    records
}

async fn run_concurrent(
    urls: &[String],
    ctx: &FetchContext,
    concurrency: usize,
) -> Vec<CanonicalPost> {
    let mut indexed: Vec<(usize, CanonicalPost)> = futures::stream::iter(
        urls.iter().enumerate().map(|(index, url)| async move {
            info!(index = index + 1, total = urls.len(), url = %url, "Fetching post");
            (index, fetch_post(url, ctx).await)
        }),
    )
    .buffer_unordered(concurrency)
    .collect()
    .await;

    // Restore input order regardless of completion order.
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, record)| record).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Unresolvable URLs abort before any network call, so these run
    // hermetically.
    fn bad_urls() -> Vec<String> {
        vec![
            "https://www.linkedin.com/in/first/".to_string(),
            "https://www.linkedin.com/in/second/".to_string(),
            "https://www.linkedin.com/in/third/".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_sequential_batch_preserves_order_and_isolates_failures() {
        let ctx = FetchContext::new();
        let options = BatchOptions {
            delay: Duration::ZERO,
            concurrency: 1,
        };

        let records = run_batch(&bad_urls(), &ctx, &options).await;

        assert_eq!(records.len(), 3);
        for (record, url) in records.iter().zip(bad_urls()) {
            assert_eq!(record.source_url, url);
            assert!(!record.success);
            assert!(record.error.is_some());
        }
    }

    #[tokio::test]
    async fn test_concurrent_batch_preserves_input_order() {
        let ctx = FetchContext::new();
        let options = BatchOptions {
            delay: Duration::ZERO,
            concurrency: 3,
        };

        let records = run_batch(&bad_urls(), &ctx, &options).await;

        let sources: Vec<&str> = records.iter().map(|r| r.source_url.as_str()).collect();
        assert_eq!(
            sources,
            vec![
                "https://www.linkedin.com/in/first/",
                "https://www.linkedin.com/in/second/",
                "https://www.linkedin.com/in/third/",
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrency_is_clamped() {
        let ctx = FetchContext::new();
        let options = BatchOptions {
            delay: Duration::ZERO,
            concurrency: 64,
        };

        // Clamping is internal; the observable contract is order + count.
        let records = run_batch(&bad_urls(), &ctx, &options).await;
        assert_eq!(records.len(), 3);
    }
}
