//! End-to-end scrape: plan every category, then fan out the page fetches.

use std::sync::Arc;

use shelfscan_core::{AppConfig, CategoryId};

use crate::pagination::{plan_all, DEFAULT_PAGE_SIZE};
use crate::project::RowProjector;
use crate::scheduler::{FanOutScheduler, DEFAULT_WORKERS};
use crate::sink::RowSink;
use crate::source::ItemSource;

/// Tunables for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub page_size: u64,
    /// Bound on concurrent requests, used for probes and for page fetches.
    pub concurrency: usize,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            concurrency: DEFAULT_WORKERS,
        }
    }
}

impl ScrapeOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.page_size,
            concurrency: config.max_concurrent_requests,
        }
    }
}

/// Counters for a whole run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub categories_planned: usize,
    pub categories_failed: usize,
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub rows_written: usize,
}

/// Scrapes `categories` into `sink`.
///
/// 1. Probe every category (bounded by `options.concurrency`) and plan its pages.
/// 2. Fetch every planned page on a pool of `options.concurrency` workers.
///
/// Failed categories and pages are logged and counted, never fatal.
///
/// # Errors
///
/// Returns the sink's error if rows cannot be written.
pub async fn scrape<S, K>(
    source: Arc<S>,
    categories: &[CategoryId],
    options: ScrapeOptions,
    projector: RowProjector,
    sink: &mut K,
) -> Result<RunSummary, K::Error>
where
    S: ItemSource,
    K: RowSink,
{
    let plan = plan_all(
        source.as_ref(),
        categories,
        options.page_size,
        options.concurrency,
    )
    .await;
    tracing::info!(
        categories = categories.len(),
        failed_categories = plan.failed.len(),
        pages = plan.pages.len(),
        "pagination planned"
    );

    let scheduler = FanOutScheduler::new(source, projector, options.concurrency);
    let pages = scheduler.run(plan.pages, sink).await?;

    let summary = RunSummary {
        categories_planned: plan.planned_categories,
        categories_failed: plan.failed.len(),
        pages_fetched: pages.pages_fetched,
        pages_failed: pages.pages_failed,
        rows_written: pages.rows_written,
    };
    tracing::info!(
        categories_planned = summary.categories_planned,
        categories_failed = summary.categories_failed,
        pages_fetched = summary.pages_fetched,
        pages_failed = summary.pages_failed,
        rows_written = summary.rows_written,
        "scrape finished"
    );
    Ok(summary)
}

/// Applies an optional cap to the resolved leaf list.
#[must_use]
pub fn limit_categories(
    mut categories: Vec<CategoryId>,
    limit: Option<usize>,
) -> Vec<CategoryId> {
    if let Some(limit) = limit {
        if categories.len() > limit {
            tracing::info!(
                resolved = categories.len(),
                limit,
                "limiting scrape to the first categories"
            );
            categories.truncate(limit);
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: i64) -> Vec<CategoryId> {
        (1..=n).map(CategoryId::Numeric).collect()
    }

    #[test]
    fn no_limit_keeps_everything() {
        assert_eq!(limit_categories(ids(5), None), ids(5));
    }

    #[test]
    fn limit_keeps_leading_categories() {
        assert_eq!(limit_categories(ids(5), Some(2)), ids(2));
    }

    #[test]
    fn limit_above_length_is_noop() {
        assert_eq!(limit_categories(ids(3), Some(10)), ids(3));
    }

    #[test]
    fn options_follow_config_defaults() {
        let options = ScrapeOptions::default();
        assert_eq!(options.page_size, 200);
        assert_eq!(options.concurrency, 10);
    }
}
