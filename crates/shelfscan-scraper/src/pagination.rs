//! Offset/limit pagination planning.
//!
//! The items endpoint reports the size of a category's listing in
//! `metadata.count`. A probe request with `limit=1` learns that count, and the
//! listing is then cut into consecutive pages of at most `page_size` items:
//!
//! ```text
//! count=450, page_size=200  ->  [0..200) [200..400) [400..450)
//! ```

use futures::stream::{self, StreamExt};
use shelfscan_core::{CategoryId, PageDescriptor};

use crate::error::ScraperError;
use crate::source::ItemSource;
use crate::types::ProbeResponse;

/// Largest page the items endpoint serves.
pub const DEFAULT_PAGE_SIZE: u64 = 200;

/// Cuts `[0, total_count)` into consecutive pages of at most `page_size` items.
///
/// Only the last page may be shorter. Pure and deterministic: the same inputs
/// always yield the same sequence. A `page_size` of zero is treated as one.
#[must_use]
pub fn page_descriptors(
    category_id: &CategoryId,
    total_count: u64,
    page_size: u64,
) -> Vec<PageDescriptor> {
    let page_size = page_size.max(1);
    let mut pages = Vec::new();
    let mut offset = 0u64;

    while offset < total_count {
        let limit = page_size.min(total_count - offset);
        pages.push(PageDescriptor {
            category_id: category_id.clone(),
            offset,
            limit,
        });
        offset += limit;
    }

    pages
}

/// Issues the `limit=1` probe for `category_id` and returns `metadata.count`.
///
/// # Errors
///
/// - [`ScraperError::Fetch`] if the probe fails after retries.
/// - [`ScraperError::MalformedPage`] if the response has no `metadata.count`.
pub async fn probe_total_count<S: ItemSource>(
    source: &S,
    category_id: &CategoryId,
) -> Result<u64, ScraperError> {
    let body = source.fetch_items(category_id, 0, 1).await?;
    let probe: ProbeResponse =
        serde_json::from_value(body).map_err(|e| ScraperError::MalformedPage {
            context: format!("probe of category {category_id}"),
            source: e,
        })?;
    Ok(probe.metadata.count)
}

/// Probes `category_id` and plans the pages covering its whole listing.
///
/// # Errors
///
/// Propagates any error from [`probe_total_count`]; the category then yields
/// no pages.
pub async fn plan<S: ItemSource>(
    source: &S,
    category_id: &CategoryId,
    page_size: u64,
) -> Result<Vec<PageDescriptor>, ScraperError> {
    let total_count = probe_total_count(source, category_id).await?;
    let pages = page_descriptors(category_id, total_count, page_size);
    tracing::debug!(
        category_id = %category_id,
        total_count,
        pages = pages.len(),
        "planned category"
    );
    Ok(pages)
}

/// Result of planning a batch of categories.
#[derive(Debug, Default)]
pub struct PagePlan {
    /// Pages of every category whose probe succeeded.
    pub pages: Vec<PageDescriptor>,
    /// Categories whose probe failed; they contribute nothing to the run.
    pub failed: Vec<(CategoryId, ScraperError)>,
    pub planned_categories: usize,
}

/// Plans all `categories`, running up to `concurrency` probes at once.
///
/// A failed probe skips its category with a warning and never affects the
/// others. Pages of one category keep their offset order; pages of different
/// categories are grouped in probe completion order.
pub async fn plan_all<S: ItemSource>(
    source: &S,
    categories: &[CategoryId],
    page_size: u64,
    concurrency: usize,
) -> PagePlan {
    let outcomes: Vec<(&CategoryId, Result<Vec<PageDescriptor>, ScraperError>)> =
        stream::iter(categories)
            .map(|category_id| async move {
                (category_id, plan(source, category_id, page_size).await)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

    let mut result = PagePlan::default();
    for (category_id, outcome) in outcomes {
        match outcome {
            Ok(pages) => {
                result.planned_categories += 1;
                result.pages.extend(pages);
            }
            Err(e) => {
                tracing::warn!(
                    category_id = %category_id,
                    error = %e,
                    "skipping category, probe request failed"
                );
                result.failed.push((category_id.clone(), e));
            }
        }
    }
    result
}
