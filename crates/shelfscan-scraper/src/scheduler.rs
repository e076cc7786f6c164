//! Bounded fan-out of page fetches.
//!
//! A fixed number of worker tasks pull [`PageDescriptor`]s from one shared
//! queue, fetch and project each page, and hand a [`FetchOutcome`] to the
//! single consumer inside [`FanOutScheduler::run`]. Only that consumer touches
//! the sink, so sink writes are serialized without a lock around the sink.
//!
//! ```text
//!             ┌─ worker 1 ─┐
//! queue ──────┼─ worker 2 ─┼──► mpsc ──► run() ──► RowSink
//!             └─ worker K ─┘
//! ```
//!
//! A failed page is logged and counted; it never stops sibling workers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use shelfscan_core::{OutputRow, PageDescriptor};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::error::ScraperError;
use crate::project::RowProjector;
use crate::sink::RowSink;
use crate::source::ItemSource;

/// Page fetches allowed in flight at once across all categories.
pub const DEFAULT_WORKERS: usize = 10;

/// What one unit of work produced.
#[derive(Debug)]
pub enum FetchOutcome {
    Page {
        page: PageDescriptor,
        rows: Vec<OutputRow>,
    },
    Failed {
        page: PageDescriptor,
        error: ScraperError,
    },
}

/// Counters for one scheduler run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub rows_written: usize,
}

type WorkQueue = Arc<Mutex<VecDeque<PageDescriptor>>>;

/// Executes page fetches on a fixed-size pool of tokio tasks.
pub struct FanOutScheduler<S> {
    source: Arc<S>,
    projector: Arc<RowProjector>,
    workers: usize,
}

impl<S: ItemSource> FanOutScheduler<S> {
    /// `workers` is the global in-flight bound; zero is bumped to one.
    #[must_use]
    pub fn new(source: Arc<S>, projector: RowProjector, workers: usize) -> Self {
        Self {
            source,
            projector: Arc::new(projector),
            workers: workers.max(1),
        }
    }

    /// Fetches every page, writing rows to `sink` in completion order.
    ///
    /// Returns once every page has either produced its rows or been reported
    /// as failed, after flushing the sink.
    ///
    /// # Errors
    ///
    /// Only sink errors are returned. Fetch, projection, and worker failures
    /// are logged and counted in [`ScheduleSummary::pages_failed`].
    pub async fn run<K: RowSink>(
        &self,
        pages: Vec<PageDescriptor>,
        sink: &mut K,
    ) -> Result<ScheduleSummary, K::Error> {
        let total = pages.len();
        let queue: WorkQueue = Arc::new(Mutex::new(VecDeque::from(pages)));
        let (tx, mut rx) = mpsc::channel::<FetchOutcome>(self.workers);

        let mut workers = JoinSet::new();
        for _ in 0..self.workers.min(total) {
            let queue = Arc::clone(&queue);
            let source = Arc::clone(&self.source);
            let projector = Arc::clone(&self.projector);
            let tx = tx.clone();
            workers.spawn(async move {
                while let Some(page) = next_page(&queue) {
                    let outcome = fetch_page(source.as_ref(), &projector, page).await;
                    if tx.send(outcome).await.is_err() {
                        break;
                    }
                }
            });
        }
        // The channel closes once every worker has dropped its sender.
        drop(tx);

        let mut summary = ScheduleSummary::default();
        while let Some(outcome) = rx.recv().await {
            match outcome {
                FetchOutcome::Page { page, rows } => {
                    for row in &rows {
                        sink.write_row(row)?;
                    }
                    tracing::debug!(
                        category_id = %page.category_id,
                        offset = page.offset,
                        limit = page.limit,
                        rows = rows.len(),
                        "page written"
                    );
                    summary.pages_fetched += 1;
                    summary.rows_written += rows.len();
                }
                FetchOutcome::Failed { page, error } => {
                    tracing::warn!(
                        category_id = %page.category_id,
                        offset = page.offset,
                        limit = page.limit,
                        error = %error,
                        "skipping page, fetch failed"
                    );
                    summary.pages_failed += 1;
                }
            }
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                let error = ScraperError::WorkerPanicked(e.to_string());
                tracing::error!(error = %error, "page worker stopped");
            }
        }

        // A panicked worker loses the page it was holding; count it as failed.
        let reported = summary.pages_fetched + summary.pages_failed;
        if reported < total {
            tracing::warn!(lost = total - reported, "pages lost to worker failures");
            summary.pages_failed += total - reported;
        }

        sink.flush()?;
        Ok(summary)
    }
}

fn next_page(queue: &Mutex<VecDeque<PageDescriptor>>) -> Option<PageDescriptor> {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop_front()
}

/// One unit of work: fetch a page and project it, turning any failure into
/// a [`FetchOutcome::Failed`].
async fn fetch_page<S: ItemSource>(
    source: &S,
    projector: &RowProjector,
    page: PageDescriptor,
) -> FetchOutcome {
    let result = match source
        .fetch_items(&page.category_id, page.offset, page.limit)
        .await
    {
        Ok(body) => projector.project(&body),
        Err(e) => Err(e),
    };

    match result {
        Ok(rows) => FetchOutcome::Page { page, rows },
        Err(error) => FetchOutcome::Failed { page, error },
    }
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod tests;
