pub mod categories;
pub mod client;
pub mod error;
pub mod pagination;
pub mod pipeline;
pub mod project;
pub mod retry;
pub mod scheduler;
pub mod sink;
pub mod source;
pub mod types;

pub use categories::{leaf_category_ids, resolve_leaf_categories};
pub use client::CatalogClient;
pub use error::ScraperError;
pub use pagination::{page_descriptors, plan, plan_all, PagePlan};
pub use pipeline::{limit_categories, scrape, RunSummary, ScrapeOptions};
pub use project::RowProjector;
pub use retry::{RetryExhausted, RetryPolicy, Sleeper, TokioSleeper};
pub use scheduler::{FanOutScheduler, FetchOutcome, ScheduleSummary};
pub use sink::RowSink;
pub use source::ItemSource;
