use std::path::PathBuf;

/// Retry knobs for a single upstream request, all delays in whole seconds.
///
/// The wait after failed attempt `n` is
/// `clamp(multiplier_secs * 2^(n-1), base_delay_secs, max_delay_secs)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_secs: u64,
    pub multiplier_secs: u64,
    pub max_delay_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 4,
            multiplier_secs: 1,
            max_delay_secs: 10,
        }
    }
}

/// Immutable run configuration, built once at startup and handed to every
/// component constructor.
#[derive(Clone)]
pub struct AppConfig {
    /// Town name sent in the geo header and stamped on every output row.
    pub town: String,
    /// Region id sent in the geo id header.
    pub region: String,
    pub categories_url: String,
    pub items_url: String,
    pub user_agent: String,
    /// Upstream HTTPS proxy. May embed credentials, so it is redacted in `Debug`.
    pub proxy_url: Option<String>,
    /// When set, category-tree resolution is skipped and only this category is scraped.
    pub category_id: Option<String>,
    /// Caps how many resolved leaf categories are scraped. `None` scrapes all of them.
    pub category_limit: Option<usize>,
    pub output_path: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub max_concurrent_requests: usize,
    pub page_size: u64,
    pub retry: RetrySettings,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("town", &self.town)
            .field("region", &self.region)
            .field("categories_url", &self.categories_url)
            .field("items_url", &self.items_url)
            .field("user_agent", &self.user_agent)
            .field("proxy_url", &self.proxy_url.as_ref().map(|_| "[redacted]"))
            .field("category_id", &self.category_id)
            .field("category_limit", &self.category_limit)
            .field("output_path", &self.output_path)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("page_size", &self.page_size)
            .field("retry", &self.retry)
            .finish()
    }
}
