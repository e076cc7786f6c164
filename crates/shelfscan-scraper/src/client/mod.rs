//! HTTP client for the retailer's catalog API.

mod headers;

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use shelfscan_core::{AppConfig, CategoryId};

use crate::error::ScraperError;
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper};
use crate::source::{items_params, ItemSource};

pub use headers::{encode_town, GEO_TOWN_HEADER, GEO_TOWN_ID_HEADER};

/// HTTP client for the catalog endpoints.
///
/// Every request carries the configured `User-Agent` and geo headers and may
/// be routed through an HTTPS proxy. Each call is retried under the
/// configured [`RetryPolicy`]; any transport error, non-2xx status, or
/// non-JSON body counts as a failed attempt.
///
/// Holds no mutable state, so one instance is shared across all workers.
pub struct CatalogClient<S = TokioSleeper> {
    client: Client,
    items_url: String,
    retry: RetryPolicy,
    sleeper: S,
}

impl CatalogClient<TokioSleeper> {
    /// Creates a `CatalogClient` from the run configuration.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `items_url` does not parse.
    /// - [`ScraperError::InvalidHeader`] if the region is not a valid header value.
    /// - [`ScraperError::Http`] if the proxy URL is rejected or the underlying
    ///   `reqwest::Client` cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers::geo_headers(&config.town, &config.region)?);

        if let Some(proxy_url) = &config.proxy_url {
            builder = builder.proxy(reqwest::Proxy::https(proxy_url)?);
        }

        Self::with_http(
            builder.build()?,
            &config.items_url,
            RetryPolicy::from_settings(&config.retry),
            TokioSleeper,
        )
    }
}

impl<S: Sleeper> CatalogClient<S> {
    /// Assembles a client from an already-configured `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `items_url` does not parse.
    pub fn with_http(
        client: Client,
        items_url: &str,
        retry: RetryPolicy,
        sleeper: S,
    ) -> Result<Self, ScraperError> {
        parse_url(items_url)?;
        Ok(Self {
            client,
            items_url: items_url.to_owned(),
            retry,
            sleeper,
        })
    }

    /// Replaces the retry policy, keeping everything else.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Issues a GET with `params` appended to `url` and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` does not parse (not retried).
    /// - [`ScraperError::Fetch`] once every attempt allowed by the retry policy
    ///   has failed; its source is the last attempt's
    ///   [`ScraperError::Http`], [`ScraperError::UnexpectedStatus`] or
    ///   [`ScraperError::Deserialize`].
    pub async fn fetch_json(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, ScraperError> {
        let request_url = request_url(url, params)?;

        let outcome = self
            .retry
            .run(&self.sleeper, || {
                let request_url = request_url.clone();
                async move {
                    let response = self.client.get(request_url.clone()).send().await?;
                    let status = response.status();

                    if !status.is_success() {
                        return Err(ScraperError::UnexpectedStatus {
                            status: status.as_u16(),
                            url: request_url.to_string(),
                        });
                    }

                    let body = response.text().await?;
                    serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
                        ScraperError::Deserialize {
                            context: format!("response from {request_url}"),
                            source: e,
                        }
                    })
                }
            })
            .await;

        outcome.map_err(|exhausted| ScraperError::Fetch {
            url: url.to_owned(),
            params: format_params(params),
            attempts: exhausted.attempts,
            source: Box::new(exhausted.last),
        })
    }
}

impl<S: Sleeper + 'static> ItemSource for CatalogClient<S> {
    fn fetch_items(
        &self,
        category_id: &CategoryId,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = Result<serde_json::Value, ScraperError>> + Send {
        let params = items_params(category_id, offset, limit);
        async move { self.fetch_json(&self.items_url, &params).await }
    }
}

fn parse_url(url: &str) -> Result<Url, ScraperError> {
    Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })
}

/// Appends `params` to `url`, keeping any query the URL already carries.
fn request_url(url: &str, params: &[(&str, String)]) -> Result<Url, ScraperError> {
    let mut parsed = parse_url(url)?;
    if !params.is_empty() {
        let mut pairs = parsed.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    Ok(parsed)
}

/// Renders params as `k=v&k=v` for error messages and logs.
fn format_params(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
