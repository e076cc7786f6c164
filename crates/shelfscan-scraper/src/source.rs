use std::future::Future;

use shelfscan_core::CategoryId;

use crate::error::ScraperError;

/// Fixed sort order for every items request; offsets are only stable within one order.
pub const SORT_TYPE: &str = "popular";

/// Anything that can return one raw page of a category's item listing.
///
/// [`crate::CatalogClient`] is the production implementation; the planner and
/// scheduler only depend on this trait so they can be exercised without HTTP.
pub trait ItemSource: Send + Sync + 'static {
    /// Fetches items `[offset, offset + limit)` of `category_id` as raw JSON.
    fn fetch_items(
        &self,
        category_id: &CategoryId,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = Result<serde_json::Value, ScraperError>> + Send;
}

/// Query parameters for the items endpoint, in the order the API documents them.
#[must_use]
pub fn items_params(
    category_id: &CategoryId,
    offset: u64,
    limit: u64,
) -> Vec<(&'static str, String)> {
    vec![
        ("limit", limit.to_string()),
        ("offset", offset.to_string()),
        ("sort_type", SORT_TYPE.to_owned()),
        ("category_id", category_id.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_params_project_page_into_query() {
        let params = items_params(&CategoryId::Numeric(12), 400, 50);
        assert_eq!(
            params,
            vec![
                ("limit", "50".to_owned()),
                ("offset", "400".to_owned()),
                ("sort_type", "popular".to_owned()),
                ("category_id", "12".to_owned()),
            ]
        );
    }
}
