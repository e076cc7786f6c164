//! Category tree resolution: fetch the tree, keep only the leaves.

use shelfscan_core::CategoryId;

use crate::client::CatalogClient;
use crate::error::ScraperError;
use crate::retry::Sleeper;
use crate::types::{CategoriesResponse, CategoryNode};

/// Flattens a category tree into its leaf ids.
///
/// A node without subcategories (absent, `null`, or empty) is a leaf. Leaves
/// come out in the same left-to-right order a recursive walk would give.
/// The walk keeps its own stack, so tree depth is bounded only by memory.
#[must_use]
pub fn leaf_category_ids(categories: &[CategoryNode]) -> Vec<CategoryId> {
    let mut leaves = Vec::new();
    let mut stack: Vec<&CategoryNode> = categories.iter().rev().collect();

    while let Some(node) = stack.pop() {
        match node.subcategories.as_deref() {
            Some(children) if !children.is_empty() => stack.extend(children.iter().rev()),
            _ => leaves.push(node.id.clone()),
        }
    }

    leaves
}

/// Fetches the category tree from `categories_url` and returns its leaf ids.
///
/// # Errors
///
/// - [`ScraperError::Fetch`] if the tree cannot be fetched after retries.
/// - [`ScraperError::MalformedPage`] if the body is not a category tree.
pub async fn resolve_leaf_categories<S: Sleeper>(
    client: &CatalogClient<S>,
    categories_url: &str,
) -> Result<Vec<CategoryId>, ScraperError> {
    let body = client.fetch_json(categories_url, &[]).await?;
    let tree: CategoriesResponse =
        serde_json::from_value(body).map_err(|e| ScraperError::MalformedPage {
            context: format!("category tree from {categories_url}"),
            source: e,
        })?;

    let leaves = leaf_category_ids(&tree.categories);
    tracing::info!(
        top_level = tree.categories.len(),
        leaves = leaves.len(),
        "resolved category tree"
    );
    Ok(leaves)
}
