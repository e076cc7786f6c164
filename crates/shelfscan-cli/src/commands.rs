//! Command handlers for the CLI.
//!
//! Called from `main` once config and logging are set up. Category and page
//! failures are logged and counted by the scraper; only configuration, the
//! category tree, and the output file can fail a command.

use std::path::PathBuf;
use std::sync::Arc;

use shelfscan_core::{AppConfig, CategoryId};
use shelfscan_scraper::{
    limit_categories, plan_all, resolve_leaf_categories, scrape, CatalogClient, RowProjector,
    ScrapeOptions,
};

use crate::output::CsvSink;

/// Picks the single category to scrape, if any.
///
/// `--category` wins over `SHELFSCAN_CATEGORY_ID`; a blank flag counts as unset.
pub(crate) fn category_override(
    flag: Option<&str>,
    config: &AppConfig,
) -> Option<CategoryId> {
    flag.filter(|id| !id.trim().is_empty())
        .or(config.category_id.as_deref())
        .map(CategoryId::from)
}

/// Resolves the categories a run covers: the override, or every leaf of the
/// tree capped by `SHELFSCAN_CATEGORY_LIMIT`.
async fn resolve_categories(
    client: &CatalogClient,
    config: &AppConfig,
    flag: Option<&str>,
) -> anyhow::Result<Vec<CategoryId>> {
    if let Some(category_id) = category_override(flag, config) {
        tracing::info!(category_id = %category_id, "scraping a single category");
        return Ok(vec![category_id]);
    }

    let leaves = resolve_leaf_categories(client, &config.categories_url)
        .await
        .map_err(|e| anyhow::anyhow!("failed to resolve category tree: {e}"))?;
    Ok(limit_categories(leaves, config.category_limit))
}

fn build_client(config: &AppConfig) -> anyhow::Result<CatalogClient> {
    CatalogClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build catalog client: {e}"))
}

/// Scrapes the catalog into a CSV file.
///
/// When `dry_run` is `true` the categories are probed and the page plan is
/// printed; no page is fetched and the output file is left untouched.
///
/// # Errors
///
/// Returns an error if the client cannot be built, the category tree cannot
/// be resolved, or the output file cannot be written.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    category: Option<&str>,
    output: Option<PathBuf>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let categories = resolve_categories(&client, config, category).await?;
    let options = ScrapeOptions::from_config(config);

    if dry_run {
        let plan = plan_all(
            &client,
            &categories,
            options.page_size,
            options.concurrency,
        )
        .await;
        for page in &plan.pages {
            println!("{page}");
        }
        println!(
            "dry-run: would fetch {} pages across {} categories ({} failed to probe)",
            plan.pages.len(),
            plan.planned_categories,
            plan.failed.len()
        );
        return Ok(());
    }

    let output_path = output.unwrap_or_else(|| config.output_path.clone());
    let mut sink = CsvSink::create(&output_path)?;

    let summary = scrape(
        Arc::new(client),
        &categories,
        options,
        RowProjector::new(config.town.clone()),
        &mut sink,
    )
    .await?;

    println!(
        "scrape complete: {} rows written to {} ({} pages fetched, {} pages failed, {} categories failed)",
        summary.rows_written,
        output_path.display(),
        summary.pages_fetched,
        summary.pages_failed,
        summary.categories_failed
    );
    Ok(())
}

/// Prints the leaf category ids, one per line.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the tree cannot be
/// resolved.
pub(crate) async fn run_categories(config: &AppConfig) -> anyhow::Result<()> {
    let client = build_client(config)?;
    let leaves = resolve_leaf_categories(&client, &config.categories_url)
        .await
        .map_err(|e| anyhow::anyhow!("failed to resolve category tree: {e}"))?;

    for category_id in &leaves {
        println!("{category_id}");
    }
    Ok(())
}
