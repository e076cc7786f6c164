mod commands;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "shelfscan")]
#[command(about = "Export a retailer's product catalog to CSV")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape every leaf category into the CSV output (the default command)
    Scrape {
        /// Scrape only this category instead of resolving the tree
        #[arg(long)]
        category: Option<String>,
        /// Write rows here instead of `SHELFSCAN_OUTPUT_PATH`
        #[arg(long)]
        output: Option<PathBuf>,
        /// Resolve and plan categories, print the page plan, fetch no pages
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the leaf category ids of the catalog tree
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = shelfscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Scrape {
            category,
            output,
            dry_run,
        }) => commands::run_scrape(&config, category.as_deref(), output, dry_run).await,
        Some(Commands::Categories) => commands::run_categories(&config).await,
        None => commands::run_scrape(&config, None, None, false).await,
    }
}

#[cfg(test)]
mod tests;
