//! `scraping`: discovers recipe pages, extracts them and stores the records

use anyhow::Context;
use clap::Parser;
use recipe_harvest::cli::{setup_logging, CommonArgs};
use recipe_harvest::config::{load_config_with_hash, Config};
use recipe_harvest::crawler::{run_scrape, Scraper};
use recipe_harvest::storage::SqliteStore;

/// Scrape recipes from the configured site into the recipe database
///
/// Walks the categories page down to the main category's recipe listings,
/// extracts every recipe page and upserts it by URL. Re-running refreshes
/// existing records instead of duplicating them.
#[derive(Parser, Debug)]
#[command(name = "scraping")]
#[command(version)]
#[command(about = "Scrape recipes into the recipe database", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Discover recipe URLs and print them without fetching recipes or writing to the database
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli.common);

    tracing::info!("Loading configuration from: {}", cli.common.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.common.config)
        .with_context(|| format!("failed to load {}", cli.common.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(config, &config_hash).await
    } else {
        handle_scrape(config, &config_hash).await
    }
}

/// Handles the --dry-run mode: runs discovery and lists what would be scraped
async fn handle_dry_run(config: Config, config_hash: &str) -> anyhow::Result<()> {
    println!("=== Recipe Harvest Dry Run ===\n");
    println!("Site: {}", config.site.base_url);
    println!("Main category: {}", config.site.main_category);
    println!("Database: {}\n", config.database.path);

    // Discovery never touches the store, so an in-memory one is enough
    let store = SqliteStore::open_in_memory()?;
    let mut scraper = Scraper::new(config, config_hash, store)?;
    let targets = scraper.discover().await.context("discovery failed")?;

    for target in &targets {
        println!("  [{}] {}", target.subcategory.name, target.url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape {} recipe URLs", targets.len());

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping '{}' from {} into {}",
        config.site.main_category,
        config.site.base_url,
        config.database.path
    );

    match run_scrape(config, config_hash).await {
        Ok(report) => {
            println!(
                "✓ Saved {} of {} discovered recipes ({} fetch, {} parse, {} store failures, {} disallowed)",
                report.saved,
                report.discovered,
                report.fetch_failures,
                report.parse_failures,
                report.store_failures,
                report.skipped_robots
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
