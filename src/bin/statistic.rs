//! `statistic`: prints aggregate statistics over the recipe database

use anyhow::Context;
use clap::Parser;
use recipe_harvest::cli::{setup_logging, CommonArgs};
use recipe_harvest::config::load_config;
use recipe_harvest::output::{compute_statistics, export_summary, print_statistics};
use recipe_harvest::storage::open_store_read_only;
use std::path::Path;

/// Compute statistics over the scraped recipes
#[derive(Parser, Debug)]
#[command(name = "statistic")]
#[command(version)]
#[command(about = "Compute statistics over scraped recipes", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Also write a markdown summary to the configured summary path
    #[arg(long)]
    export_summary: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli.common);

    let config = load_config(&cli.common.config)
        .with_context(|| format!("failed to load {}", cli.common.config.display()))?;

    let db_path = Path::new(&config.database.path);
    tracing::info!("Reading recipes from {}", db_path.display());
    let store = open_store_read_only(db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;

    let stats = if cli.export_summary {
        let summary_path = Path::new(&config.output.summary_path);
        let stats = export_summary(&store, summary_path)?;
        println!("✓ Summary exported to: {}\n", summary_path.display());
        stats
    } else {
        compute_statistics(&store)?
    };

    print_statistics(&stats);

    store.close()?;
    Ok(())
}
