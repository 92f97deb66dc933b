//! Output module for recipe statistics and reports
//!
//! This module handles:
//! - Computing aggregate statistics over stored recipes
//! - Printing them to stdout
//! - Exporting them, with the latest run's metadata, as markdown

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use stats::{compute_statistics, print_statistics, PortionLeader, RecipeStatistics};

use crate::storage::{RecipeStore, StoreError};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while producing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Computes statistics and writes the markdown report for `store`
///
/// Returns the statistics so callers can also print them.
pub fn export_summary(store: &dyn RecipeStore, output_path: &Path) -> OutputResult<RecipeStatistics> {
    let stats = compute_statistics(store)?;
    let run = store.latest_run()?;
    generate_markdown_report(&stats, run.as_ref(), output_path)?;
    tracing::info!("Wrote statistics summary to {}", output_path.display());
    Ok(stats)
}
