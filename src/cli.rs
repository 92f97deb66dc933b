//! Command-line plumbing shared by the `scraping` and `statistic` binaries

use clap::Args;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "recipe-harvest.toml";

/// Arguments accepted by every binary
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Builds the log filter for a verbosity level
pub fn log_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("recipe_harvest=info,warn"),
            1 => EnvFilter::new("recipe_harvest=debug,info"),
            2 => EnvFilter::new("recipe_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
pub fn setup_logging(args: &CommonArgs) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(args.verbose, args.quiet))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
