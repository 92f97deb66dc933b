//! Configuration module for Recipe-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use recipe_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("recipe-harvest.toml")).unwrap();
//! println!("Scraping category: {}", config.site.main_category);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CategorySelectors, Config, DatabaseConfig, FetcherConfig, ListingSelectors, Locator,
    OutputConfig, RecipeSelectors, SelectorConfig, SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
