//! Structural extraction of recipe data from HTML
//!
//! Every site-specific detail lives in the `[selectors]` table of the
//! configuration. This module compiles those locators and applies them to:
//! - category navigation pages (category name and link)
//! - listing pages (recipe detail links)
//! - recipe detail pages (one [`Recipe`](crate::Recipe) record)

mod listing;
mod locator;
mod recipe;
mod text;

pub use listing::{CategoryExtractor, ListingExtractor};
pub use locator::{compile_selector, CompiledLocator};
pub use recipe::{RecipeExtractor, RecipeSource};
pub use text::{clean_text, normalize_portion};

use crate::config::SelectorConfig;
use crate::ConfigError;

/// All extractors for one site, compiled from its selector table
#[derive(Debug, Clone)]
pub struct SiteExtractors {
    pub categories: CategoryExtractor,
    pub listing: ListingExtractor,
    pub recipe: RecipeExtractor,
}

impl SiteExtractors {
    pub fn new(selectors: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            categories: CategoryExtractor::new(&selectors.categories)?,
            listing: ListingExtractor::new(&selectors.listing)?,
            recipe: RecipeExtractor::new(&selectors.recipe)?,
        })
    }
}
