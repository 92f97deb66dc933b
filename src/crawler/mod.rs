//! Crawler module for recipe discovery and scraping
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with pacing and retry logic
//! - Walking category and listing pages to find recipe URLs
//! - Overall scrape coordination

mod coordinator;
mod discovery;
mod fetcher;

pub use coordinator::{run_scrape, ScrapeReport, Scraper};
pub use discovery::{discover, RecipeTarget, RobotsGate};
pub use fetcher::{build_http_client, user_agent_string, Fetcher};
