//! Robots.txt handling module
//!
//! The scraper targets a single site, so robots.txt is fetched once per run
//! and consulted before every recipe page request.

mod parser;

pub use parser::ParsedRobots;

use crate::crawler::Fetcher;
use url::Url;

/// Fetches and parses the robots.txt of the site rooted at `base_url`
///
/// Any failure to retrieve the file (missing, server error, network error)
/// is treated as "allow all".
pub async fn fetch_robots(fetcher: &mut Fetcher, base_url: &Url) -> ParsedRobots {
    let robots_url = match base_url.join("/robots.txt") {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot build robots.txt URL from {}: {}", base_url, e);
            return ParsedRobots::allow_all();
        }
    };

    match fetcher.fetch(robots_url.as_str()).await {
        Ok(content) => {
            tracing::debug!("Loaded robots.txt from {}", robots_url);
            ParsedRobots::from_content(&content)
        }
        Err(e) => {
            tracing::info!("No usable robots.txt ({}), allowing all URLs", e);
            ParsedRobots::allow_all()
        }
    }
}

/// Checks if a URL is allowed by robots.txt
pub fn is_allowed(robots: &ParsedRobots, url: &str, user_agent: &str) -> bool {
    robots.is_allowed(url, user_agent)
}
