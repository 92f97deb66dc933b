//! Recipe URL discovery
//!
//! Walks the site's category navigation down to the recipe detail links:
//!
//! 1. Fetch the categories page and pick the configured main category
//! 2. Fetch the main category page and list its subcategories
//! 3. Fetch every subcategory listing and collect recipe links
//!
//! A main category without subcategories is treated as a listing itself.
//! Every page is checked against robots.txt before it is requested.

use crate::config::SiteConfig;
use crate::crawler::Fetcher;
use crate::extract::SiteExtractors;
use crate::model::CategoryRef;
use crate::robots::{is_allowed, ParsedRobots};
use crate::url::normalize_url;
use crate::{FetchError, HarvestError};
use std::collections::HashSet;
use url::Url;

/// Robots.txt rules and the agent name they are evaluated for
#[derive(Debug, Clone, Copy)]
pub struct RobotsGate<'a> {
    pub robots: &'a ParsedRobots,
    pub agent: &'a str,
}

impl RobotsGate<'_> {
    /// Fetches `url` unless robots.txt disallows it
    async fn fetch(&self, fetcher: &mut Fetcher, url: &Url) -> Result<String, FetchError> {
        if !is_allowed(self.robots, url.as_str(), self.agent) {
            return Err(FetchError::Disallowed {
                url: url.to_string(),
            });
        }
        fetcher.fetch(url.as_str()).await
    }
}

/// A recipe page to scrape, with the category context it was found under
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeTarget {
    pub url: Url,
    pub category: CategoryRef,
    pub subcategory: CategoryRef,
}

/// Finds every recipe URL under the configured main category
///
/// URLs are returned in discovery order. A recipe linked from several
/// listings keeps the context of the first one.
///
/// # Errors
///
/// Fails when the categories page or the main category page cannot be
/// fetched or parsed, or when the main category is not listed. A listing
/// page that fails is logged and skipped. Pages disallowed by robots.txt
/// count as fetch failures.
pub async fn discover(
    fetcher: &mut Fetcher,
    extractors: &SiteExtractors,
    site: &SiteConfig,
    gate: RobotsGate<'_>,
) -> Result<Vec<RecipeTarget>, HarvestError> {
    let base_url = normalize_url(&site.base_url)?;
    let categories_url = base_url.join(&site.categories_path)?;

    tracing::info!("Fetching categories from {}", categories_url);
    let html = gate.fetch(fetcher, &categories_url).await?;
    let categories = extractors.categories.extract(&html, &categories_url)?;
    tracing::debug!("Found {} categories", categories.len());

    let main = categories
        .into_iter()
        .find(|category| category.name == site.main_category)
        .ok_or_else(|| HarvestError::CategoryNotFound(site.main_category.clone()))?;
    let main_url = Url::parse(&main.url)?;

    tracing::info!("Fetching main category '{}' from {}", main.name, main_url);
    let html = gate.fetch(fetcher, &main_url).await?;

    // Categories and subcategories share the same navigation markup
    let subcategories = match extractors.categories.extract(&html, &main_url) {
        Ok(subcategories) if !subcategories.is_empty() => subcategories,
        _ => {
            tracing::info!(
                "No subcategories under '{}', treating it as a listing",
                main.name
            );
            return Ok(collect_targets(
                extractors.listing.extract(&html, &main_url)?,
                &main,
                &main,
                &mut HashSet::new(),
            ));
        }
    };
    tracing::info!("Found {} subcategories", subcategories.len());

    let mut seen = HashSet::new();
    let mut targets = Vec::new();
    for subcategory in &subcategories {
        let links = match fetch_listing(fetcher, extractors, gate, subcategory).await {
            Ok(links) => links,
            Err(HarvestError::Fetch(e)) => {
                tracing::warn!(
                    url = e.url(),
                    "Skipping subcategory '{}': {}",
                    subcategory.name,
                    e
                );
                continue;
            }
            Err(e) => {
                tracing::warn!("Skipping subcategory '{}': {}", subcategory.name, e);
                continue;
            }
        };
        tracing::debug!(
            "Subcategory '{}' lists {} recipes",
            subcategory.name,
            links.len()
        );
        targets.extend(collect_targets(links, &main, subcategory, &mut seen));
    }

    Ok(targets)
}

async fn fetch_listing(
    fetcher: &mut Fetcher,
    extractors: &SiteExtractors,
    gate: RobotsGate<'_>,
    subcategory: &CategoryRef,
) -> Result<Vec<Url>, HarvestError> {
    let url = Url::parse(&subcategory.url)?;
    let html = gate.fetch(fetcher, &url).await?;
    Ok(extractors.listing.extract(&html, &url)?)
}

fn collect_targets(
    links: Vec<Url>,
    category: &CategoryRef,
    subcategory: &CategoryRef,
    seen: &mut HashSet<Url>,
) -> Vec<RecipeTarget> {
    links
        .into_iter()
        .filter(|url| seen.insert(url.clone()))
        .map(|url| RecipeTarget {
            url,
            category: category.clone(),
            subcategory: subcategory.clone(),
        })
        .collect()
}
