//! Scrape coordinator - main scrape orchestration logic
//!
//! This module contains the scrape loop that ties everything together:
//! - Recording the run in storage
//! - Loading robots.txt once for the site
//! - Discovering recipe URLs
//! - Fetching, extracting and storing each recipe
//! - Tallying successes and failures

use crate::config::Config;
use crate::crawler::discovery::{discover, RecipeTarget, RobotsGate};
use crate::crawler::Fetcher;
use crate::extract::{RecipeSource, SiteExtractors};
use crate::robots::{fetch_robots, is_allowed, ParsedRobots};
use crate::storage::{open_store, RecipeStore, RunStatus, SqliteStore};
use crate::url::normalize_url;
use crate::{FetchError, HarvestError};
use std::path::Path;

/// Tallies for one scrape run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    pub run_id: i64,
    pub discovered: u64,
    pub saved: u64,
    pub fetch_failures: u64,
    pub parse_failures: u64,
    pub store_failures: u64,
    pub skipped_robots: u64,
}

impl ScrapeReport {
    /// Every discovered URL that did not end up stored
    pub fn failures(&self) -> u64 {
        self.fetch_failures + self.parse_failures + self.store_failures + self.skipped_robots
    }
}

/// What happened to a single recipe URL
enum Outcome {
    Saved,
    FetchFailed,
    ParseFailed,
    StoreFailed,
    Disallowed,
}

/// Main scrape coordinator structure
pub struct Scraper<S: RecipeStore> {
    config: Config,
    store: S,
    fetcher: Fetcher,
    extractors: SiteExtractors,
    robots: ParsedRobots,
    config_hash: String,
}

impl<S: RecipeStore> Scraper<S> {
    /// Creates a new scraper writing into `store`
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `config_hash` - Hash of the configuration file, recorded with the run
    /// * `store` - Where extracted recipes are persisted
    pub fn new(config: Config, config_hash: &str, store: S) -> Result<Self, HarvestError> {
        let fetcher = Fetcher::from_config(&config.user_agent, &config.fetcher)?;
        let extractors = SiteExtractors::new(&config.selectors)?;

        Ok(Self {
            config,
            store,
            fetcher,
            extractors,
            robots: ParsedRobots::allow_all(),
            config_hash: config_hash.to_string(),
        })
    }

    /// Runs discovery only, without fetching recipe pages or writing records
    ///
    /// Loads robots.txt first when it is respected.
    pub async fn discover(&mut self) -> Result<Vec<RecipeTarget>, HarvestError> {
        if self.config.fetcher.respect_robots_txt {
            let base_url = normalize_url(&self.config.site.base_url)?;
            self.robots = fetch_robots(&mut self.fetcher, &base_url).await;
        }

        let gate = RobotsGate {
            robots: &self.robots,
            agent: &self.config.user_agent.crawler_name,
        };
        discover(&mut self.fetcher, &self.extractors, &self.config.site, gate).await
    }

    /// Runs the full scrape
    ///
    /// 1. Records a new run
    /// 2. Loads robots.txt (when enabled)
    /// 3. Discovers recipe URLs
    /// 4. Fetches, extracts and stores each one
    /// 5. Marks the run completed, or failed when a fatal error aborted it
    ///
    /// Fetch, parse and rejected-record failures are logged and skipped.
    /// Discovery failures and an unusable store abort the run.
    pub async fn run(&mut self) -> Result<ScrapeReport, HarvestError> {
        let run_id = self.store.create_run(&self.config_hash)?;
        tracing::info!("Starting scrape run {}", run_id);

        let mut report = ScrapeReport {
            run_id,
            ..ScrapeReport::default()
        };

        match self.scrape(&mut report).await {
            Ok(()) => {
                self.store.finish_run(
                    run_id,
                    RunStatus::Completed,
                    report.saved,
                    report.failures(),
                )?;
                tracing::info!(
                    "Scrape run {} completed: {} saved, {} failed out of {} discovered",
                    run_id,
                    report.saved,
                    report.failures(),
                    report.discovered
                );
                Ok(report)
            }
            Err(e) => {
                if let Err(finish_err) =
                    self.store
                        .finish_run(run_id, RunStatus::Failed, report.saved, report.failures())
                {
                    tracing::error!("Could not mark run {} as failed: {}", run_id, finish_err);
                }
                Err(e)
            }
        }
    }

    /// Consumes the scraper and hands back its store
    pub fn into_store(self) -> S {
        self.store
    }

    async fn scrape(&mut self, report: &mut ScrapeReport) -> Result<(), HarvestError> {
        let targets = self.discover().await?;
        report.discovered = targets.len() as u64;
        tracing::info!("Discovered {} recipe URLs", targets.len());

        for (index, target) in targets.iter().enumerate() {
            match self.process_target(target).await? {
                Outcome::Saved => report.saved += 1,
                Outcome::FetchFailed => report.fetch_failures += 1,
                Outcome::ParseFailed => report.parse_failures += 1,
                Outcome::StoreFailed => report.store_failures += 1,
                Outcome::Disallowed => report.skipped_robots += 1,
            }

            let processed = index + 1;
            if processed % 10 == 0 {
                tracing::info!(
                    "Progress: {}/{} recipes processed, {} saved",
                    processed,
                    targets.len(),
                    report.saved
                );
            }
        }

        Ok(())
    }

    /// Processes a single recipe URL
    ///
    /// Only a fatal store error is returned as `Err`.
    async fn process_target(&mut self, target: &RecipeTarget) -> Result<Outcome, HarvestError> {
        let url = target.url.as_str();

        if !is_allowed(&self.robots, url, &self.config.user_agent.crawler_name) {
            let skipped = FetchError::Disallowed {
                url: url.to_string(),
            };
            tracing::info!("Skipping: {}", skipped);
            return Ok(Outcome::Disallowed);
        }

        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url = e.url(), retryable = e.is_retryable(), "{}", e);
                return Ok(Outcome::FetchFailed);
            }
        };

        let source = RecipeSource {
            page_url: Some(target.url.clone()),
            category: Some(target.category.clone()),
            subcategory: Some(target.subcategory.clone()),
        };
        let recipe = match self.extractors.recipe.extract(&html, &source) {
            Ok(recipe) => recipe,
            Err(e) => {
                tracing::warn!("Failed to extract recipe from {}: {}", url, e);
                return Ok(Outcome::ParseFailed);
            }
        };

        match self.store.put(&recipe) {
            Ok(()) => {
                tracing::debug!("Stored '{}' from {}", recipe.name, recipe.url);
                Ok(Outcome::Saved)
            }
            Err(e) if e.is_fatal() => {
                tracing::error!("Store became unusable while saving {}: {}", url, e);
                Err(e.into())
            }
            Err(e) => {
                tracing::warn!("Failed to store recipe from {}: {}", url, e);
                Ok(Outcome::StoreFailed)
            }
        }
    }
}

/// Runs a complete scrape against the configured database
///
/// # Example
///
/// ```no_run
/// use recipe_harvest::config::load_config_with_hash;
/// use recipe_harvest::crawler::run_scrape;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("recipe-harvest.toml"))?;
/// let report = run_scrape(config, &hash).await?;
/// println!("{} recipes saved", report.saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(config: Config, config_hash: &str) -> Result<ScrapeReport, HarvestError> {
    let store: SqliteStore = open_store(Path::new(&config.database.path))?;
    let mut scraper = Scraper::new(config, config_hash, store)?;
    let report = scraper.run().await?;
    scraper.into_store().close()?;
    Ok(report)
}
