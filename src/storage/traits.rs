//! Storage traits and error types
//!
//! This module defines the trait interface for recipe stores and
//! associated error types.

use crate::model::Recipe;
use crate::storage::{RunRecord, RunStatus};
use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Record rejected: {0}")]
    Rejected(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl StoreError {
    /// Returns true when the database itself is unusable, as opposed to a
    /// single record being refused
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                ErrorCode::CannotOpen
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::DatabaseCorrupt
                    | ErrorCode::NotADatabase
                    | ErrorCode::DiskFull
                    | ErrorCode::ReadOnly
            ),
            _ => false,
        }
    }
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Lazy sequence of stored recipes
pub type RecipeIter<'a> = Box<dyn Iterator<Item = StoreResult<Recipe>> + 'a>;

/// Trait for recipe store implementations
pub trait RecipeStore {
    // ===== Recipes =====

    /// Inserts a recipe, or overwrites the stored one with the same URL
    ///
    /// Putting an identical record twice leaves the store unchanged.
    fn put(&mut self, recipe: &Recipe) -> StoreResult<()>;

    /// Reads every stored recipe lazily
    ///
    /// Records come back in first-insertion order; an overwrite keeps the
    /// record's original position.
    fn all(&self) -> StoreResult<RecipeIter<'_>>;

    /// Gets one recipe by URL
    fn get(&self, url: &str) -> StoreResult<Option<Recipe>>;

    /// Counts stored recipes
    fn count(&self) -> StoreResult<u64>;

    // ===== Run Management =====

    /// Records the start of a scrape run and returns its ID
    fn create_run(&mut self, config_hash: &str) -> StoreResult<i64>;

    /// Records the end of a scrape run with its tallies
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        recipes_saved: u64,
        failures: u64,
    ) -> StoreResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StoreResult<RunRecord>;

    /// Gets the most recent run
    fn latest_run(&self) -> StoreResult<Option<RunRecord>>;
}
