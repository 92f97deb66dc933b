//! Storage module for persisting recipes
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Upserting recipe documents keyed by URL
//! - Lazy bulk reads for statistics
//! - Scrape run bookkeeping

mod schema;
mod sqlite;
mod traits;

pub use sqlite::{RecipeCursor, SqliteStore};
pub use traits::{RecipeIter, RecipeStore, StoreError, StoreResult};

use std::path::Path;

/// Opens (creating if needed) the recipe store at `path`
pub fn open_store(path: &Path) -> StoreResult<SqliteStore> {
    SqliteStore::open(path)
}

/// Opens the existing recipe store at `path` for reading only
pub fn open_store_read_only(path: &Path) -> StoreResult<SqliteStore> {
    SqliteStore::open_read_only(path)
}

/// Represents a scrape run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub recipes_saved: u64,
    pub failures: u64,
}

/// Status of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
