//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the RecipeStore trait.

use crate::model::Recipe;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecipeIter, RecipeStore, StoreError, StoreResult};
use crate::storage::{RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::collections::VecDeque;
use std::path::Path;

const RECIPE_COLUMNS: &str = "id, url, name, category, category_url, subcategory, \
     subcategory_url, image_url, description, author, ingredients, steps, portion";

const RUN_COLUMNS: &str =
    "id, started_at, finished_at, config_hash, status, recipes_saved, failures";

/// Rows fetched per round trip by [`RecipeCursor`]
const PAGE_SIZE: usize = 256;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    ///
    /// A database that cannot be opened yields `StoreError::Unavailable`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        tracing::debug!("Opened recipe store at {}", path.display());
        Ok(Self { conn })
    }

    /// Opens an existing database without writing to it
    ///
    /// Nothing is created: a missing file yields `StoreError::Unavailable`,
    /// and any write through the returned store fails as read-only.
    pub fn open_read_only(path: &Path) -> StoreResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(|e| StoreError::Unavailable(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Opened recipe store read-only at {}", path.display());
        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Closes the connection, surfacing any error SQLite reports on close
    pub fn close(self) -> StoreResult<()> {
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }
}

impl RecipeStore for SqliteStore {
    // ===== Recipes =====

    fn put(&mut self, recipe: &Recipe) -> StoreResult<()> {
        if let Some(field) = recipe.missing_required_field() {
            return Err(StoreError::Rejected(format!(
                "recipe '{}' has an empty {}",
                recipe.url, field
            )));
        }

        let ingredients = serde_json::to_string(&recipe.ingredients)?;
        let steps = serde_json::to_string(&recipe.steps)?;
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO recipes (url, name, category, category_url, subcategory, subcategory_url,
                image_url, description, author, ingredients, steps, portion, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
             ON CONFLICT(url) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                category_url = excluded.category_url,
                subcategory = excluded.subcategory,
                subcategory_url = excluded.subcategory_url,
                image_url = excluded.image_url,
                description = excluded.description,
                author = excluded.author,
                ingredients = excluded.ingredients,
                steps = excluded.steps,
                portion = excluded.portion,
                updated_at = excluded.updated_at",
            params![
                recipe.url,
                recipe.name,
                recipe.category,
                recipe.category_url,
                recipe.subcategory,
                recipe.subcategory_url,
                recipe.image_url,
                recipe.description,
                recipe.author,
                ingredients,
                steps,
                recipe.portion,
                now
            ],
        )?;

        Ok(())
    }

    fn all(&self) -> StoreResult<RecipeIter<'_>> {
        Ok(Box::new(RecipeCursor::new(&self.conn)))
    }

    fn get(&self, url: &str) -> StoreResult<Option<Recipe>> {
        let sql = format!("SELECT {} FROM recipes WHERE url = ?1", RECIPE_COLUMNS);
        let recipe = self
            .conn
            .query_row(&sql, params![url], row_to_recipe)
            .optional()?;

        Ok(recipe.map(|(_, recipe)| recipe))
    }

    fn count(&self) -> StoreResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StoreResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        recipes_saved: u64,
        failures: u64,
    ) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, recipes_saved = ?3, failures = ?4
             WHERE id = ?5",
            params![
                status.to_db_string(),
                now,
                recipes_saved as i64,
                failures as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StoreError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StoreResult<RunRecord> {
        let sql = format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS);
        self.conn
            .query_row(&sql, params![run_id], row_to_run)
            .optional()?
            .ok_or(StoreError::RunNotFound(run_id))
    }

    fn latest_run(&self) -> StoreResult<Option<RunRecord>> {
        let sql = format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS);
        let run = self.conn.query_row(&sql, [], row_to_run).optional()?;
        Ok(run)
    }
}

/// Pages through the recipes table by row ID
///
/// Only one page of rows is held in memory at a time. A read error ends the
/// sequence after it is yielded.
pub struct RecipeCursor<'a> {
    conn: &'a Connection,
    after_id: i64,
    buffer: VecDeque<Recipe>,
    exhausted: bool,
}

impl<'a> RecipeCursor<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            after_id: 0,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    fn fill(&mut self) -> StoreResult<()> {
        let sql = format!(
            "SELECT {} FROM recipes WHERE id > ?1 ORDER BY id LIMIT ?2",
            RECIPE_COLUMNS
        );
        let conn = self.conn;
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(params![self.after_id, PAGE_SIZE as i64], row_to_recipe)?
            .collect::<Result<Vec<_>, _>>()?;

        if rows.len() < PAGE_SIZE {
            self.exhausted = true;
        }
        if let Some((id, _)) = rows.last() {
            self.after_id = *id;
        }
        self.buffer.extend(rows.into_iter().map(|(_, recipe)| recipe));
        Ok(())
    }
}

impl Iterator for RecipeCursor<'_> {
    type Item = StoreResult<Recipe>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.fill() {
                self.exhausted = true;
                return Some(Err(e));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}

fn row_to_recipe(row: &Row<'_>) -> rusqlite::Result<(i64, Recipe)> {
    let recipe = Recipe {
        url: row.get(1)?,
        name: row.get(2)?,
        category: row.get(3)?,
        category_url: row.get(4)?,
        subcategory: row.get(5)?,
        subcategory_url: row.get(6)?,
        image_url: row.get(7)?,
        description: row.get(8)?,
        author: row.get(9)?,
        ingredients: json_column(row, 10)?,
        steps: json_column(row, 11)?,
        portion: row.get(12)?,
    };
    Ok((row.get(0)?, recipe))
}

fn json_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_run(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Failed),
        recipes_saved: row.get::<_, i64>(5)? as u64,
        failures: row.get::<_, i64>(6)? as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(url: &str, ingredients: usize, steps: usize) -> Recipe {
        Recipe {
            name: format!("Recipe at {}", url),
            url: url.to_string(),
            category: Some("Desserts".to_string()),
            description: Some("Original".to_string()),
            ingredients: (0..ingredients).map(|i| format!("ingredient {}", i)).collect(),
            steps: (0..steps).map(|i| format!("step {}", i)).collect(),
            ..Default::default()
        }
    }

    fn collect_all(store: &SqliteStore) -> Vec<Recipe> {
        store
            .all()
            .unwrap()
            .collect::<StoreResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_create_in_memory() {
        let store = SqliteStore::open_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_put_and_get() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let r = recipe("https://example.com/r/1", 4, 2);

        store.put(&r).unwrap();

        assert_eq!(store.get(&r.url).unwrap(), Some(r));
        assert_eq!(store.get("https://example.com/r/missing").unwrap(), None);
    }

    #[test]
    fn test_put_is_idempotent() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let r = recipe("https://example.com/r/1", 4, 2);

        store.put(&r).unwrap();
        store.put(&r).unwrap();

        let all = collect_all(&store);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], r);
    }

    #[test]
    fn test_put_overwrites_same_url() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let original = recipe("https://example.com/r/1", 4, 2);
        store.put(&original).unwrap();

        let mut updated = original.clone();
        updated.description = Some("Updated".to_string());
        store.put(&updated).unwrap();

        let all = collect_all(&store);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].description.as_deref(), Some("Updated"));
    }

    #[test]
    fn test_put_rejects_empty_name() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let mut r = recipe("https://example.com/r/1", 1, 1);
        r.name = String::new();

        let err = store.put(&r).unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        assert!(!err.is_fatal());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_all_pages_through_many_rows() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let total = PAGE_SIZE * 2 + 7;
        for i in 0..total {
            store
                .put(&recipe(&format!("https://example.com/r/{}", i), 1, 1))
                .unwrap();
        }

        let all = collect_all(&store);
        assert_eq!(all.len(), total);
        assert_eq!(all[0].url, "https://example.com/r/0");
        assert_eq!(all[total - 1].url, format!("https://example.com/r/{}", total - 1));
        assert_eq!(store.count().unwrap(), total as u64);
    }

    #[test]
    fn test_all_on_empty_store() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(collect_all(&store).is_empty());
    }

    #[test]
    fn test_run_lifecycle() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert!(store.latest_run().unwrap().is_none());

        let run_id = store.create_run("abc123").unwrap();
        assert!(run_id > 0);
        assert_eq!(store.get_run(run_id).unwrap().status, RunStatus::Running);

        store
            .finish_run(run_id, RunStatus::Completed, 12, 3)
            .unwrap();

        let run = store.latest_run().unwrap().unwrap();
        assert_eq!(run.id, run_id);
        assert_eq!(run.status, RunStatus::Completed);
        assert_eq!(run.config_hash, "abc123");
        assert_eq!(run.recipes_saved, 12);
        assert_eq!(run.failures, 3);
        assert!(run.finished_at.is_some());
    }

    #[test]
    fn test_finish_unknown_run() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let result = store.finish_run(99, RunStatus::Completed, 0, 0);
        assert!(matches!(result, Err(StoreError::RunNotFound(99))));
    }

    #[test]
    fn test_open_unreachable_path_is_fatal() {
        let result = SqliteStore::open(Path::new("/nonexistent/dir/recipes.db"));
        let err = result.err().unwrap();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_open_file_and_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.db");

        let mut store = SqliteStore::open(&path).unwrap();
        store.put(&recipe("https://example.com/r/1", 2, 2)).unwrap();
        store.close().unwrap();

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }

    #[test]
    fn test_open_read_only_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.db");

        let err = SqliteStore::open_read_only(&path).err().unwrap();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(err.is_fatal());
        assert!(!path.exists());
    }

    #[test]
    fn test_open_read_only_reads_but_refuses_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.db");

        let mut store = SqliteStore::open(&path).unwrap();
        store.put(&recipe("https://example.com/r/1", 2, 2)).unwrap();
        store.close().unwrap();

        let mut reader = SqliteStore::open_read_only(&path).unwrap();
        assert_eq!(reader.count().unwrap(), 1);
        assert_eq!(collect_all(&reader).len(), 1);

        let err = reader
            .put(&recipe("https://example.com/r/2", 1, 1))
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(reader.count().unwrap(), 1);
    }
}
