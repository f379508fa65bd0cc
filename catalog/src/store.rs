// Copyright (C) 2024 The Ghostpir Developers. All rights reserved.
//
// SPDX-License-Identifier: Apache-2.0

//! Durable catalog storage backed by SQLite.
//!
//! Two relations live here: `modules` and `quizzes`. `quizzes.module_id`
//! cascades on delete, so removing a module removes its quiz questions in
//! the same transaction the row delete happens in — no separate cleanup
//! pass is needed.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{CatalogError, Result};
use crate::models::{Module, ModuleFilter, QuizQuestion};

/// A handle to the catalog database. Cheap to clone (an `Arc` internally via
/// the caller), but the connection itself is serialized behind a mutex:
/// every operation here is a short-lived transaction, so contention is not
/// a concern in practice.
pub struct CatalogStore {
    conn: Mutex<Connection>,
}

impl CatalogStore {
    /// Open (creating if necessary) the catalog database at `path` and run
    /// schema initialization. Idempotent — safe to call on every process
    /// start.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = CatalogStore {
            conn: Mutex::new(conn),
        };
        store.init()?;
        Ok(store)
    }

    /// Open an in-memory database, for tests and fixtures.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = CatalogStore {
            conn: Mutex::new(conn),
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA foreign_keys=ON;",
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS modules (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                topic TEXT NOT NULL,
                tier INTEGER NOT NULL,
                chunk_count INTEGER NOT NULL,
                compressed_size INTEGER NOT NULL,
                filename TEXT NOT NULL
            )",
            [],
        )?;

        // Migration: older databases created before `filename` existed.
        // `ALTER TABLE ... ADD COLUMN` errors if the column is already
        // there, so check first.
        let has_filename: bool = conn
            .prepare("SELECT 1 FROM pragma_table_info('modules') WHERE name = 'filename'")?
            .exists([])?;
        if !has_filename {
            conn.execute("ALTER TABLE modules ADD COLUMN filename TEXT NOT NULL DEFAULT ''", [])?;
        }

        conn.execute(
            "CREATE TABLE IF NOT EXISTS quizzes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                module_id INTEGER NOT NULL,
                question TEXT NOT NULL,
                options TEXT NOT NULL,
                correct INTEGER NOT NULL,
                FOREIGN KEY (module_id) REFERENCES modules(id) ON DELETE CASCADE
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_quizzes_module_id ON quizzes(module_id)",
            [],
        )?;

        Ok(())
    }

    /// Insert a module row and return the store-assigned id. The id must
    /// come from here, never be precomputed by the caller — two concurrent
    /// uploads racing on `MAX(id)+1` would otherwise collide.
    pub fn add_module(
        &self,
        title: &str,
        topic: &str,
        tier: i64,
        chunk_count: i64,
        compressed_size: i64,
        filename: &str,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO modules (title, topic, tier, chunk_count, compressed_size, filename)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![title, topic, tier, chunk_count, compressed_size, filename],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List modules ordered by ascending id, with optional conjunctive
    /// `topic`/`tier` filters.
    pub fn list_modules(&self, filter: &ModuleFilter) -> Result<Vec<Module>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = String::from(
            "SELECT id, title, topic, tier, chunk_count, compressed_size, filename
             FROM modules WHERE 1=1",
        );
        if filter.topic.is_some() {
            sql.push_str(" AND topic = ?1");
        }
        if filter.tier.is_some() {
            sql.push_str(if filter.topic.is_some() {
                " AND tier = ?2"
            } else {
                " AND tier = ?1"
            });
        }
        sql.push_str(" ORDER BY id ASC");

        let mut stmt = conn.prepare(&sql)?;
        let rows_iter = match (&filter.topic, &filter.tier) {
            (Some(topic), Some(tier)) => stmt.query(params![topic, tier])?,
            (Some(topic), None) => stmt.query(params![topic])?,
            (None, Some(tier)) => stmt.query(params![tier])?,
            (None, None) => stmt.query([])?,
        };

        collect_modules(rows_iter)
    }

    /// Fetch a single module by id, or `None` if absent.
    pub fn get_module(&self, id: i64) -> Result<Option<Module>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, title, topic, tier, chunk_count, compressed_size, filename
             FROM modules WHERE id = ?1",
            params![id],
            row_to_module,
        )
        .optional()
        .map_err(CatalogError::from)
    }

    /// Delete a module row (cascading to its quiz questions). Returns
    /// whether a row was actually removed.
    pub fn delete_module(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute("DELETE FROM modules WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Insert a quiz question under `module_id`. Fails with
    /// [`CatalogError::NotFound`] if the module doesn't exist, or
    /// [`CatalogError::Constraint`] if `options`/`correct` are malformed.
    pub fn add_quiz(
        &self,
        module_id: i64,
        question: &str,
        options: &[String],
        correct: i64,
    ) -> Result<i64> {
        if options.len() < 2 {
            return Err(CatalogError::Constraint(
                "a quiz question needs at least 2 options".to_string(),
            ));
        }
        if correct < 0 || correct as usize >= options.len() {
            return Err(CatalogError::Constraint(format!(
                "correct index {correct} is out of range for {} options",
                options.len()
            )));
        }

        let conn = self.conn.lock().unwrap();

        let module_exists: bool = conn
            .prepare("SELECT 1 FROM modules WHERE id = ?1")?
            .exists(params![module_id])?;
        if !module_exists {
            return Err(CatalogError::NotFound);
        }

        let options_json = serde_json::to_string(options).expect("Vec<String> always serializes");
        conn.execute(
            "INSERT INTO quizzes (module_id, question, options, correct)
             VALUES (?1, ?2, ?3, ?4)",
            params![module_id, question, options_json, correct],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// List quiz questions for a module, ordered by ascending id.
    pub fn list_quiz(&self, module_id: i64) -> Result<Vec<QuizQuestion>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, module_id, question, options, correct
             FROM quizzes WHERE module_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![module_id], row_to_quiz)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(CatalogError::from)
    }

    /// Delete a quiz question by id. Returns whether a row was removed.
    pub fn delete_quiz(&self, id: i64) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute("DELETE FROM quizzes WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

fn row_to_module(row: &rusqlite::Row) -> rusqlite::Result<Module> {
    Ok(Module {
        id: row.get(0)?,
        title: row.get(1)?,
        topic: row.get(2)?,
        tier: row.get(3)?,
        chunk_count: row.get(4)?,
        compressed_size: row.get(5)?,
        filename: row.get(6)?,
    })
}

fn row_to_quiz(row: &rusqlite::Row) -> rusqlite::Result<QuizQuestion> {
    let options_json: String = row.get(3)?;
    let options: Vec<String> = serde_json::from_str(&options_json).unwrap_or_default();
    Ok(QuizQuestion {
        id: row.get(0)?,
        module_id: row.get(1)?,
        question: row.get(2)?,
        options,
        correct: row.get(4)?,
    })
}

fn collect_modules(mut rows: rusqlite::Rows) -> Result<Vec<Module>> {
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(row_to_module(row)?);
    }
    Ok(out)
}
