use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

use super::models::{LinkFields, LinkRecord};
use crate::error::{Error, Result};

/// Structural revision of the links table this build writes and expects.
pub const SCHEMA_VERSION: i64 = 1;

const INIT_SQL: &str = "
CREATE TABLE IF NOT EXISTS links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    category TEXT NOT NULL,
    url TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_links_category ON links(category);
";

pub struct Database {
    conn: Mutex<Connection>,
    path: String,
}

impl Database {
    /// Open or create the database file, creating parent directories as
    /// needed, and bring the schema up to date.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let db = Database {
            conn: Mutex::new(conn),
            path: path.to_string_lossy().to_string(),
        };
        db.ensure_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database {
            conn: Mutex::new(conn),
            path: ":memory:".to_string(),
        };
        db.ensure_schema()?;
        Ok(db)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current `PRAGMA user_version` of the store.
    pub fn schema_version(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    /// Bring a fresh store up to the target schema. Safe to call repeatedly;
    /// a store already at the target is left untouched, and a store written
    /// by a newer build is refused before any write happens.
    pub fn ensure_schema(&self) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if current > SCHEMA_VERSION {
            return Err(Error::UnsupportedSchemaVersion {
                found: current,
                supported: SCHEMA_VERSION,
            });
        }

        if current < 1 {
            // The DDL and the version bump land in one transaction, so a
            // crash mid-migration cannot leave the version advanced without
            // the table.
            let tx = conn.transaction()?;
            tx.execute_batch(INIT_SQL)?;
            tx.execute_batch("PRAGMA user_version = 1;")?;
            tx.commit()?;
            eprintln!("Migration: created links schema (version 1)");
        }

        Ok(())
    }

    // Link operations

    /// Read every row in insertion order. This is the baseline the
    /// repository reconciles staged edits against.
    pub fn load_links(&self) -> Result<Vec<LinkRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, title, category, url FROM links ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(LinkRecord {
                id: row.get(0)?,
                title: row.get(1)?,
                category: row.get(2)?,
                url: row.get(3)?,
            })
        })?;

        let mut links = Vec::new();
        for row in rows {
            links.push(row?);
        }
        Ok(links)
    }

    /// Apply a staged edit set in one all-or-nothing transaction. Any
    /// statement failure rolls the whole set back and leaves the store as it
    /// was.
    pub fn apply_links(
        &self,
        deletes: &[i64],
        updates: &[(i64, LinkFields)],
        inserts: &[LinkFields],
    ) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        for id in deletes {
            tx.execute("DELETE FROM links WHERE id = ?1", params![id])?;
        }
        for (id, fields) in updates {
            tx.execute(
                "UPDATE links SET title = ?1, category = ?2, url = ?3 WHERE id = ?4",
                params![fields.title, fields.category, fields.url, id],
            )?;
        }
        for fields in inserts {
            tx.execute(
                "INSERT INTO links (title, category, url) VALUES (?1, ?2, ?3)",
                params![fields.title, fields.category, fields.url],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> Result<()> {
        Ok(self.conn.lock().unwrap().execute_batch(sql)?)
    }
}
