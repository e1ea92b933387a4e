//! SQLite-backed store.
//!
//! One `kv` table of raw BLOB pairs. SQLite compares BLOBs bytewise, so
//! a half-open range query walks exactly the keys under a prefix, in
//! order — the same contract the in-memory backend gives.
//!
//! ## Feature flag
//! Only compiled with the `sqlite` feature:
//! ```toml
//! blockscan-store = { version = "...", features = ["sqlite"] }
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};

use blockscan_index::{KeyValueStore, ScanIter, StoreError};

/// SQLite store over a single `kv(key BLOB PRIMARY KEY, value BLOB)` table.
///
/// Thread-safe via an internal `Arc<Mutex<Connection>>`. WAL mode is
/// enabled on open for read concurrency.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref()).map_err(sqlite_err)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             CREATE TABLE IF NOT EXISTS kv (
                 key   BLOB PRIMARY KEY,
                 value BLOB NOT NULL
             );",
        )
        .map_err(sqlite_err)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory store (useful for tests).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:")
    }

    /// Insert or replace one raw entry. Fixture and import path; the
    /// scan side never writes.
    pub fn insert(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )
        .map_err(sqlite_err)?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))
            .map_err(sqlite_err)
    }
}

impl KeyValueStore for SqliteStore {
    fn scan_prefix<'a>(&'a self, prefix: &[u8]) -> Result<ScanIter<'a>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut entries: Vec<(Vec<u8>, Vec<u8>)> = Vec::new();

        match prefix_upper_bound(prefix) {
            Some(upper) => {
                let mut stmt = conn
                    .prepare(
                        "SELECT key, value FROM kv
                         WHERE key >= ?1 AND key < ?2 ORDER BY key",
                    )
                    .map_err(sqlite_err)?;
                let rows = stmt
                    .query_map(params![prefix, upper], |row| {
                        Ok((row.get(0)?, row.get(1)?))
                    })
                    .map_err(sqlite_err)?;
                for row in rows {
                    entries.push(row.map_err(sqlite_err)?);
                }
            }
            None => {
                let mut stmt = conn
                    .prepare("SELECT key, value FROM kv WHERE key >= ?1 ORDER BY key")
                    .map_err(sqlite_err)?;
                let rows = stmt
                    .query_map(params![prefix], |row| Ok((row.get(0)?, row.get(1)?)))
                    .map_err(sqlite_err)?;
                for row in rows {
                    entries.push(row.map_err(sqlite_err)?);
                }
            }
        }

        Ok(Box::new(entries.into_iter().map(Ok)))
    }
}

/// Smallest key strictly greater than every key starting with `prefix`,
/// or `None` when no such key exists (prefix empty or all 0xFF).
fn prefix_upper_bound(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut upper = prefix.to_vec();
    while let Some(last) = upper.last_mut() {
        if *last < 0xFF {
            *last += 1;
            return Some(upper);
        }
        upper.pop();
    }
    None
}

fn sqlite_err(e: rusqlite::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
