use std::sync::Arc;

use anyhow::Result;
use rusqlite::Connection;
use tokio::sync::Mutex;
use tracing::info;

use crate::schema::INIT_SQL;

/// An embedded relational store backed by SQLite.
///
/// The Scraper process and the Notifier process (Delivery Worker plus chat
/// command front-end) each open their own connection against the same
/// on-disk file — they share nothing else. SQLite's own file locking
/// handles that safely as long as WAL mode is on, which is why `open` sets
/// it immediately after connecting; a plain rollback-journal connection
/// would serialize readers behind a writer across processes and is not
/// enough for this split. Within a single process, concurrent writers still
/// serialize behind SQLite's single-writer rule, so the connection stays
/// wrapped in `Arc<Mutex<_>>` the way it did for the original embedded
/// engine this store used before moving to SQLite.
#[derive(Clone)]
pub struct DuckDbBackend {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl DuckDbBackend {
    /// Open (or create) the database file at `path`, enable WAL mode, and
    /// run the schema DDL.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000; PRAGMA foreign_keys=ON;",
        )?;
        conn.execute_batch(INIT_SQL)?;
        info!(db_path = path, "opened renthawk store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database. Intended for tests only.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(INIT_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// `SELECT 1` liveness probe.
    pub async fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute_batch("SELECT 1")?;
        Ok(())
    }

    /// Direct access to the underlying connection for integration tests
    /// that need to seed or inspect rows the public API doesn't expose.
    pub async fn conn_for_test(&self) -> tokio::sync::MutexGuard<'_, Connection> {
        self.conn.lock().await
    }
}
