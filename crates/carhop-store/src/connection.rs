//! Connection pooling and store configuration.

use std::path::PathBuf;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use carhop_core::errors::{OrderError, Result};

/// Pragmas applied to every pooled connection.
const CONNECTION_PRAGMAS: &str = "PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;";

/// Store configuration, deserializable from app settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// Database file path. `None` opens an in-memory database (tests,
    /// demos).
    pub path: Option<PathBuf>,
    /// Maximum pooled connections.
    pub pool_size: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            pool_size: 4,
        }
    }
}

/// A pooled `SQLite` connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// r2d2 pool over rusqlite with the store pragmas applied per connection.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: r2d2::Pool<SqliteConnectionManager>,
}

impl ConnectionPool {
    /// Open (or create) the database described by `config` and run
    /// migrations.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let manager = match &config.path {
            Some(path) => SqliteConnectionManager::file(path),
            // Shared-cache URI so every pooled connection sees the same
            // in-memory database; kept alive by the pool's idle connection.
            None => SqliteConnectionManager::file(format!(
                "file:carhop-{}?mode=memory&cache=shared",
                Uuid::now_v7()
            ))
            .with_flags(
                OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE,
            ),
        };
        let manager = manager.with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));

        let inner = r2d2::Pool::builder()
            .max_size(config.pool_size.max(1))
            .min_idle(Some(1))
            .build(manager)
            .map_err(OrderError::storage)?;

        let conn = inner.get().map_err(OrderError::storage)?;
        crate::migrations::run_migrations(&conn).map_err(OrderError::storage)?;
        drop(conn);

        Ok(Self { inner })
    }

    /// Open a throwaway in-memory database (test fixture).
    pub fn open_in_memory() -> Result<Self> {
        Self::open(&StoreConfig::default())
    }

    /// Check out a connection.
    pub fn get(&self) -> Result<PooledConnection> {
        self.inner.get().map_err(OrderError::storage)
    }
}
