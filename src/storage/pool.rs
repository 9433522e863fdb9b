//! Database connection pool management.
//!
//! The pool opens the SQLite file with:
//! - WAL journaling, so readers don't block the single writer
//! - a busy timeout, so concurrent enrichment tasks wait for the write lock
//! - foreign keys enforced
//! - automatic file (and parent directory) creation

use std::path::Path;

use log::{error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::DB_BUSY_TIMEOUT;
use crate::error_handling::DatabaseError;

/// Opens a connection pool on `db_path` sized for `max_connections` writers.
pub async fn init_db_pool(
    db_path: &Path,
    max_connections: u32,
) -> Result<SqlitePool, DatabaseError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            error!("Failed to create database directory {}: {e}", parent.display());
            DatabaseError::FileCreationError(e.to_string())
        })?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(DB_BUSY_TIMEOUT)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(DB_BUSY_TIMEOUT)
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to connect to database {}: {e}", db_path.display());
            DatabaseError::SqlError(e)
        })?;

    info!("Opened database {}", db_path.display());
    Ok(pool)
}
