//! Connection handling for the single SQLite database file.
//!
//! There is no pool: every executor call opens its own connection through
//! [`DatabaseTarget::connect`] and closes it before returning. Startup
//! provisioning (creating the parent directory and the file) also lives here.

use crate::error::{DbError, DbResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The database file every call is executed against.
///
/// Owned by the process and handed to the executor at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseTarget {
    path: PathBuf,
}

impl DatabaseTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new().filename(&self.path)
    }

    /// Open a connection to an existing database file.
    pub async fn connect(&self) -> DbResult<SqliteConnection> {
        debug!(path = %self.path.display(), "Opening database connection");
        self.options()
            .create_if_missing(false)
            .connect()
            .await
            .map_err(|e| self.connect_error(e))
    }

    /// Make sure the database file exists and can be opened.
    ///
    /// Creates the parent directory and an empty database file when missing,
    /// then opens and closes one connection to verify access.
    pub async fn provision(&self) -> DbResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                tokio::fs::create_dir_all(dir).await.map_err(|e| {
                    DbError::connection(
                        format!(
                            "Failed to create database directory {}: {}",
                            dir.display(),
                            e
                        ),
                        format!("Check that you have write permissions to {}", dir.display()),
                    )
                })?;
                info!(directory = %dir.display(), "Created database directory");
            }
        }

        let conn = self
            .options()
            .create_if_missing(true)
            .connect()
            .await
            .map_err(|e| self.connect_error(e))?;
        conn.close().await?;

        info!(path = %self.path.display(), "Successfully connected to database");
        Ok(())
    }

    fn connect_error(&self, err: sqlx::Error) -> DbError {
        let dir = self
            .path
            .parent()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| ".".to_string());
        DbError::connection(
            format!(
                "Failed to open database {}: {}",
                self.path.display(),
                err
            ),
            format!(
                "Verify the file exists and that you have read/write permissions to {}",
                dir
            ),
        )
    }
}
