//! # SQLite Pool Management
//!
//! Connection pool creation for the local SQLite backend.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqliteConfig::new(path)      ← or SqliteConfig::in_memory() in tests  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  create_pool(&config).await   ← pool + pragmas                         │
//! │       │                                                                 │
//! │       ├── run_migrations? ──► migrations::run_migrations(&pool)        │
//! │       ▼                                                                 │
//! │  SqliteStore::new(pool)       ← RowStore for the repositories          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File databases use WAL journaling with NORMAL synchronous. An in-memory
//! database lives only as long as its single connection, so that connection
//! is never reaped.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::migrations;

/// Path marker for an in-memory database.
pub const IN_MEMORY: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// SQLite pool configuration.
///
/// ## Example
/// ```rust
/// use wanderlust_db::pool::SqliteConfig;
///
/// let config = SqliteConfig::new("./wanderlust.db")
///     .max_connections(4)
///     .run_migrations(true);
/// assert!(!config.is_in_memory());
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the database file, or [`IN_MEMORY`].
    pub database_path: PathBuf,

    /// Default: 5
    pub max_connections: u32,

    /// Default: 1
    pub min_connections: u32,

    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle connections are closed after this long. `None` keeps them.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Default: true
    pub run_migrations: bool,
}

impl SqliteConfig {
    /// Creates a configuration for the file at `path`, created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// Creates an isolated in-memory database configuration (for tests).
    pub fn in_memory() -> Self {
        SqliteConfig {
            database_path: PathBuf::from(IN_MEMORY),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    /// Sets the maximum number of connections. In-memory databases always
    /// use one.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of idle connections kept open.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets how long to wait for a connection.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the idle timeout. `None` keeps idle connections open.
    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Sets whether embedded migrations run when the pool opens.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Returns true for the in-memory marker path.
    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY
    }

    /// Connection cap the pool is built with.
    pub fn effective_max_connections(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections
        }
    }
}

// =============================================================================
// Pool Creation
// =============================================================================

/// Creates the connection pool and, when enabled, applies migrations.
///
/// ## Returns
/// * `Ok(SqlitePool)` - Ready-to-use pool
/// * `Err(StoreError::ConnectionFailed)` - Could not open the database
/// * `Err(StoreError::MigrationFailed)` - Schema could not be applied
pub async fn create_pool(config: &SqliteConfig) -> StoreResult<SqlitePool> {
    info!(
        path = %config.database_path.display(),
        "Opening SQLite store"
    );

    let (connect_options, pool_options) = if config.is_in_memory() {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(config.effective_max_connections())
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
        (options, pool)
    } else {
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());
        let options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.effective_max_connections())
            .min_connections(config.min_connections)
            .idle_timeout(config.idle_timeout);
        (options, pool)
    };

    debug!("Connection options configured");

    let pool = pool_options
        .acquire_timeout(config.connect_timeout)
        .connect_with(connect_options)
        .await
        .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

    info!(
        max_connections = config.effective_max_connections(),
        "SQLite pool created"
    );

    if config.run_migrations {
        migrations::run_migrations(&pool).await?;
    }

    Ok(pool)
}
