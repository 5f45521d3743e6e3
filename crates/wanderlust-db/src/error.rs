//! # Store Error Types
//!
//! Error types for store, HTTP and configuration operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error / reqwest::Error / PostgREST error body / edge { error }  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Categorized, message preserved             │
//! │       │                                                                 │
//! │       ├── NotFound        → page shows "not found"                     │
//! │       └── everything else → page shows a transient error               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::config::ConfigError;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A single-row fetch or an update matched zero rows.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The remote store or edge function answered with a failure status.
    ///
    /// `message` is the server's own message when it sent one.
    #[error("Remote call failed ({status}): {message}")]
    Remote { status: u16, message: String },

    /// The request never got an answer (DNS, connect, timeout, TLS).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Local SQL execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A column that is not part of the table schema was referenced.
    #[error("Unknown column {table}.{column}")]
    UnknownColumn { table: String, column: String },

    /// An update tried to change a column that never changes.
    #[error("Column {table}.{column} cannot be updated")]
    ImmutableColumn { table: String, column: String },

    /// A row could not be converted to or from its typed form.
    #[error("Row decode failed: {0}")]
    Decode(String),

    /// Connecting to the store failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Invalid or unloadable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Returns true for the not-found case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → StoreError::NotFound
/// sqlx::Error::Database       → StoreError::QueryFailed (driver message)
/// sqlx::Error::PoolTimedOut   → StoreError::ConnectionFailed
/// sqlx::Error::ColumnDecode   → StoreError::Decode
/// Other                       → StoreError::QueryFailed
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => StoreError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => {
                StoreError::ConnectionFailed("Connection pool exhausted".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::ConnectionFailed("Pool is closed".to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Decode(err.to_string())
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
