//! # Database Handle
//!
//! Opens the configured backend and hands out repositories.
//!
//! ## Backend Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SiteConfig.store.backend                                               │
//! │       │                                                                 │
//! │       ├── rest    ──► RestStore   ─┐                                    │
//! │       ├── sqlite  ──► SqliteStore ─┴─► Database ──► SiteData::Store    │
//! │       └── memory  ──► FallbackStore ─────────────► SiteData::Fallback  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handles are built once at startup and passed to whatever needs them.

use std::sync::Arc;
use tracing::info;

use crate::config::{ConfigError, SiteConfig, StoreBackend};
use crate::error::StoreResult;
use crate::fallback::FallbackStore;
use crate::pool::SqliteConfig;
use crate::repository::{DestinationRepository, InquiryRepository};
use crate::store::{RestStore, RowStore, SqliteStore};

/// Main store handle providing repository access.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::connect(&config).await?;
/// let featured = db.destinations().get_featured(None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    store: Arc<dyn RowStore>,
    inquiries: InquiryRepository,
}

impl Database {
    /// Assembles a handle from an open store and an inquiry repository.
    pub fn new(store: Arc<dyn RowStore>, inquiries: InquiryRepository) -> Self {
        Database { store, inquiries }
    }

    /// Opens the store named by `config.store.backend`.
    ///
    /// ## Errors
    /// - [`crate::StoreError::Config`] for the memory backend, which has no
    ///   store (use [`SiteData::open`])
    /// - connection or migration failures of the SQLite backend
    pub async fn connect(config: &SiteConfig) -> StoreResult<Self> {
        let store: Arc<dyn RowStore> = match config.store.backend {
            StoreBackend::Rest => Arc::new(RestStore::from_settings(&config.store)?),
            StoreBackend::Sqlite => Arc::new(
                SqliteStore::connect(&SqliteConfig::new(&config.store.sqlite_path)).await?,
            ),
            StoreBackend::Memory => {
                return Err(ConfigError::InvalidValue {
                    key: "store.backend".to_string(),
                    reason: "the memory backend has no store to connect to".to_string(),
                }
                .into())
            }
        };

        let inquiries = InquiryRepository::from_config(config, store.clone())?;
        info!(backend = store.backend(), "Store connected");

        Ok(Database { store, inquiries })
    }

    /// Name of the active backend.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Returns the destination repository.
    pub fn destinations(&self) -> DestinationRepository {
        DestinationRepository::new(self.store.clone())
    }

    /// Returns the inquiry repository.
    pub fn inquiries(&self) -> InquiryRepository {
        self.inquiries.clone()
    }

    /// Returns true when the store answers.
    pub async fn health_check(&self) -> bool {
        self.store.health_check().await
    }
}

// =============================================================================
// Site Data
// =============================================================================

/// Whatever the site reads from: a real store, or the in-memory fallback.
#[derive(Debug)]
pub enum SiteData {
    Store(Database),
    Fallback(FallbackStore),
}

impl SiteData {
    /// Opens the configured backend.
    pub async fn open(config: &SiteConfig) -> StoreResult<Self> {
        match config.store.backend {
            StoreBackend::Memory => {
                info!("Using the in-memory fallback store");
                Ok(SiteData::Fallback(FallbackStore::seeded()))
            }
            _ => Ok(SiteData::Store(Database::connect(config).await?)),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SiteData::Fallback(_))
    }
}
