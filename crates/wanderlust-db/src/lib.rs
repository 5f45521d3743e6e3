//! # wanderlust-db: Data Access Layer for Wanderlust
//!
//! Store clients, repositories and the in-memory fallback for the
//! Wanderlust travel site. Records and row mapping live in
//! `wanderlust-core`; this crate does the I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Wanderlust Data Flow                                │
//! │                                                                         │
//! │  Site pages (list, detail, featured strip, contact form)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                wanderlust-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   SiteData    │    │ Repositories  │    │    Store     │  │   │
//! │  │   │ (database.rs) │    │               │    │   clients    │  │   │
//! │  │   │               │    │ Destination   │    │              │  │   │
//! │  │   │ Database      │───►│ Inquiry       │───►│ RestStore    │  │   │
//! │  │   │ FallbackStore │    │  ├ direct     │    │ SqliteStore  │  │   │
//! │  │   │               │    │  └ edge (HTTP)│    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Hosted store (REST + edge functions)  or  local SQLite file           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Site configuration (TOML file + environment)
//! - [`store`] - Table-scoped data access client and its backends
//! - [`repository`] - Destination and inquiry repositories
//! - [`fallback`] - In-memory store with the sample catalogue
//! - [`database`] - Backend selection and repository access
//! - [`pool`] / [`migrations`] - SQLite pool and embedded schema
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wanderlust_db::{SiteConfig, SiteData};
//!
//! let config = SiteConfig::load(None)?;
//! match SiteData::open(&config).await? {
//!     SiteData::Store(db) => {
//!         let featured = db.destinations().get_featured(None).await?;
//!     }
//!     SiteData::Fallback(store) => {
//!         let featured = store.featured(None);
//!     }
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod database;
pub mod error;
pub mod fallback;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, InquiryTransportMode, SiteConfig, StoreBackend};
pub use database::{Database, SiteData};
pub use error::{StoreError, StoreResult};
pub use fallback::FallbackStore;
pub use pool::SqliteConfig;

// Repository re-exports for convenience
pub use repository::destination::DestinationRepository;
pub use repository::inquiry::{EdgeInquiries, InquiryRepository, InquiryTransport, StoreInquiries};
