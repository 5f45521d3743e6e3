//! # wanderlust-core: Pure Types for the Wanderlust Data Layer
//!
//! Application records, wire rows and the mapping between them. Nothing in
//! this crate performs I/O; `wanderlust-db` does all store and HTTP calls.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Wanderlust Data Flow                                │
//! │                                                                         │
//! │  Site pages (destinations list/detail, contact form)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              ★ wanderlust-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   rows    │  │ endpoints │  │ validation│  │   │
//! │  │   │Destination│  │ snake_case│  │ /inquiries│  │  contact  │  │   │
//! │  │   │  Inquiry  │  │  ⇄ camel  │  │   /:id    │  │   form    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              wanderlust-db (store client, repositories)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Application records (Destination, Inquiry and their inputs)
//! - [`rows`] - Wire rows and the row mapper
//! - [`endpoints`] - Edge function endpoint templates and URL building
//! - [`validation`] - Contact form rules, applied by callers
//! - [`catalogue`] - The six sample destinations
//! - [`error`] - Validation error types
//!
//! ## Example Usage
//!
//! ```rust
//! use wanderlust_core::rows::DestinationPatchRow;
//! use wanderlust_core::DestinationPatch;
//!
//! // A zero price is a value, not an absent field.
//! let patch = DestinationPatch::default().price(0.0);
//! let row = DestinationPatchRow::from(&patch);
//! assert_eq!(row.price, Some(0.0));
//! assert_eq!(row.name, None);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalogue;
pub mod endpoints;
pub mod error;
pub mod rows;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of destinations returned by a featured query when the caller
/// does not pass a limit.
pub const DEFAULT_FEATURED_LIMIT: u32 = 3;
