//! # Repository Module
//!
//! Typed operations the site pages call.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Page                                                                   │
//! │       │  db.destinations().get_featured(None)                          │
//! │       ▼                                                                 │
//! │  DestinationRepository ──► Table<'_> ──► dyn RowStore                  │
//! │                                                                         │
//! │  Page                                                                   │
//! │       │  db.inquiries().create(&form)                                  │
//! │       ▼                                                                 │
//! │  InquiryRepository ──► dyn InquiryTransport                            │
//! │                          ├── StoreInquiries ──► Table<'_>              │
//! │                          └── EdgeInquiries  ──► HTTP edge functions    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is logged here once: not-found at `warn`, everything else
//! at `error`. Errors are then returned unchanged.
//!
//! ## Available Repositories
//!
//! - [`DestinationRepository`] - Destination reads, featured strip, CRUD
//! - [`InquiryRepository`] - Contact form submissions over either transport

pub mod destination;
pub mod inquiry;

pub use destination::DestinationRepository;
pub use inquiry::{EdgeInquiries, InquiryRepository, InquiryTransport, StoreInquiries};

use tracing::{error, warn};

use crate::error::StoreResult;

/// Logs a failed operation and passes the result through.
pub(crate) fn logged<T>(operation: &'static str, result: StoreResult<T>) -> StoreResult<T> {
    if let Err(err) = &result {
        if err.is_not_found() {
            warn!(operation, error = %err, "Record not found");
        } else {
            error!(operation, error = %err, "Store call failed");
        }
    }
    result
}
