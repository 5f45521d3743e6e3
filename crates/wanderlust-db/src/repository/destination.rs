//! # Destination Repository
//!
//! Store operations for destinations, in application form.
//!
//! ## Key Operations
//! - Listing and lookup by id
//! - Country / continent search (case-insensitive substring)
//! - Featured strip (top rated)
//! - Create, partial update, delete
//!
//! ## Featured Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ORDER BY rating DESC, created_at ASC  LIMIT n (default 3)             │
//! │                                                                         │
//! │  Tokyo   4.8  ◄── featured(1)                                          │
//! │  Bali    4.7                                                           │
//! │  NYC     4.6  ┐ equal rating: the one created first wins              │
//! │  Sydney  4.6  ┘                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows equal on both keys come back in store order: insertion order on
//! SQLite, unspecified on the hosted store.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use wanderlust_core::rows::{DestinationInsert, DestinationPatchRow, DestinationRow};
use wanderlust_core::{Destination, DestinationPatch, NewDestination, DEFAULT_FEATURED_LIMIT};

use super::logged;
use crate::error::StoreResult;
use crate::store::{Query, RowStore, Table, DESTINATIONS};

/// Repository for destination operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.destinations();
///
/// let asia = repo.get_by_continent("asia").await?;
/// let top = repo.get_featured(Some(1)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DestinationRepository {
    store: Arc<dyn RowStore>,
}

fn into_destinations(rows: Vec<DestinationRow>) -> Vec<Destination> {
    rows.into_iter().map(Destination::from).collect()
}

impl DestinationRepository {
    /// Creates a new DestinationRepository.
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        DestinationRepository { store }
    }

    fn table(&self) -> Table<'_> {
        Table::new(self.store.as_ref(), &DESTINATIONS)
    }

    /// Every destination, in store order. Empty when there are none.
    pub async fn get_all(&self) -> StoreResult<Vec<Destination>> {
        debug!("Listing destinations");
        let rows = logged("destinations.get_all", self.table().select_all().await)?;
        Ok(into_destinations(rows))
    }

    /// One destination.
    ///
    /// ## Errors
    /// [`crate::StoreError::NotFound`] when the id is unknown.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Destination> {
        debug!(id = %id, "Getting destination");
        let row: DestinationRow =
            logged("destinations.get_by_id", self.table().select_by_id(id).await)?;
        Ok(row.into())
    }

    /// Destinations whose country contains `country`, ignoring case.
    pub async fn get_by_country(&self, country: &str) -> StoreResult<Vec<Destination>> {
        debug!(country = %country, "Searching destinations by country");
        let rows = logged(
            "destinations.get_by_country",
            self.table().select_matching("country", country).await,
        )?;
        Ok(into_destinations(rows))
    }

    /// Destinations whose continent contains `continent`, ignoring case.
    pub async fn get_by_continent(&self, continent: &str) -> StoreResult<Vec<Destination>> {
        debug!(continent = %continent, "Searching destinations by continent");
        let rows = logged(
            "destinations.get_by_continent",
            self.table().select_matching("continent", continent).await,
        )?;
        Ok(into_destinations(rows))
    }

    /// The `limit` best-rated destinations ([`DEFAULT_FEATURED_LIMIT`] when
    /// `None`). Returns `min(limit, total)` destinations.
    pub async fn get_featured(&self, limit: Option<u32>) -> StoreResult<Vec<Destination>> {
        let limit = limit.unwrap_or(DEFAULT_FEATURED_LIMIT);
        debug!(limit, "Getting featured destinations");

        let query = Query::all()
            .order_desc("rating")
            .order_asc("created_at")
            .limit(limit);
        let rows = logged("destinations.get_featured", self.table().select(&query).await)?;
        Ok(into_destinations(rows))
    }

    /// Stores a new destination. The store assigns the id.
    pub async fn create(&self, destination: &NewDestination) -> StoreResult<Destination> {
        let insert = DestinationInsert::from(destination).created_at(Utc::now());
        let row: DestinationRow =
            logged("destinations.create", self.table().insert(&insert).await)?;

        info!(id = %row.id, name = %row.name, "Destination created");
        Ok(row.into())
    }

    /// Applies the present fields of `patch` and returns the result.
    ///
    /// ## Errors
    /// [`crate::StoreError::NotFound`] when the id is unknown.
    pub async fn update(&self, id: &str, patch: &DestinationPatch) -> StoreResult<Destination> {
        let changes = DestinationPatchRow::from(patch);
        let row: DestinationRow =
            logged("destinations.update", self.table().update(id, &changes).await)?;

        info!(id = %id, "Destination updated");
        Ok(row.into())
    }

    /// Removes a destination. Succeeds whether or not it existed.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        logged("destinations.delete", self.table().delete(id).await)?;
        info!(id = %id, "Destination deleted");
        Ok(())
    }
}
