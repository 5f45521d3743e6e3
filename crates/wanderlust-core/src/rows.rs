//! # Row Mapper
//!
//! Wire rows as the store's schema names them, and the mapping to and from
//! application records.
//!
//! ## Renamed Fields
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   wire row (snake_case)          application record (camelCase)         │
//! │   ─────────────────────          ──────────────────────────────         │
//! │   short_description      ⇄       shortDescription                       │
//! │   image_url              ⇄       imageUrl                               │
//! │   created_at             ⇄       createdAt        (inquiries)           │
//! │                                                                         │
//! │   every other field passes through unchanged                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Row Kinds
//! - `*Row`: a full row as read back from the store.
//! - `*Insert`: a creation row. No id; the store assigns one.
//! - [`DestinationPatchRow`]: an update row. Absent fields are not
//!   serialized at all, so the store never overwrites them with nulls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Destination, DestinationPatch, Inquiry, NewDestination, NewInquiry};

// =============================================================================
// Destination Rows
// =============================================================================

/// A row of the `destinations` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationRow {
    pub id: String,
    pub name: String,
    pub country: String,
    pub description: String,
    pub short_description: String,
    pub image_url: String,
    pub rating: f64,
    #[serde(default)]
    pub activities: Vec<String>,
    pub price: f64,
    pub currency: String,
    pub continent: String,
    /// Assigned by the store. Not part of the application record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<DestinationRow> for Destination {
    fn from(row: DestinationRow) -> Self {
        Destination {
            id: row.id,
            name: row.name,
            country: row.country,
            description: row.description,
            short_description: row.short_description,
            image_url: row.image_url,
            rating: row.rating,
            activities: row.activities,
            price: row.price,
            currency: row.currency,
            continent: row.continent,
        }
    }
}

impl From<&Destination> for DestinationRow {
    fn from(destination: &Destination) -> Self {
        DestinationRow {
            id: destination.id.clone(),
            name: destination.name.clone(),
            country: destination.country.clone(),
            description: destination.description.clone(),
            short_description: destination.short_description.clone(),
            image_url: destination.image_url.clone(),
            rating: destination.rating,
            activities: destination.activities.clone(),
            price: destination.price,
            currency: destination.currency.clone(),
            continent: destination.continent.clone(),
            created_at: None,
        }
    }
}

/// A creation row for the `destinations` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationInsert {
    pub name: String,
    pub country: String,
    pub description: String,
    pub short_description: String,
    pub image_url: String,
    pub rating: f64,
    pub activities: Vec<String>,
    pub price: f64,
    pub currency: String,
    pub continent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DestinationInsert {
    /// Stamps the creation time instead of leaving it to the store.
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

impl From<&NewDestination> for DestinationInsert {
    fn from(destination: &NewDestination) -> Self {
        DestinationInsert {
            name: destination.name.clone(),
            country: destination.country.clone(),
            description: destination.description.clone(),
            short_description: destination.short_description.clone(),
            image_url: destination.image_url.clone(),
            rating: destination.rating,
            activities: destination.activities.clone(),
            price: destination.price,
            currency: destination.currency.clone(),
            continent: destination.continent.clone(),
            created_at: None,
        }
    }
}

/// An update row for the `destinations` table.
///
/// Only fields that are `Some` are serialized. `Some(0.0)` is serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DestinationPatchRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
}

impl From<&DestinationPatch> for DestinationPatchRow {
    fn from(patch: &DestinationPatch) -> Self {
        DestinationPatchRow {
            name: patch.name.clone(),
            country: patch.country.clone(),
            description: patch.description.clone(),
            short_description: patch.short_description.clone(),
            image_url: patch.image_url.clone(),
            rating: patch.rating,
            activities: patch.activities.clone(),
            price: patch.price,
            currency: patch.currency.clone(),
            continent: patch.continent.clone(),
        }
    }
}

// =============================================================================
// Inquiry Rows
// =============================================================================

/// A row of the `inquiries` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InquiryRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub destination: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<InquiryRow> for Inquiry {
    fn from(row: InquiryRow) -> Self {
        Inquiry {
            id: row.id,
            name: row.name,
            email: row.email,
            destination: row.destination,
            message: row.message,
            created_at: row.created_at,
        }
    }
}

impl From<&Inquiry> for InquiryRow {
    fn from(inquiry: &Inquiry) -> Self {
        InquiryRow {
            id: inquiry.id.clone(),
            name: inquiry.name.clone(),
            email: inquiry.email.clone(),
            destination: inquiry.destination.clone(),
            message: inquiry.message.clone(),
            created_at: inquiry.created_at,
        }
    }
}

/// A creation row for the `inquiries` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InquiryInsert {
    pub name: String,
    pub email: String,
    pub destination: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl InquiryInsert {
    /// Stamps the creation time instead of leaving it to the store.
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

impl From<&NewInquiry> for InquiryInsert {
    fn from(inquiry: &NewInquiry) -> Self {
        InquiryInsert {
            name: inquiry.name.clone(),
            email: inquiry.email.clone(),
            destination: inquiry.destination.clone(),
            message: inquiry.message.clone(),
            created_at: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::sample_destinations;
    use serde_json::json;

    #[test]
    fn test_row_to_destination_renames_fields() {
        let row: DestinationRow = serde_json::from_value(json!({
            "id": "7f1c",
            "name": "Tokyo",
            "country": "Japan",
            "description": "Capital",
            "short_description": "Futuristic city",
            "image_url": "https://example.com/tokyo.jpg",
            "rating": 4.8,
            "activities": ["Sushi Dining"],
            "price": 2400,
            "currency": "USD",
            "continent": "Asia",
            "created_at": "2024-05-01T08:30:00+00:00"
        }))
        .unwrap();

        let destination = Destination::from(row);
        assert_eq!(destination.short_description, "Futuristic city");
        assert_eq!(destination.image_url, "https://example.com/tokyo.jpg");
        assert_eq!(destination.price, 2400.0);

        let json = serde_json::to_value(&destination).unwrap();
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn test_wire_round_trip_keeps_catalogue_fields() {
        for destination in sample_destinations() {
            let row = DestinationRow::from(&destination);
            let wire = serde_json::to_value(&row).unwrap();
            assert!(wire.get("short_description").is_some());
            assert!(wire.get("created_at").is_none());

            let back: DestinationRow = serde_json::from_value(wire).unwrap();
            assert_eq!(Destination::from(back), destination);
        }
    }

    #[test]
    fn test_patch_row_omits_absent_fields() {
        let patch = DestinationPatch::default()
            .short_description("New teaser")
            .rating(0.0);
        let row = DestinationPatchRow::from(&patch);

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            json!({ "short_description": "New teaser", "rating": 0.0 })
        );
    }

    #[test]
    fn test_empty_patch_serializes_to_empty_object() {
        let row = DestinationPatchRow::from(&DestinationPatch::default());
        assert_eq!(serde_json::to_value(&row).unwrap(), json!({}));
    }

    #[test]
    fn test_inquiry_row_maps_created_at() {
        let row: InquiryRow = serde_json::from_value(json!({
            "id": "42",
            "name": "Ada",
            "email": "ada@example.com",
            "destination": "Cairo",
            "message": "Pyramid tour for two",
            "created_at": "2024-06-02T12:00:00.123456+00:00"
        }))
        .unwrap();

        let inquiry = Inquiry::from(row.clone());
        assert_eq!(inquiry.created_at, row.created_at);

        let json = serde_json::to_value(&inquiry).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(InquiryRow::from(&inquiry), row);
    }

    #[test]
    fn test_insert_rows_carry_no_id() {
        let insert = InquiryInsert::from(&NewInquiry::new(
            "Ada",
            "ada@example.com",
            "Paris",
            "Two weeks in May please",
        ));
        let json = serde_json::to_value(&insert).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("created_at").is_none());
    }
}
