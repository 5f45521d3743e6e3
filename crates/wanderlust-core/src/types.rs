//! # Domain Types
//!
//! Application records used throughout the Wanderlust site.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Application Records                             │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐   ┌──────────────────┐    │
//! │  │   Destination    │   │  NewDestination  │   │ DestinationPatch │    │
//! │  │  ──────────────  │   │  ──────────────  │   │  ──────────────  │    │
//! │  │  id (server)     │   │  (no id)         │   │  Option<_> per   │    │
//! │  │  name, country   │   │  create input    │   │  field; None =   │    │
//! │  │  rating, price   │   │                  │   │  "do not send"   │    │
//! │  └──────────────────┘   └──────────────────┘   └──────────────────┘    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────┐                           │
//! │  │     Inquiry      │   │    NewInquiry    │                           │
//! │  │  ──────────────  │   │  ──────────────  │                           │
//! │  │  id, createdAt   │   │  name, email,    │                           │
//! │  │  (server)        │   │  destination,    │                           │
//! │  │  immutable       │   │  message         │                           │
//! │  └──────────────────┘   └──────────────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All records serialize in camelCase, which is what the site frontend
//! reads. The store's snake_case rows live in [`crate::rows`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Destination
// =============================================================================

/// A travel destination shown on the site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Destination {
    /// Server-assigned identifier. Never changes once assigned.
    pub id: String,

    /// Display name (e.g., "Bali").
    pub name: String,

    pub country: String,

    /// Long-form description for the detail page.
    pub description: String,

    /// One-line teaser for cards and sliders.
    pub short_description: String,

    pub image_url: String,

    /// 0-5 by convention. Not validated.
    pub rating: f64,

    /// Ordered list of things to do.
    pub activities: Vec<String>,

    /// Package price in `currency` units.
    pub price: f64,

    /// ISO 4217 code (e.g., "USD"). Not validated.
    pub currency: String,

    pub continent: String,
}

/// Input for creating a destination: every field except the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewDestination {
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
}

impl NewDestination {
    /// Attaches an id, producing the full record.
    pub fn with_id(self, id: impl Into<String>) -> Destination {
        Destination {
            id: id.into(),
            name: self.name,
            country: self.country,
            description: self.description,
            short_description: self.short_description,
            image_url: self.image_url,
            rating: self.rating,
            activities: self.activities,
            price: self.price,
            currency: self.currency,
            continent: self.continent,
        }
    }
}

impl From<Destination> for NewDestination {
    fn from(destination: Destination) -> Self {
        NewDestination {
            name: destination.name,
            country: destination.country,
            description: destination.description,
            short_description: destination.short_description,
            image_url: destination.image_url,
            rating: destination.rating,
            activities: destination.activities,
            price: destination.price,
            currency: destination.currency,
            continent: destination.continent,
        }
    }
}

// =============================================================================
// Destination Patch
// =============================================================================

/// A partial update to a destination.
///
/// ## Presence, Not Truthiness
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  price: None       → field is not sent, stored price is kept           │
/// │  price: Some(0.0)  → field is sent, stored price becomes 0             │
/// │  name:  Some("")   → field is sent, stored name becomes ""             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// The id is not part of the patch: it cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct DestinationPatch {
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

impl DestinationPatch {
    /// Sets the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the country.
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Sets the long description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the teaser line.
    pub fn short_description(mut self, short_description: impl Into<String>) -> Self {
        self.short_description = Some(short_description.into());
        self
    }

    /// Sets the image URL.
    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Sets the rating.
    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Replaces the activity list.
    pub fn activities(mut self, activities: Vec<String>) -> Self {
        self.activities = Some(activities);
        self
    }

    /// Sets the price. Zero is kept.
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets the currency code.
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets the continent.
    pub fn continent(mut self, continent: impl Into<String>) -> Self {
        self.continent = Some(continent.into());
        self
    }

    /// Returns true when no field is present.
    pub fn is_empty(&self) -> bool {
        *self == DestinationPatch::default()
    }
}

// =============================================================================
// Inquiry
// =============================================================================

/// A visitor inquiry submitted through the contact form.
///
/// Immutable after creation; the only mutation is deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Inquiry {
    /// Server-assigned identifier.
    pub id: String,

    pub name: String,

    pub email: String,

    /// Free-text destination name. Not a reference to a Destination id.
    pub destination: String,

    pub message: String,

    /// When the inquiry was stored. Older payloads call this `date`.
    #[serde(alias = "date")]
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Input for submitting an inquiry.
///
/// All four fields are required by the store schema. Shape rules (length,
/// email syntax) are checked by the caller with
/// [`crate::validation::validate_inquiry`]; the repositories store whatever
/// they are given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    pub destination: String,
    pub message: String,
}

impl NewInquiry {
    /// Creates a new inquiry input.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        destination: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        NewInquiry {
            name: name.into(),
            email: email.into(),
            destination: destination.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
