//! # In-Memory Fallback Store
//!
//! Lets the site render with no store at all: the six sample destinations
//! and a process-local inquiry list.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FallbackStore                                                          │
//! │  ├── destinations: seeded from the catalogue, read-only                │
//! │  └── inquiries:    append-only, lost on restart                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The caller owns the store and passes it where it is needed; mutation
//! takes `&mut self`.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use wanderlust_core::catalogue::sample_destinations;
use wanderlust_core::{Destination, Inquiry, NewInquiry, DEFAULT_FEATURED_LIMIT};

/// Process-local destinations and inquiries.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackStore {
    destinations: Vec<Destination>,
    inquiries: Vec<Inquiry>,
}

impl Default for FallbackStore {
    fn default() -> Self {
        Self::seeded()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl FallbackStore {
    /// A store holding the sample catalogue and no inquiries.
    pub fn seeded() -> Self {
        FallbackStore {
            destinations: sample_destinations(),
            inquiries: Vec::new(),
        }
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn destination_by_id(&self, id: &str) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.id == id)
    }

    /// Destinations whose country contains `country`, ignoring case.
    pub fn destinations_by_country(&self, country: &str) -> Vec<Destination> {
        self.destinations
            .iter()
            .filter(|d| contains_ignore_case(&d.country, country))
            .cloned()
            .collect()
    }

    /// Destinations whose continent contains `continent`, ignoring case.
    pub fn destinations_by_continent(&self, continent: &str) -> Vec<Destination> {
        self.destinations
            .iter()
            .filter(|d| contains_ignore_case(&d.continent, continent))
            .cloned()
            .collect()
    }

    /// The `limit` best-rated destinations. Equal ratings keep catalogue
    /// order.
    pub fn featured(&self, limit: Option<u32>) -> Vec<Destination> {
        let limit = limit.unwrap_or(DEFAULT_FEATURED_LIMIT) as usize;

        let mut sorted = self.destinations.clone();
        sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating));
        sorted.truncate(limit);
        sorted
    }

    /// Records an inquiry with a fresh id and the current time.
    pub fn submit_inquiry(&mut self, inquiry: NewInquiry) -> Inquiry {
        let stored = Inquiry {
            id: Uuid::new_v4().to_string(),
            name: inquiry.name,
            email: inquiry.email,
            destination: inquiry.destination,
            message: inquiry.message,
            created_at: Utc::now(),
        };

        info!(id = %stored.id, destination = %stored.destination, "Inquiry kept in memory");
        self.inquiries.push(stored.clone());
        stored
    }

    /// Inquiries in submission order.
    pub fn inquiries(&self) -> &[Inquiry] {
        &self.inquiries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalogue() {
        let store = FallbackStore::default();
        assert_eq!(store.destinations().len(), 6);
        assert!(store.inquiries().is_empty());
        assert_eq!(store.destination_by_id("4").unwrap().name, "Tokyo");
        assert!(store.destination_by_id("99").is_none());
    }

    #[test]
    fn test_featured() {
        let store = FallbackStore::seeded();

        let top = store.featured(Some(1));
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "Tokyo");

        let names: Vec<String> = store.featured(None).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Tokyo", "Bali", "New York"]);

        let all = store.featured(Some(10));
        assert_eq!(all.len(), 6);
        assert!(all.windows(2).all(|w| w[0].rating >= w[1].rating));

        assert!(store.featured(Some(0)).is_empty());
        assert_eq!(store.featured(Some(u32::MAX)).len(), 6);
        assert_eq!(store.destinations()[0].name, "Bali");
    }

    #[test]
    fn test_filters_are_case_insensitive_substrings() {
        let store = FallbackStore::seeded();

        let asia: Vec<String> = store
            .destinations_by_continent("asia")
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(asia, vec!["Bali", "Tokyo"]);

        assert_eq!(store.destinations_by_continent("america").len(), 1);
        assert_eq!(store.destinations_by_country("JAPAN")[0].name, "Tokyo");
        assert!(store.destinations_by_country("Peru").is_empty());
    }

    #[test]
    fn test_submit_inquiry_appends() {
        let mut store = FallbackStore::seeded();

        let first = store.submit_inquiry(NewInquiry::new(
            "Ada",
            "ada@example.com",
            "Cairo",
            "Pyramid tour for two",
        ));
        let second = store.submit_inquiry(NewInquiry::new(
            "Grace",
            "grace@example.com",
            "Sydney",
            "Harbour views in December",
        ));

        assert_ne!(first.id, second.id);
        assert_eq!(store.inquiries().len(), 2);
        assert_eq!(store.inquiries()[0], first);
        assert_eq!(store.inquiries()[1].name, "Grace");
    }
}
