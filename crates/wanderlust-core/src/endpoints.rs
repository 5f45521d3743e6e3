//! # Edge Function Endpoints
//!
//! The HTTP surface of the site's edge functions: path templates, URL
//! building and the JSON envelopes they answer with. The functions
//! themselves are deployed separately; this module only describes them.
//!
//! ## Endpoint Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /destinations                     list                          │
//! │  POST   /destinations                     create                        │
//! │  GET    /destinations/:id                 read one                      │
//! │  PUT    /destinations/:id                 update                        │
//! │  DELETE /destinations/:id                 delete                        │
//! │  GET    /destinations/continent/:continent                              │
//! │  POST   /inquiries                        submit  → { "inquiry": .. }   │
//! │  GET    /inquiries                        list    → { "inquiries": .. } │
//! │  GET    /inquiries/:id                    read    → { "inquiry": .. }   │
//! │  DELETE /inquiries/:id                    delete                        │
//! │                                                                         │
//! │  Failures answer with { "error": "<message>" }                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::types::Inquiry;

// =============================================================================
// Endpoints
// =============================================================================

/// One operation of the edge function surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListDestinations,
    CreateDestination,
    GetDestination,
    UpdateDestination,
    DeleteDestination,
    DestinationsByContinent,
    CreateInquiry,
    ListInquiries,
    GetInquiry,
    DeleteInquiry,
}

impl Endpoint {
    /// Returns the path template, with `:name` placeholders.
    pub const fn template(self) -> &'static str {
        match self {
            Endpoint::ListDestinations | Endpoint::CreateDestination => "/destinations",
            Endpoint::GetDestination
            | Endpoint::UpdateDestination
            | Endpoint::DeleteDestination => "/destinations/:id",
            Endpoint::DestinationsByContinent => "/destinations/continent/:continent",
            Endpoint::CreateInquiry | Endpoint::ListInquiries => "/inquiries",
            Endpoint::GetInquiry | Endpoint::DeleteInquiry => "/inquiries/:id",
        }
    }

    /// Returns the HTTP method name.
    pub const fn method(self) -> &'static str {
        match self {
            Endpoint::ListDestinations
            | Endpoint::GetDestination
            | Endpoint::DestinationsByContinent
            | Endpoint::ListInquiries
            | Endpoint::GetInquiry => "GET",
            Endpoint::CreateDestination | Endpoint::CreateInquiry => "POST",
            Endpoint::UpdateDestination => "PUT",
            Endpoint::DeleteDestination | Endpoint::DeleteInquiry => "DELETE",
        }
    }

    /// Builds the full URL for this endpoint.
    ///
    /// ## Example
    /// ```rust
    /// use wanderlust_core::endpoints::Endpoint;
    ///
    /// let url = Endpoint::GetInquiry.url("https://fn.example.com/v1", &[("id", "42")]);
    /// assert_eq!(url, "https://fn.example.com/v1/inquiries/42");
    /// ```
    pub fn url(self, base_url: &str, params: &[(&str, &str)]) -> String {
        build_url(base_url, self.template(), params)
    }
}

/// Joins `base_url` and `template`, then substitutes parameters.
///
/// Each `(key, value)` replaces the first `:key` token literally. Values are
/// not percent-encoded here. Tokens without a matching parameter are left
/// in place.
pub fn build_url(base_url: &str, template: &str, params: &[(&str, &str)]) -> String {
    let mut url = format!("{}{}", base_url.trim_end_matches('/'), template);

    for (key, value) in params {
        let token = format!(":{}", key);
        url = url.replacen(&token, value, 1);
    }

    url
}

// =============================================================================
// Response Envelopes
// =============================================================================

/// `{ "inquiry": { .. } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InquiryEnvelope {
    pub inquiry: Inquiry,
}

/// `{ "inquiries": [ .. ] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InquiryListEnvelope {
    pub inquiries: Vec<Inquiry>,
}

/// `{ "error": "<message>" }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_substitutes_tokens() {
        let url = build_url(
            "https://fn.example.com/functions/v1",
            "/destinations/continent/:continent",
            &[("continent", "Asia")],
        );
        assert_eq!(url, "https://fn.example.com/functions/v1/destinations/continent/Asia");
    }

    #[test]
    fn test_build_url_trailing_slash_and_missing_params() {
        let url = build_url("http://localhost:54321/functions/v1/", "/inquiries/:id", &[]);
        assert_eq!(url, "http://localhost:54321/functions/v1/inquiries/:id");
    }

    #[test]
    fn test_endpoint_methods() {
        assert_eq!(Endpoint::CreateInquiry.method(), "POST");
        assert_eq!(Endpoint::UpdateDestination.method(), "PUT");
        assert_eq!(Endpoint::DeleteInquiry.template(), "/inquiries/:id");
        assert_eq!(
            Endpoint::DeleteDestination.url("http://h", &[("id", "9")]),
            "http://h/destinations/9"
        );
    }

    #[test]
    fn test_error_body_tolerates_missing_field() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.error, None);

        let body: ErrorBody = serde_json::from_str(r#"{"error":"Inquiry not found"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("Inquiry not found"));
    }
}
