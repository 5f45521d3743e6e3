//! # Error Types
//!
//! Validation errors for wanderlust-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wanderlust-core errors (this file)                                    │
//! │  └── ValidationError  - Contact form field failures                    │
//! │                                                                         │
//! │  wanderlust-db errors (separate crate)                                 │
//! │  └── StoreError       - Store, HTTP and configuration failures         │
//! │                                                                         │
//! │  Validation errors never reach the store: the caller checks the form   │
//! │  and attaches each message to its input before calling create.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every variant names the field it belongs to so a form can show the
/// message next to the right input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Invalid format (e.g., an email without a domain).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Returns the name of the field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "destination".to_string(),
        };
        assert_eq!(err.to_string(), "destination is required");

        let err = ValidationError::TooShort {
            field: "message".to_string(),
            min: 10,
        };
        assert_eq!(err.to_string(), "message must be at least 10 characters");
    }

    #[test]
    fn test_field_accessor() {
        let err = ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "missing @".to_string(),
        };
        assert_eq!(err.field(), "email");
    }
}
