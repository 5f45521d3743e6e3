//! # Validation Module
//!
//! Contact form rules for inquiries.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Contact form (caller)                                        │
//! │  └── THIS MODULE: field rules, one message per input                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Inquiry repository                                           │
//! │  └── No checks. Stores whatever it is handed.                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store schema                                                 │
//! │  └── NOT NULL on every column                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A repository caller that skips Layer 1 can store malformed inquiries.
//!
//! ## Usage
//! ```rust
//! use wanderlust_core::validation::validate_inquiry;
//! use wanderlust_core::NewInquiry;
//!
//! let form = NewInquiry::new("Ada", "ada@example.com", "Paris", "Two weeks in May, please");
//! assert!(validate_inquiry(&form).is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::NewInquiry;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum length of the visitor's name.
pub const MIN_NAME_LEN: usize = 2;

/// Minimum length of the inquiry message.
pub const MIN_MESSAGE_LEN: usize = 10;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates the visitor's name: at least [`MIN_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> ValidationResult<()> {
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::TooShort {
            field: "name".to_string(),
            min: MIN_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - No whitespace
/// - Exactly one `@` with a non-empty local part
/// - Domain has a dot that is neither first nor last
///
/// ## Example
/// ```rust
/// use wanderlust_core::validation::validate_email;
///
/// assert!(validate_email("ada@example.com").is_ok());
/// assert!(validate_email("ada@localhost").is_err());
/// assert!(validate_email("not an email").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @"))?;

    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must be a single address"));
    }

    if domain.starts_with('.') || domain.ends_with('.') || !domain.contains('.') {
        return Err(invalid("domain is incomplete"));
    }

    Ok(())
}

/// Validates the destination selection: must not be empty.
pub fn validate_destination(destination: &str) -> ValidationResult<()> {
    if destination.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "destination".to_string(),
        });
    }

    Ok(())
}

/// Validates the message: at least [`MIN_MESSAGE_LEN`] characters.
pub fn validate_message(message: &str) -> ValidationResult<()> {
    if message.chars().count() < MIN_MESSAGE_LEN {
        return Err(ValidationError::TooShort {
            field: "message".to_string(),
            min: MIN_MESSAGE_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Form Validator
// =============================================================================

/// Validates every field of the contact form.
///
/// Returns all failures at once, in form order, so each input can show its
/// own message.
pub fn validate_inquiry(inquiry: &NewInquiry) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = [
        validate_name(&inquiry.name),
        validate_email(&inquiry.email),
        validate_destination(&inquiry.destination),
        validate_message(&inquiry.message),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
