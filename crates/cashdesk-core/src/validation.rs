//! # Validation Module
//!
//! Input validation for cashier session operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI / payload parsing                                        │
//! │  └── Type validation (clap, serde)                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Session Mutator                                              │
//! │  └── THIS MODULE: amounts, users, sale ids                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL constraints                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashdesk_core::money::Money;
//! use cashdesk_core::validation::{validate_initial_amount, validate_username};
//!
//! validate_initial_amount(Money::from_cents(10000)).unwrap();
//! validate_username("openBy", "alice").unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{CLOSED_BY_UNSET, MAX_USERNAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a user identifier (opener or closer of a session).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most `MAX_USERNAME_LEN` characters
/// - Must not be `"-"`, which marks an open session
///
/// ## Example
/// ```rust
/// use cashdesk_core::validation::validate_username;
///
/// assert!(validate_username("closedBy", "bob").is_ok());
/// assert!(validate_username("closedBy", "").is_err());
/// assert!(validate_username("closedBy", "-").is_err());
/// ```
pub fn validate_username(field: &str, user: &str) -> ValidationResult<()> {
    let user = user.trim();

    if user.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if user.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_USERNAME_LEN,
        });
    }

    if user == CLOSED_BY_UNSET {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("\"{}\" is reserved", CLOSED_BY_UNSET),
        });
    }

    Ok(())
}

/// Validates the id of a sale being recorded or edited.
pub fn validate_sale_id(sale_id: &str) -> ValidationResult<()> {
    if sale_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "saleId".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Amount Validators
// =============================================================================

/// Validates the cash in the drawer when a session opens.
///
/// Zero is allowed; a drawer may start empty.
pub fn validate_initial_amount(amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "initialMoneyCashier".to_string(),
        });
    }
    Ok(())
}

/// Validates the amount of a cash movement. Must be strictly positive.
pub fn validate_movement_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
