//! # Error Types
//!
//! Domain-specific error types for cashdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cashdesk-core errors (this file)                                      │
//! │  ├── CoreError        - Session rule violations, corrupt data          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cashdesk-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  App errors                                                             │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Caller       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The serialized operations of a session could not be parsed.
    ///
    /// ## When This Occurs
    /// - The stored `operations` column was written by something else
    /// - A payload carried a truncated or hand-edited JSON string
    ///
    /// This is a data-integrity violation and is never silently replaced
    /// by an empty operation list.
    #[error("Malformed cashier operations: {reason}")]
    MalformedOperations { reason: String },

    /// No session (current or past) owns a revenue-bearing operation with
    /// the given sale id.
    ///
    /// ## User Workflow
    /// ```text
    /// Edit sale "s9"
    ///      │
    ///      ▼
    /// Search current session ──► not found
    ///      │
    ///      ▼
    /// Search past sessions ────► not found
    ///      │
    ///      ▼
    /// OwningSessionNotFound { sale_id: "s9" }
    /// ```
    #[error("No cashier session owns sale {sale_id}")]
    OwningSessionNotFound { sale_id: String },

    /// An operation that needs the current session ran while none is open.
    #[error("No cashier session is open")]
    NoOpenSession,

    /// The session was already closed by someone.
    #[error("Cashier session {session} was closed by {closed_by}")]
    SessionClosed { session: String, closed_by: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a MalformedOperations error from a serde_json failure.
    pub fn malformed(err: serde_json::Error) -> Self {
        CoreError::MalformedOperations {
            reason: err.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Amount does not fit the money representation.
    #[error("{field} is out of range")]
    OutOfRange { field: String },

    /// Invalid format (e.g., a total that is not a number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OwningSessionNotFound {
            sale_id: "s9".to_string(),
        };
        assert_eq!(err.to_string(), "No cashier session owns sale s9");

        let err = CoreError::SessionClosed {
            session: "7".to_string(),
            closed_by: "bob".to_string(),
        };
        assert_eq!(err.to_string(), "Cashier session 7 was closed by bob");
    }

    #[test]
    fn test_malformed_wraps_serde_message() {
        let serde_err = serde_json::from_str::<Vec<u8>>("[1,").unwrap_err();
        let err = CoreError::malformed(serde_err);
        assert!(err.to_string().starts_with("Malformed cashier operations:"));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "openBy".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
