//! # API Error Type
//!
//! Unified error type for lifecycle commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Cashdesk                               │
//! │                                                                         │
//! │  CashierService method                                                 │
//! │  Result<CashierOutcome, ApiError>                                      │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Storage Error? ─── DbError::QueryFailed("...") ──┐                    │
//! │         │                                         │                    │
//! │         ▼                                         ▼                    │
//! │  Session Rule? ─── CoreError::NoOpenSession ──── ApiError ──► caller   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ──► CashierOutcome ──► caller + subscribers                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cashdesk_core::CoreError;
use cashdesk_db::DbError;
use serde::Serialize;

use crate::config::ConfigError;

/// Error returned from lifecycle commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NO_OPEN_SESSION",
///   "message": "No cashier session is open"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Stored or submitted data could not be decoded
    CorruptData,

    /// Session rule violated
    BusinessLogic,

    /// An operation needed the current session and there is none
    NoOpenSession,

    /// Configuration could not be loaded
    ConfigError,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Corrupted { entity, id, reason } => {
                tracing::error!(entity = %entity, id = %id, "Corrupted row: {}", reason);
                ApiError::new(
                    ErrorCode::CorruptData,
                    format!("Stored {} {} is corrupted", entity, id),
                )
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MalformedOperations { .. } => ApiError::new(ErrorCode::CorruptData, err.to_string()),
            CoreError::OwningSessionNotFound { ref sale_id } => {
                let message = format!("No cashier session owns sale {}", sale_id);
                ApiError::new(ErrorCode::NotFound, message)
            }
            CoreError::NoOpenSession => ApiError::new(ErrorCode::NoOpenSession, err.to_string()),
            CoreError::SessionClosed { .. } => ApiError::new(ErrorCode::BusinessLogic, err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::validation(format!("Invalid JSON: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_codes() {
        let err: ApiError = CoreError::NoOpenSession.into();
        assert_eq!(err.code, ErrorCode::NoOpenSession);

        let err: ApiError = CoreError::OwningSessionNotFound {
            sale_id: "s9".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "No cashier session owns sale s9");
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::validation("amount must be positive");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "amount must be positive");
    }
}
