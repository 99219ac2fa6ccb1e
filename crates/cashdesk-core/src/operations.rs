//! # Operations
//!
//! Classifier, profit aggregator and the codec for a session's operations.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  stored "operations" (TEXT)  ──► normalize_operations ──► Vec<Op>       │
//! │                                                                         │
//! │  Vec<Op> ──► filter(is_revenue_bearing) ──► Σ profit ──► totalProfit    │
//! │                                                                         │
//! │  Vec<Op> ──► encode_operations ──► stored "operations" (TEXT)           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The in-memory representation is always a `Vec<CashierOperation>`; text
//! only exists at the storage and payload boundary.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::CashierOperation;

// =============================================================================
// Classifier
// =============================================================================

/// Returns true iff the operation is a sale or a budget consolidation payment.
pub fn is_revenue_bearing(operation: &CashierOperation) -> bool {
    matches!(
        operation,
        CashierOperation::Sale(_) | CashierOperation::ConsolidateBudgetPayment(_)
    )
}

/// Returns true iff the operation is revenue-bearing and carries `sale_id`.
pub fn is_sale_with_id(operation: &CashierOperation, sale_id: &str) -> bool {
    is_revenue_bearing(operation) && operation.id() == sale_id
}

// =============================================================================
// Aggregator
// =============================================================================

/// Sums profit over the revenue-bearing operations. Empty input is zero.
///
/// A sum that does not fit in `Money` is a validation error.
///
/// ## Example
/// ```rust
/// use cashdesk_core::operations::total_profit;
///
/// assert!(total_profit(&[]).unwrap().is_zero());
/// ```
pub fn total_profit(operations: &[CashierOperation]) -> CoreResult<Money> {
    operations
        .iter()
        .filter(|operation| is_revenue_bearing(operation))
        .map(CashierOperation::profit)
        .try_fold(Money::zero(), Money::checked_add)
        .ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "totalProfit".to_string(),
            }
            .into()
        })
}

// =============================================================================
// Normalizer
// =============================================================================

/// A session's `operations` field in whatever shape it arrived.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationsField {
    /// Serialized JSON text, as stored.
    Encoded(String),
    /// Already a structured sequence.
    Decoded(Vec<CashierOperation>),
    /// Absent or null.
    #[default]
    Missing,
}

/// Coerces an operations field into the canonical sequence.
///
/// - non-empty text is parsed as JSON (malformed text is an error)
/// - a structured sequence is returned unchanged
/// - empty text or a missing field yields an empty sequence
pub fn normalize_operations(field: OperationsField) -> CoreResult<Vec<CashierOperation>> {
    match field {
        OperationsField::Encoded(text) => decode_operations(&text),
        OperationsField::Decoded(operations) => Ok(operations),
        OperationsField::Missing => Ok(Vec::new()),
    }
}

/// Parses stored operations text. Blank text is an empty sequence.
pub fn decode_operations(text: &str) -> CoreResult<Vec<CashierOperation>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(text).map_err(CoreError::malformed)
}

/// Serializes operations for storage.
pub fn encode_operations(operations: &[CashierOperation]) -> CoreResult<String> {
    serde_json::to_string(operations).map_err(CoreError::malformed)
}

// =============================================================================
// Unit Tests
// =============================================================================
