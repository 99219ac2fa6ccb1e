//! # Domain Types
//!
//! Core domain types used throughout Cashdesk.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────────┐        ┌──────────────────────────────┐  │
//! │  │     CashierSession       │ owns   │      CashierOperation        │  │
//! │  │  ──────────────────────  │───────►│  ──────────────────────────  │  │
//! │  │  id (set by storage)     │  0..n  │  SALE                        │  │
//! │  │  initialMoneyCashier     │        │  CONSOLIDATE_BUDGET_PAYMENT  │  │
//! │  │  openBy / closedBy       │        │  ADD_MONEY                   │  │
//! │  │  totalIncome/Outcome     │        │  TAKE_MONEY                  │  │
//! │  │  totalProfit (derived)   │        └──────────────────────────────┘  │
//! │  └──────────────────────────┘                      ▲                    │
//! │                                                    │ From<&SaleRecord>  │
//! │                                     ┌──────────────┴───────────────┐    │
//! │                                     │  SaleRecord (raw sale input) │    │
//! │                                     └──────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shape
//! Sessions serialize with camelCase keys (`initialMoneyCashier`, `openBy`,
//! `closedBy`, ...). Operations are internally tagged by a `type` field in
//! SCREAMING_SNAKE_CASE. An open session serializes `closedBy` as `"-"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, MoneyInput};
use crate::operations::{normalize_operations, OperationsField};

// =============================================================================
// Cashier Session
// =============================================================================

/// A cash-register work period bounded by open and close.
///
/// ## Invariants
/// - `total_profit` is always the aggregate over revenue-bearing operations
///   (see [`crate::operations::total_profit`]); every mutator recomputes it.
/// - `closed_by == None` means the session is open.
/// - `operations` is ordered most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashierSession {
    /// Assigned by storage on creation. `None` before the first persist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Cash in the drawer when the session was opened.
    pub initial_money_cashier: Money,

    /// Calendar-relative opening time ("Hoje às 08:15").
    #[serde(default)]
    pub timestamp_text: String,

    /// Long opening date ("19 de outubro de 2026").
    #[serde(default)]
    pub date_to_show: String,

    /// User who opened the session.
    pub open_by: String,

    /// User who closed the session, `None` while open.
    #[serde(default, with = "closed_by")]
    pub closed_by: Option<String>,

    pub total_outcome: Money,
    pub total_income: Money,
    pub total_profit: Money,

    /// Session operations, most recent first.
    #[serde(default)]
    pub operations: Vec<CashierOperation>,

    /// When the session was opened.
    #[serde(default = "Utc::now")]
    pub opened_at: DateTime<Utc>,
}

impl CashierSession {
    /// Human-readable session reference for errors and logs.
    pub fn reference(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => "<unsaved>".to_string(),
        }
    }
}

/// Serde adapter for the `closedBy` sentinel.
///
/// `None` is written as `"-"`; `"-"`, `""` and `null` all read back as `None`.
pub mod closed_by {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::CLOSED_BY_UNSET;

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(CLOSED_BY_UNSET))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|user| {
            let user = user.trim();
            if user.is_empty() || user == CLOSED_BY_UNSET {
                None
            } else {
                Some(user.to_string())
            }
        }))
    }
}

// =============================================================================
// Cashier Payload
// =============================================================================

/// A session as it arrives from outside (CLI input, stored JSON, frontend).
///
/// Looser than [`CashierSession`]: `operations` may be a JSON string, an
/// array or absent, and totals may be numbers or numeric text. Converting
/// with `TryFrom` canonicalizes everything before it reaches storage.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashierPayload {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub initial_money_cashier: MoneyInput,
    #[serde(default)]
    pub timestamp_text: String,
    #[serde(default)]
    pub date_to_show: String,
    pub open_by: String,
    #[serde(default, deserialize_with = "closed_by::deserialize")]
    pub closed_by: Option<String>,
    #[serde(default)]
    pub total_outcome: MoneyInput,
    #[serde(default)]
    pub total_income: MoneyInput,
    #[serde(default)]
    pub total_profit: MoneyInput,
    #[serde(default)]
    pub operations: OperationsField,
    #[serde(default = "Utc::now")]
    pub opened_at: DateTime<Utc>,
}

impl TryFrom<CashierPayload> for CashierSession {
    type Error = CoreError;

    fn try_from(payload: CashierPayload) -> CoreResult<Self> {
        Ok(CashierSession {
            id: payload.id,
            initial_money_cashier: payload.initial_money_cashier.to_money("initialMoneyCashier")?,
            timestamp_text: payload.timestamp_text,
            date_to_show: payload.date_to_show,
            open_by: payload.open_by,
            closed_by: payload.closed_by,
            total_outcome: payload.total_outcome.to_money("totalOutcome")?,
            total_income: payload.total_income.to_money("totalIncome")?,
            total_profit: payload.total_profit.to_money("totalProfit")?,
            operations: normalize_operations(payload.operations)?,
            opened_at: payload.opened_at,
        })
    }
}

// =============================================================================
// Cashier Operation
// =============================================================================

/// A single recorded event within a session.
///
/// The wire discriminant is the `type` field:
/// ```json
/// {"type": "SALE", "id": "s1", "total": 80.0, "profit": 25.5}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashierOperation {
    /// A regular sale. Revenue-bearing.
    Sale(SaleRow),
    /// Payment that consolidates a budget into a sale. Revenue-bearing.
    ConsolidateBudgetPayment(SaleRow),
    /// Money put into the drawer outside a sale.
    AddMoney(CashMovementRow),
    /// Money taken out of the drawer outside a sale.
    TakeMoney(CashMovementRow),
}

impl CashierOperation {
    /// The operation id, unique within its session.
    pub fn id(&self) -> &str {
        match self {
            CashierOperation::Sale(row) | CashierOperation::ConsolidateBudgetPayment(row) => &row.id,
            CashierOperation::AddMoney(row) | CashierOperation::TakeMoney(row) => &row.id,
        }
    }

    /// Profit contributed by this operation. Cash movements contribute none.
    pub fn profit(&self) -> Money {
        match self {
            CashierOperation::Sale(row) | CashierOperation::ConsolidateBudgetPayment(row) => row.profit,
            CashierOperation::AddMoney(_) | CashierOperation::TakeMoney(_) => Money::zero(),
        }
    }

    /// Wire name of the operation kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CashierOperation::Sale(_) => "SALE",
            CashierOperation::ConsolidateBudgetPayment(_) => "CONSOLIDATE_BUDGET_PAYMENT",
            CashierOperation::AddMoney(_) => "ADD_MONEY",
            CashierOperation::TakeMoney(_) => "TAKE_MONEY",
        }
    }
}

/// Table-display row of a sale or budget payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRow {
    pub id: String,
    #[serde(default)]
    pub total: Money,
    #[serde(default)]
    pub profit: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timestamp_text: String,
}

impl SaleRow {
    /// Creates a bare row with only an id and a profit.
    pub fn new(id: impl Into<String>, profit: Money) -> Self {
        SaleRow {
            id: id.into(),
            total: Money::zero(),
            profit,
            customer: None,
            payment_method: None,
            timestamp_text: String::new(),
        }
    }
}

/// Table-display row of a cash movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashMovementRow {
    pub id: String,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timestamp_text: String,
}

// =============================================================================
// Sale Record
// =============================================================================

/// Which kind of revenue a sale record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleKind {
    #[default]
    Sale,
    BudgetPayment,
}

/// A raw sale or budget payment, as produced by the sales screens.
///
/// Converted into its table row with `CashierOperation::from(&record)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: String,
    #[serde(default)]
    pub kind: SaleKind,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub total: Money,
    #[serde(default)]
    pub profit: Money,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Sale-to-table-row transform.
impl From<&SaleRecord> for CashierOperation {
    fn from(sale: &SaleRecord) -> Self {
        let row = SaleRow {
            id: sale.id.clone(),
            total: sale.total,
            profit: sale.profit,
            customer: sale.customer.clone(),
            payment_method: sale.payment_method.clone(),
            timestamp_text: sale.created_at.format("%d/%m/%Y %H:%M").to_string(),
        };

        match sale.kind {
            SaleKind::Sale => CashierOperation::Sale(row),
            SaleKind::BudgetPayment => CashierOperation::ConsolidateBudgetPayment(row),
        }
    }
}

// =============================================================================
// Cash Movement
// =============================================================================

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Counts towards `totalIncome`.
    AddMoney,
    /// Counts towards `totalOutcome`.
    TakeMoney,
}

/// Money moved in or out of the drawer outside a sale.
#[derive(Debug, Clone, PartialEq)]
pub struct CashMovement {
    pub id: String,
    pub kind: MovementKind,
    pub amount: Money,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CashMovement {
    /// Creates a movement with a fresh id, stamped now.
    pub fn new(kind: MovementKind, amount: Money, reason: Option<String>) -> Self {
        CashMovement {
            id: Uuid::new_v4().to_string(),
            kind,
            amount,
            reason,
            created_at: Utc::now(),
        }
    }
}

impl From<&CashMovement> for CashierOperation {
    fn from(movement: &CashMovement) -> Self {
        let row = CashMovementRow {
            id: movement.id.clone(),
            amount: movement.amount,
            reason: movement.reason.clone(),
            timestamp_text: movement.created_at.format("%d/%m/%Y %H:%M").to_string(),
        };

        match movement.kind {
            MovementKind::AddMoney => CashierOperation::AddMoney(row),
            MovementKind::TakeMoney => CashierOperation::TakeMoney(row),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sale(id: &str, kind: SaleKind, profit_cents: i64) -> SaleRecord {
        SaleRecord {
            id: id.to_string(),
            kind,
            customer: Some("Maria".to_string()),
            payment_method: Some("cash".to_string()),
            total: Money::from_cents(10000),
            profit: Money::from_cents(profit_cents),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_operation_wire_tag() {
        let op: CashierOperation =
            serde_json::from_str(r#"{"id":"s2","type":"SALE","profit":10}"#).unwrap();
        assert_eq!(op.id(), "s2");
        assert_eq!(op.kind(), "SALE");
        assert_eq!(op.profit(), Money::from_cents(1000));

        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["type"], "SALE");
        assert_eq!(json["profit"], 10.0);
    }

    #[test]
    fn test_sale_record_becomes_matching_row() {
        let op = CashierOperation::from(&sale("s1", SaleKind::Sale, 2550));
        match &op {
            CashierOperation::Sale(row) => {
                assert_eq!(row.profit.cents(), 2550);
                assert_eq!(row.customer.as_deref(), Some("Maria"));
                assert!(!row.timestamp_text.is_empty());
            }
            other => panic!("expected SALE row, got {:?}", other),
        }

        let op = CashierOperation::from(&sale("b1", SaleKind::BudgetPayment, 100));
        assert_eq!(op.kind(), "CONSOLIDATE_BUDGET_PAYMENT");
    }

    #[test]
    fn test_cash_movement_has_no_profit() {
        let movement = CashMovement::new(MovementKind::TakeMoney, Money::from_cents(500), None);
        let op = CashierOperation::from(&movement);
        assert_eq!(op.kind(), "TAKE_MONEY");
        assert!(op.profit().is_zero());
        assert_eq!(op.id(), movement.id);
    }

    #[test]
    fn test_closed_by_sentinel() {
        let session = CashierSession {
            id: None,
            initial_money_cashier: Money::from_cents(10000),
            timestamp_text: String::new(),
            date_to_show: String::new(),
            open_by: "alice".to_string(),
            closed_by: None,
            total_outcome: Money::zero(),
            total_income: Money::zero(),
            total_profit: Money::zero(),
            operations: Vec::new(),
            opened_at: Utc::now(),
        };

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["closedBy"], "-");
        assert_eq!(json["initialMoneyCashier"], 100.0);
        assert!(json.get("id").is_none());

        let back: CashierSession = serde_json::from_value(json).unwrap();
        assert_eq!(back.closed_by, None);
    }

    #[test]
    fn test_payload_canonicalizes_string_operations_and_totals() {
        let payload: CashierPayload = serde_json::from_str(
            r#"{
                "id": 3,
                "initialMoneyCashier": "50",
                "openBy": "bob",
                "closedBy": "bob",
                "totalOutcome": 0,
                "totalIncome": "0",
                "totalProfit": "10",
                "operations": "[{\"id\":\"s2\",\"type\":\"SALE\",\"profit\":10}]"
            }"#,
        )
        .unwrap();

        let session = CashierSession::try_from(payload).unwrap();
        assert_eq!(session.id, Some(3));
        assert_eq!(session.initial_money_cashier.cents(), 5000);
        assert_eq!(session.total_profit.cents(), 1000);
        assert_eq!(session.closed_by.as_deref(), Some("bob"));
        assert_eq!(session.operations.len(), 1);
        assert_eq!(session.operations[0].id(), "s2");
    }

    #[test]
    fn test_payload_rejects_malformed_operations() {
        let payload: CashierPayload = serde_json::from_str(
            r#"{"openBy": "bob", "operations": "[{\"id\":"}"#,
        )
        .unwrap();

        let err = CashierSession::try_from(payload).unwrap_err();
        assert!(matches!(err, CoreError::MalformedOperations { .. }));
    }
}
