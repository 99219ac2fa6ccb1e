//! # Session Mutator
//!
//! Pure state transitions of a cashier session.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Lifecycle                                 │
//! │                                                                         │
//! │  1. OPEN                                                               │
//! │     └── CashierSession::open() → { closedBy: "-", totals: 0, ops: [] } │
//! │                                                                         │
//! │  2. RECORD                                                             │
//! │     └── with_sale_added()      → ops = [new, ...ops], profit recomputed│
//! │     └── with_cash_movement()   → ops = [new, ...ops], income/outcome   │
//! │     └── with_sale_edited()     → owning session, entry replaced        │
//! │                                                                         │
//! │  3. CLOSE                                                              │
//! │     └── close(user)            → { closedBy: user }                    │
//! │                                                                         │
//! │  Open ──────────────► Closed   (no way back)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function returns a new session; none persists anything.

use crate::display::DisplayStamp;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::operations::{is_sale_with_id, total_profit};
use crate::types::{CashMovement, CashierOperation, CashierSession, MovementKind, SaleRecord};
use crate::validation::{validate_initial_amount, validate_movement_amount, validate_sale_id, validate_username};

impl CashierSession {
    /// Builds a fresh open session with zeroed totals and no operations.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use cashdesk_core::{CashierSession, DisplayStamp, Money};
    ///
    /// let stamp = DisplayStamp::plain(Utc::now());
    /// let session = CashierSession::open(Money::from_cents(10000), "alice", stamp).unwrap();
    /// assert!(session.is_open());
    /// assert!(session.operations.is_empty());
    /// ```
    pub fn open(initial: Money, opened_by: &str, stamp: DisplayStamp) -> CoreResult<Self> {
        validate_initial_amount(initial)?;
        validate_username("openBy", opened_by)?;

        Ok(CashierSession {
            id: None,
            initial_money_cashier: initial,
            timestamp_text: stamp.timestamp_text,
            date_to_show: stamp.date_to_show,
            open_by: opened_by.trim().to_string(),
            closed_by: None,
            total_outcome: Money::zero(),
            total_income: Money::zero(),
            total_profit: Money::zero(),
            operations: Vec::new(),
            opened_at: stamp.opened_at,
        })
    }

    /// Returns true while nobody has closed the session.
    pub fn is_open(&self) -> bool {
        self.closed_by.is_none()
    }

    /// Returns true if a revenue-bearing operation carries `sale_id`.
    pub fn owns_sale(&self, sale_id: &str) -> bool {
        self.operations
            .iter()
            .any(|operation| is_sale_with_id(operation, sale_id))
    }

    /// Prepends the sale's table row and recomputes `totalProfit`.
    ///
    /// `[a, b]` plus sale `s` becomes `[s, a, b]`.
    pub fn with_sale_added(&self, sale: &SaleRecord) -> CoreResult<Self> {
        self.ensure_open()?;
        validate_sale_id(&sale.id)?;

        let mut next = self.clone();
        next.operations.insert(0, CashierOperation::from(sale));
        next.total_profit = total_profit(&next.operations)?;
        Ok(next)
    }

    /// Replaces the revenue-bearing entry whose id matches the sale.
    ///
    /// Every other entry keeps its value and position.
    pub fn with_sale_replaced(&self, sale: &SaleRecord) -> CoreResult<Self> {
        let mut next = self.clone();
        for operation in next.operations.iter_mut() {
            if is_sale_with_id(operation, &sale.id) {
                *operation = CashierOperation::from(sale);
            }
        }
        next.total_profit = total_profit(&next.operations)?;
        Ok(next)
    }

    /// Prepends a cash movement and adds it to `totalIncome` or `totalOutcome`.
    pub fn with_cash_movement(&self, movement: &CashMovement) -> CoreResult<Self> {
        self.ensure_open()?;
        validate_movement_amount(movement.amount)?;

        let mut next = self.clone();
        next.operations.insert(0, CashierOperation::from(movement));
        let (total, field) = match movement.kind {
            MovementKind::AddMoney => (&mut next.total_income, "totalIncome"),
            MovementKind::TakeMoney => (&mut next.total_outcome, "totalOutcome"),
        };
        *total = total
            .checked_add(movement.amount)
            .ok_or_else(|| ValidationError::OutOfRange { field: field.to_string() })?;
        next.total_profit = total_profit(&next.operations)?;
        Ok(next)
    }

    /// Returns a copy closed by `user`. Totals and operations are untouched.
    pub fn close(&self, user: &str) -> CoreResult<Self> {
        self.ensure_open()?;
        validate_username("closedBy", user)?;

        let mut next = self.clone();
        next.closed_by = Some(user.trim().to_string());
        Ok(next)
    }

    fn ensure_open(&self) -> CoreResult<()> {
        match &self.closed_by {
            None => Ok(()),
            Some(user) => Err(CoreError::SessionClosed {
                session: self.reference(),
                closed_by: user.clone(),
            }),
        }
    }
}

/// Applies an edited sale to whichever session owns it.
///
/// ## Search Order
/// The current session first, then past sessions in their given order.
/// The first session holding a revenue-bearing operation with the sale's
/// id wins. Closed sessions are searched too: old sales stay editable.
///
/// ## Errors
/// `CoreError::OwningSessionNotFound` when no session owns the sale.
pub fn with_sale_edited(
    current: Option<&CashierSession>,
    past: &[CashierSession],
    sale: &SaleRecord,
) -> CoreResult<CashierSession> {
    validate_sale_id(&sale.id)?;

    let owner = current
        .into_iter()
        .chain(past.iter())
        .find(|session| session.owns_sale(&sale.id))
        .ok_or_else(|| CoreError::OwningSessionNotFound {
            sale_id: sale.id.clone(),
        })?;

    owner.with_sale_replaced(sale)
}

// =============================================================================
// Unit Tests
// =============================================================================
