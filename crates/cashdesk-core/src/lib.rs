//! # cashdesk-core: Pure Business Logic for Cashdesk
//!
//! This crate holds the rules of a cashier session: what a session contains,
//! how sale and cash operations mutate it, and how its totals are derived.
//! Everything here is a pure function with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cashdesk Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              apps/cashdesk (Lifecycle Controller)               │   │
//! │  │    create, get_all, edit, close, on_add_sale, on_edit_sale      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ cashdesk-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌──────────┐  │   │
//! │  │   │   types   │  │ operations │  │  session  │  │  display │  │   │
//! │  │   │  Session  │  │ classifier │  │  mutator  │  │  stamps  │  │   │
//! │  │   │ Operation │  │ aggregator │  │  add/edit │  │  locale  │  │   │
//! │  │   └───────────┘  │ normalizer │  │  close    │  └──────────┘  │   │
//! │  │                  └────────────┘  └───────────┘                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 cashdesk-db (Database Layer)                    │   │
//! │  │              SQLite cashier table, migrations                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CashierSession, CashierOperation, SaleRecord)
//! - [`money`] - Money type with integer arithmetic
//! - [`operations`] - Classifier, profit aggregator, operations codec
//! - [`session`] - Session mutator (open, add sale, edit sale, close)
//! - [`display`] - Localized display stamps for new sessions
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use cashdesk_core::{CashierOperation, Money, SaleRow};
//! use cashdesk_core::operations::total_profit;
//!
//! let ops = vec![CashierOperation::Sale(SaleRow::new("s1", Money::from_cents(2550)))];
//! assert_eq!(total_profit(&ops).unwrap().cents(), 2550);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod display;
pub mod error;
pub mod money;
pub mod operations;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use display::{DisplayFormatter, DisplayStamp, LocalizedFormatter};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, MoneyInput};
pub use operations::OperationsField;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Wire value of `closedBy` while a session is still open.
pub const CLOSED_BY_UNSET: &str = "-";

/// Maximum length of a user identifier (opener / closer).
pub const MAX_USERNAME_LEN: usize = 100;
