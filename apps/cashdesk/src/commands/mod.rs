//! # Lifecycle Commands
//!
//! Each command runs one lifecycle operation and resolves to a
//! [`CashierOutcome`](crate::outcome::CashierOutcome):
//!
//! - `create_cashier` - open a session
//! - `get_all_cashiers` - load every stored session
//! - `edit_cashier` - overwrite a stored session
//! - `close_cashier` - close the current session
//! - `on_add_sale` / `on_edit_sale` - apply sales to their session
//! - `record_cash_movement` - add or take money from the drawer

pub mod cashier;

pub use cashier::CashierService;
