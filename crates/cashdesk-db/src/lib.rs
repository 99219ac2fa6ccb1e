//! # cashdesk-db: Database Layer for Cashdesk
//!
//! This crate stores cashier sessions in SQLite through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cashdesk Data Flow                               │
//! │                                                                         │
//! │  CashierService (apps/cashdesk)                                        │
//! │       │   Arc<dyn CashierStore>                                         │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   cashdesk-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────────┐  ┌──────────────┐ │   │
//! │  │   │   Database    │    │  CashierRepository│  │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │◄───│  create / update  │  │  (embedded)  │ │   │
//! │  │   │  SqlitePool   │    │  read_all         │  │ 001_cashiers │ │   │
//! │  │   └───────────────┘    └───────────────────┘  └──────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ~/.local/share/cashdesk/cashdesk.db                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - The cashier repository
//! - [`store`] - The `CashierStore` seam used by the lifecycle controller
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cashdesk_db::{CashierStore, Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/cashdesk.db")).await?;
//! let sessions = db.cashiers().read_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::cashier::CashierRepository;
pub use store::{CashierStore, StoreOperation};
