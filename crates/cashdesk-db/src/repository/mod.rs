//! # Repository Module
//!
//! Database repository implementations for Cashdesk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CashierService                                                        │
//! │       │  store.update(&session)                                        │
//! │       ▼                                                                 │
//! │  CashierRepository                                                     │
//! │  ├── create(&self, session)   → new id                                 │
//! │  ├── update(&self, session)                                            │
//! │  ├── get_by_id(&self, id)                                              │
//! │  └── read_all(&self)          → newest first                           │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cashier;
