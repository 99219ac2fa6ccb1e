//! # Cashier Store
//!
//! The storage seam the lifecycle controller talks to.
//!
//! ```text
//! CashierService ──► Arc<dyn CashierStore> ──► CashierRepository (SQLite)
//!                                         └──► test fakes
//! ```
//!
//! Every call is logged with the entity kind and the event tag of the
//! operation (`CASHIER_CREATE`, `CASHIER_UPDATE`, `CASHIERS_READ`).

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::DbResult;
use crate::repository::cashier::CashierRepository;
use cashdesk_core::CashierSession;

/// Entity kind carried in storage log fields.
pub const ENTITY_KIND: &str = "cashier";

/// The three storage operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Create,
    Update,
    ReadAll,
}

impl StoreOperation {
    /// Operation kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreOperation::Create => "CREATE",
            StoreOperation::Update => "UPDATE",
            StoreOperation::ReadAll => "READ_ALL",
        }
    }

    /// Event tag for the operation.
    pub fn event_tag(&self) -> &'static str {
        match self {
            StoreOperation::Create => "CASHIER_CREATE",
            StoreOperation::Update => "CASHIER_UPDATE",
            StoreOperation::ReadAll => "CASHIERS_READ",
        }
    }
}

/// Persistence of cashier sessions.
#[async_trait]
pub trait CashierStore: Send + Sync {
    /// Persists a new session and returns its assigned id.
    async fn create(&self, session: &CashierSession) -> DbResult<i64>;

    /// Overwrites the stored session with the same id.
    async fn update(&self, session: &CashierSession) -> DbResult<()>;

    /// Returns all stored sessions, newest first.
    async fn read_all(&self) -> DbResult<Vec<CashierSession>>;
}

fn log_result<T>(operation: StoreOperation, result: &DbResult<T>) {
    match result {
        Ok(_) => debug!(
            entity = ENTITY_KIND,
            kind = operation.as_str(),
            event_tag = operation.event_tag(),
            "Storage call succeeded"
        ),
        Err(e) => warn!(
            entity = ENTITY_KIND,
            kind = operation.as_str(),
            event_tag = operation.event_tag(),
            error = %e,
            "Storage call failed"
        ),
    }
}

#[async_trait]
impl CashierStore for CashierRepository {
    async fn create(&self, session: &CashierSession) -> DbResult<i64> {
        let result = CashierRepository::create(self, session).await;
        log_result(StoreOperation::Create, &result);
        result
    }

    async fn update(&self, session: &CashierSession) -> DbResult<()> {
        let result = CashierRepository::update(self, session).await;
        log_result(StoreOperation::Update, &result);
        result
    }

    async fn read_all(&self) -> DbResult<Vec<CashierSession>> {
        let result = CashierRepository::read_all(self).await;
        log_result(StoreOperation::ReadAll, &result);
        result
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
