//! # Cashier Commands
//!
//! The session lifecycle controller.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create_cashier ──► CashierSession::open ──► store.create ──┐          │
//! │                                                              │          │
//! │  close_cashier ──┐                                           │          │
//! │  on_add_sale ────┤                                           │          │
//! │  on_edit_sale ───┼──► mutator ──► persist_edit ──► store.update         │
//! │  record_cash_... ┘                     ▲                     │          │
//! │  edit_cashier ─── canonicalize ────────┘                     │          │
//! │                                                              ▼          │
//! │  get_all_cashiers ──► store.read_all ──────────► OutcomePublisher       │
//! │                                                   (reduce + broadcast)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutating operation holds the service's mutation lock from the
//! moment it reads the state until its outcome is published, so two
//! concurrent mutations never start from the same snapshot. Read-all takes
//! the same lock, since its outcome replaces the state wholesale.

use std::sync::Arc;

use cashdesk_core::session::with_sale_edited;
use cashdesk_core::{
    CashMovement, CashierPayload, CashierSession, CoreError, DisplayFormatter, Money, SaleRecord,
};
use cashdesk_db::CashierStore;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::outcome::{CashierOutcome, OutcomePublisher};
use crate::state::SessionStore;

/// Orchestrates cashier sessions against storage.
pub struct CashierService {
    store: Arc<dyn CashierStore>,
    state: SessionStore,
    publisher: OutcomePublisher,
    formatter: Arc<dyn DisplayFormatter>,
    mutation: Mutex<()>,
}

impl CashierService {
    pub fn new(
        store: Arc<dyn CashierStore>,
        state: SessionStore,
        formatter: Arc<dyn DisplayFormatter>,
    ) -> Self {
        let publisher = OutcomePublisher::new(state.clone());
        CashierService {
            store,
            state,
            publisher,
            formatter,
            mutation: Mutex::new(()),
        }
    }

    /// The session state this service reduces outcomes into.
    pub fn state(&self) -> &SessionStore {
        &self.state
    }

    /// Subscribes to every outcome published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CashierOutcome> {
        self.publisher.subscribe()
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Opens a new session with `initial` in the drawer.
    ///
    /// A storage failure is reported as `CreateFailure`; invalid input is an
    /// error and publishes nothing.
    pub async fn create_cashier(&self, initial: Money) -> ApiResult<CashierOutcome> {
        debug!(initial = %initial, "create_cashier command");
        let _guard = self.mutation.lock().await;

        let user = self.authenticated_user()?;
        let mut session = CashierSession::open(initial, &user, self.formatter.now())
            .map_err(|e| self.rejected("create_cashier", e))?;

        let outcome = match self.store.create(&session).await {
            Ok(id) => {
                session.id = Some(id);
                info!(cashier_id = id, open_by = %user, "Cashier session opened");
                CashierOutcome::CreateSuccess(session)
            }
            Err(e) => {
                let message = ApiError::from(e).message;
                warn!(error = %message, "Failed to open cashier session");
                CashierOutcome::CreateFailure(message)
            }
        };

        Ok(self.publisher.publish(outcome))
    }

    // =========================================================================
    // Read all
    // =========================================================================

    /// Loads every stored session into the state.
    ///
    /// Holds the mutation lock across the read and the publish: the outcome
    /// replaces the whole state, so a mutation must not commit in between.
    pub async fn get_all_cashiers(&self) -> ApiResult<CashierOutcome> {
        debug!("get_all_cashiers command");
        let _guard = self.mutation.lock().await;

        let outcome = match self.store.read_all().await {
            Ok(sessions) => {
                debug!(count = sessions.len(), "Cashier sessions loaded");
                CashierOutcome::GetAllSuccess(sessions)
            }
            Err(e) => {
                warn!(error = %e, "Failed to read cashier sessions");
                CashierOutcome::GetAllFailure
            }
        };

        Ok(self.publisher.publish(outcome))
    }

    // =========================================================================
    // Edit
    // =========================================================================

    /// Persists a session as given, after canonicalizing it.
    ///
    /// `operations` may arrive as JSON text or as a list, totals as numbers
    /// or numeric text. The session's open/closed status is preserved.
    pub async fn edit_cashier(&self, payload: CashierPayload) -> ApiResult<CashierOutcome> {
        debug!(cashier_id = ?payload.id, "edit_cashier command");
        let _guard = self.mutation.lock().await;

        let session = CashierSession::try_from(payload).map_err(|e| self.rejected("edit_cashier", e))?;

        Ok(self.persist_edit(session).await)
    }

    /// Closes the current session as the authenticated user.
    pub async fn close_cashier(&self) -> ApiResult<CashierOutcome> {
        debug!("close_cashier command");
        let _guard = self.mutation.lock().await;

        let current = self.current_session()?;
        let user = self.authenticated_user()?;
        let closed = current.close(&user).map_err(|e| self.rejected("close_cashier", e))?;

        let outcome = self.persist_edit(closed).await;
        if outcome.is_success() {
            info!(cashier_id = ?current.id, closed_by = %user, "Cashier session closed");
        }
        Ok(outcome)
    }

    /// Records a new sale in the current session.
    pub async fn on_add_sale(&self, sale: &SaleRecord) -> ApiResult<CashierOutcome> {
        debug!(sale_id = %sale.id, "on_add_sale command");
        let _guard = self.mutation.lock().await;

        let current = self.current_session()?;
        let updated = current
            .with_sale_added(sale)
            .map_err(|e| self.rejected("on_add_sale", e))?;

        Ok(self.persist_edit(updated).await)
    }

    /// Applies an edited sale to whichever session owns it, current or past.
    pub async fn on_edit_sale(&self, sale: &SaleRecord) -> ApiResult<CashierOutcome> {
        debug!(sale_id = %sale.id, "on_edit_sale command");
        let _guard = self.mutation.lock().await;

        let (current, past) = self
            .state
            .with_state(|state| (state.current.clone(), state.past.clone()));

        let updated = with_sale_edited(current.as_ref(), &past, sale)
            .map_err(|e| self.rejected("on_edit_sale", e))?;

        Ok(self.persist_edit(updated).await)
    }

    /// Records money put into or taken out of the drawer.
    pub async fn record_cash_movement(&self, movement: &CashMovement) -> ApiResult<CashierOutcome> {
        debug!(kind = ?movement.kind, amount = %movement.amount, "record_cash_movement command");
        let _guard = self.mutation.lock().await;

        let current = self.current_session()?;
        let updated = current
            .with_cash_movement(movement)
            .map_err(|e| self.rejected("record_cash_movement", e))?;

        Ok(self.persist_edit(updated).await)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// The single write path for existing sessions. Caller holds the lock.
    async fn persist_edit(&self, session: CashierSession) -> CashierOutcome {
        let outcome = match self.store.update(&session).await {
            Ok(()) => {
                debug!(
                    cashier_id = ?session.id,
                    operation_count = session.operations.len(),
                    total_profit = %session.total_profit,
                    "Cashier session saved"
                );
                CashierOutcome::EditSuccess(session)
            }
            Err(e) => {
                let message = ApiError::from(e).message;
                warn!(cashier_id = ?session.id, error = %message, "Failed to save cashier session");
                CashierOutcome::EditFailure(message)
            }
        };

        self.publisher.publish(outcome)
    }

    fn current_session(&self) -> ApiResult<CashierSession> {
        self.state
            .with_state(|state| state.current.clone())
            .ok_or_else(|| self.rejected("current_session", CoreError::NoOpenSession))
    }

    fn authenticated_user(&self) -> ApiResult<String> {
        self.state
            .with_state(|state| state.user.clone())
            .filter(|user| !user.trim().is_empty())
            .ok_or_else(|| ApiError::validation("No authenticated user"))
    }

    fn rejected(&self, command: &str, err: CoreError) -> ApiError {
        error!(command, error = %err, "Cashier command rejected");
        ApiError::from(err)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
