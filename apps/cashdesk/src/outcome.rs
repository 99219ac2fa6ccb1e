//! # Lifecycle Outcomes
//!
//! Every lifecycle operation ends in exactly one outcome. The publisher
//! folds it into the session state, then broadcasts it.
//!
//! ```text
//! CashierService ──► OutcomePublisher::publish(outcome)
//!                         │
//!                         ├── 1. SessionStore::apply(&outcome)   (reducer)
//!                         │
//!                         └── 2. broadcast::Sender::send(outcome)
//!                                   │
//!                                   ├──► subscriber (CLI printer)
//!                                   └──► subscriber (tests)
//! ```
//!
//! Applying before sending means a subscriber that reads the store on
//! receipt always sees the state the outcome produced.

use cashdesk_core::CashierSession;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::state::SessionStore;

/// Default capacity of the outcome channel.
pub const OUTCOME_CHANNEL_CAPACITY: usize = 64;

/// Result of a lifecycle operation as seen by subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CashierOutcome {
    CreateSuccess(CashierSession),
    CreateFailure(String),
    GetAllSuccess(Vec<CashierSession>),
    /// Read-all failures carry no detail.
    GetAllFailure,
    EditSuccess(CashierSession),
    EditFailure(String),
}

impl CashierOutcome {
    /// Outcome name, as used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            CashierOutcome::CreateSuccess(_) => "CREATE_SUCCESS",
            CashierOutcome::CreateFailure(_) => "CREATE_FAILURE",
            CashierOutcome::GetAllSuccess(_) => "GET_ALL_SUCCESS",
            CashierOutcome::GetAllFailure => "GET_ALL_FAILURE",
            CashierOutcome::EditSuccess(_) => "EDIT_SUCCESS",
            CashierOutcome::EditFailure(_) => "EDIT_FAILURE",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            CashierOutcome::CreateSuccess(_)
                | CashierOutcome::GetAllSuccess(_)
                | CashierOutcome::EditSuccess(_)
        )
    }
}

/// Applies outcomes to the session store and fans them out.
#[derive(Debug, Clone)]
pub struct OutcomePublisher {
    store: SessionStore,
    sender: broadcast::Sender<CashierOutcome>,
}

impl OutcomePublisher {
    pub fn new(store: SessionStore) -> Self {
        let (sender, _) = broadcast::channel(OUTCOME_CHANNEL_CAPACITY);
        OutcomePublisher { store, sender }
    }

    /// Subscribes to every outcome published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CashierOutcome> {
        self.sender.subscribe()
    }

    /// Reduces the outcome into the store, then broadcasts it.
    ///
    /// Having no subscribers is not an error.
    pub fn publish(&self, outcome: CashierOutcome) -> CashierOutcome {
        self.store.apply(&outcome);

        let receivers = self.sender.send(outcome.clone()).unwrap_or(0);
        debug!(outcome = outcome.name(), receivers, "Outcome published");

        outcome
    }
}
