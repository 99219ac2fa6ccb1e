//! # Session State
//!
//! The current session, the past sessions and the acting user.
//!
//! ## Reducer
//! ```text
//! ┌──────────────────┬──────────────────────────────────────────────────────┐
//! │ Outcome          │ Effect                                               │
//! ├──────────────────┼──────────────────────────────────────────────────────┤
//! │ CreateSuccess(s) │ old current → front of past; current = s             │
//! │ GetAllSuccess(v) │ newest open session → current; rest → past, newest   │
//! │                  │ first                                                │
//! │ EditSuccess(s)   │ s is current: closed → front of past, else replace   │
//! │                  │ s is past: replace in place                          │
//! │                  │ s unseen: current if it is the newest open session,  │
//! │                  │ else into past by id                                 │
//! │ *Failure         │ last_error = message                                 │
//! └──────────────────┴──────────────────────────────────────────────────────┘
//! ```

use cashdesk_core::CashierSession;
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

use crate::outcome::CashierOutcome;

/// Message stored when reading sessions fails (that outcome carries none).
const READ_FAILED: &str = "Could not read cashier sessions";

/// Snapshot of the session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// The authenticated user, recorded as opener or closer.
    pub user: Option<String>,

    /// The open session accepting operations.
    pub current: Option<CashierSession>,

    /// Every other session, newest first.
    pub past: Vec<CashierSession>,

    /// Message of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
}

impl SessionState {
    /// Folds an outcome into the state.
    pub fn apply(&mut self, outcome: &CashierOutcome) {
        match outcome {
            CashierOutcome::CreateSuccess(session) => {
                if let Some(previous) = self.current.take() {
                    self.past.insert(0, previous);
                }
                self.current = Some(session.clone());
                self.last_error = None;
            }

            CashierOutcome::GetAllSuccess(sessions) => {
                let mut all = sessions.clone();
                all.sort_by(|a, b| b.id.cmp(&a.id));

                let current_index = all.iter().position(CashierSession::is_open);
                self.current = current_index.map(|index| all.remove(index));
                self.past = all;
                self.last_error = None;
            }

            CashierOutcome::EditSuccess(session) => {
                self.apply_edit(session);
                self.last_error = None;
            }

            CashierOutcome::CreateFailure(message) | CashierOutcome::EditFailure(message) => {
                self.last_error = Some(message.clone());
            }

            CashierOutcome::GetAllFailure => {
                self.last_error = Some(READ_FAILED.to_string());
            }
        }
    }

    fn apply_edit(&mut self, session: &CashierSession) {
        let is_current = matches!(&self.current, Some(current) if current.id == session.id);

        if is_current {
            if session.is_open() {
                self.current = Some(session.clone());
            } else {
                self.current = None;
                self.past.insert(0, session.clone());
            }
            return;
        }

        if let Some(past) = self.past.iter_mut().find(|past| past.id == session.id) {
            *past = session.clone();
            return;
        }

        // Unseen session: place it as read-all would.
        let newest_open = match &self.current {
            Some(current) => session.is_open() && session.id > current.id,
            None => session.is_open(),
        };
        if newest_open {
            if let Some(previous) = self.current.replace(session.clone()) {
                self.past.insert(0, previous);
            }
            return;
        }

        let index = self
            .past
            .iter()
            .position(|past| past.id < session.id)
            .unwrap_or(self.past.len());
        self.past.insert(index, session.clone());
    }
}

/// Shared handle to the session state.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store acting as `user`.
    pub fn with_user(user: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_user(user);
        store
    }

    pub fn set_user(&self, user: impl Into<String>) {
        self.with_state_mut(|state| state.user = Some(user.into()));
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> SessionState {
        self.with_state(SessionState::clone)
    }

    /// Reduces an outcome into the state.
    pub fn apply(&self, outcome: &CashierOutcome) {
        self.with_state_mut(|state| state.apply(outcome));
    }

    /// Runs `f` with read access to the state.
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SessionState) -> R,
    {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn with_state_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SessionState) -> R,
    {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashdesk_core::{DisplayStamp, Money};
    use chrono::Utc;

    fn session(id: i64, closed_by: Option<&str>) -> CashierSession {
        let mut session =
            CashierSession::open(Money::from_cents(1000), "alice", DisplayStamp::plain(Utc::now())).unwrap();
        session.id = Some(id);
        session.closed_by = closed_by.map(str::to_string);
        session
    }

    fn past_ids(state: &SessionState) -> Vec<i64> {
        state.past.iter().filter_map(|s| s.id).collect()
    }

    #[test]
    fn test_create_moves_previous_current_to_past() {
        let mut state = SessionState::default();
        state.apply(&CashierOutcome::CreateSuccess(session(1, None)));
        state.apply(&CashierOutcome::CreateSuccess(session(2, None)));

        assert_eq!(state.current.as_ref().and_then(|s| s.id), Some(2));
        assert_eq!(past_ids(&state), vec![1]);
    }

    #[test]
    fn test_get_all_picks_newest_open_session() {
        let mut state = SessionState::default();
        state.apply(&CashierOutcome::GetAllSuccess(vec![
            session(1, Some("bob")),
            session(3, None),
            session(2, None),
            session(4, Some("bob")),
        ]));

        assert_eq!(state.current.as_ref().and_then(|s| s.id), Some(3));
        assert_eq!(past_ids(&state), vec![4, 2, 1]);
    }

    #[test]
    fn test_get_all_with_only_closed_sessions() {
        let mut state = SessionState::default();
        state.current = Some(session(9, None));
        state.apply(&CashierOutcome::GetAllSuccess(vec![session(1, Some("bob"))]));

        assert!(state.current.is_none());
        assert_eq!(past_ids(&state), vec![1]);
    }

    #[test]
    fn test_edit_of_current_session() {
        let mut state = SessionState::default();
        state.apply(&CashierOutcome::CreateSuccess(session(5, None)));

        let mut edited = session(5, None);
        edited.total_profit = Money::from_cents(4000);
        state.apply(&CashierOutcome::EditSuccess(edited));
        assert_eq!(state.current.as_ref().unwrap().total_profit.cents(), 4000);

        state.apply(&CashierOutcome::EditSuccess(session(5, Some("bob"))));
        assert!(state.current.is_none());
        assert_eq!(past_ids(&state), vec![5]);
    }

    #[test]
    fn test_edit_of_past_session_replaces_in_place() {
        let mut state = SessionState::default();
        state.apply(&CashierOutcome::GetAllSuccess(vec![
            session(3, None),
            session(2, Some("bob")),
            session(1, Some("bob")),
        ]));

        let mut edited = session(2, Some("bob"));
        edited.total_profit = Money::from_cents(4000);
        state.apply(&CashierOutcome::EditSuccess(edited));

        assert_eq!(past_ids(&state), vec![2, 1]);
        assert_eq!(state.past[0].total_profit.cents(), 4000);
        assert_eq!(state.current.as_ref().and_then(|s| s.id), Some(3));
    }

    #[test]
    fn test_failures_set_and_successes_clear_last_error() {
        let mut state = SessionState::default();
        state.apply(&CashierOutcome::CreateFailure("disk full".to_string()));
        assert_eq!(state.last_error.as_deref(), Some("disk full"));

        state.apply(&CashierOutcome::GetAllFailure);
        assert_eq!(state.last_error.as_deref(), Some(READ_FAILED));

        state.apply(&CashierOutcome::GetAllSuccess(Vec::new()));
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_store_is_shared_between_clones() {
        let store = SessionStore::with_user("alice");
        let other = store.clone();
        other.apply(&CashierOutcome::CreateSuccess(session(1, None)));

        let snapshot = store.snapshot();
        assert_eq!(snapshot.user.as_deref(), Some("alice"));
        assert!(snapshot.current.is_some());
    }

    #[test]
    fn test_edit_of_unseen_open_session_becomes_current() {
        let mut state = SessionState::default();
        state.apply(&CashierOutcome::EditSuccess(session(7, None)));
        assert_eq!(state.current.as_ref().and_then(|s| s.id), Some(7));
        assert!(state.past.is_empty());

        state.apply(&CashierOutcome::EditSuccess(session(9, None)));
        assert_eq!(state.current.as_ref().and_then(|s| s.id), Some(9));
        assert_eq!(past_ids(&state), vec![7]);
    }

    #[test]
    fn test_edit_of_unseen_older_session_goes_to_past_in_order() {
        let mut state = SessionState::default();
        state.apply(&CashierOutcome::GetAllSuccess(vec![
            session(6, None),
            session(5, Some("bob")),
            session(2, Some("bob")),
        ]));

        state.apply(&CashierOutcome::EditSuccess(session(4, None)));
        state.apply(&CashierOutcome::EditSuccess(session(1, Some("bob"))));

        assert_eq!(state.current.as_ref().and_then(|s| s.id), Some(6));
        assert_eq!(past_ids(&state), vec![5, 4, 2, 1]);
    }
}
