//! # State Module
//!
//! Session state of the running app.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐                                       │
//! │  │        SessionStore          │  Arc<Mutex<SessionState>>             │
//! │  │  user                        │                                       │
//! │  │  current: Option<Session>    │◄── OutcomePublisher::publish          │
//! │  │  past: Vec<Session>          │      └── SessionState::apply          │
//! │  │  last_error                  │                                       │
//! │  └──────────────────────────────┘                                       │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Reads clone a snapshot under the lock                               │
//! │  • Only the reducer mutates session fields                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod session;

pub use session::{SessionState, SessionStore};
