//! Trigger rules for chat events.
//!
//! Decides which chat events deserve an acknowledgment and keeps the same
//! viewer from being acknowledged twice in quick succession.
//!
//! # Pipeline
//!
//! Every chat event passes through two stages, in order:
//!
//! 1. [`classify`] checks the event against the [`TriggerConfig`] and extracts
//!    the username to acknowledge. It is a pure function.
//! 2. [`RecencySuppressor`] drops usernames that already triggered within the
//!    [`RECENCY_WINDOW`](cheervox_types::RECENCY_WINDOW).
//!
//! [`TriggerGate`] composes both stages behind a single `admit` call and owns
//! the suppressor's state.
//!
//! [`TriggerConfig`]: cheervox_types::TriggerConfig

mod error;
mod filter;
mod gate;
mod recency;

pub use error::TriggerError;
pub use filter::{classify, Classification};
pub use gate::TriggerGate;
pub use recency::RecencySuppressor;
