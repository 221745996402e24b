//! Serialization of chat triggers into assistant turns.
//!
//! Chat events arrive whenever viewers act; the assistant can only speak
//! about one viewer at a time. This crate turns the former into a strictly
//! sequential series of the latter.
//!
//! # Components
//!
//! - [`PendingSpeakerQueue`]: FIFO of usernames waiting for their turn.
//! - [`TurnDispatcher`]: debounces the assistant's speech-ended signals so a
//!   turn advances at most once per quiet window.
//! - [`SessionCoordinator`]: the `Idle → Starting → Active` state machine.
//!   It performs no I/O; every transition yields at most one
//!   [`AssistantCommand`] for the caller to execute.
//! - [`spawn_coordinator`]: the tokio task that owns all of the above plus the
//!   [`TriggerGate`](cheervox_trigger::TriggerGate), and the worker task that
//!   executes commands against an
//!   [`AssistantClient`](cheervox_voice::AssistantClient) one at a time.
//!
//! # Session lifecycle
//!
//! | From | Signal | To | Command |
//! |------|--------|----|---------|
//! | `Idle` | username enqueued | `Starting` | `StartSession` |
//! | `Starting` | call created | `Starting` | none (call id and join URL recorded) |
//! | `Starting` | start failed | `Idle` | none |
//! | `Starting` | call-start | `Active` | `SendUserContext(front)` |
//! | `Starting` | call-end naming the requested call | `Idle` | none |
//! | `Active` | debounced speech-end, queue non-empty | `Active` | `SendUserContext(next)` |
//! | `Active` | debounced speech-end, queue empty | `Idle` | `EndSession` |
//! | `Active` | call-end, unless it names another call | `Idle` | none |
//!
//! Call-start and call-end events naming a call other than the one recorded
//! for the session are ignored. Any other call-end while `Starting` is taken
//! to belong to the previous call.

mod coordinator;
mod dispatcher;
mod queue;
mod runtime;

pub use coordinator::{AssistantCommand, SessionCoordinator, SessionPhase, SessionStatus};
pub use dispatcher::TurnDispatcher;
pub use queue::PendingSpeakerQueue;
pub use runtime::{spawn_coordinator, CoordinatorHandle, CoordinatorInput};
