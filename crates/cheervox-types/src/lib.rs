//! Shared types and constants for the cheervox workspace.
//!
//! This crate provides the foundational types passed between the chat side,
//! the trigger rules, and the assistant session: the trigger configuration
//! snapshot, the chat event variants, and the assistant lifecycle events.
//!
//! Every other crate in the workspace depends on this one; it depends on
//! none of them.

use std::time::Duration;

mod config;
mod event;

pub use config::{InvalidTriggerConfig, TriggerConfig, TriggerKind};
pub use event::{AssistantEvent, ChatEvent, GiftRecipient, StartedCall};

/// How long an accepted username is suppressed from re-triggering.
pub const RECENCY_WINDOW: Duration = Duration::from_secs(60);

/// Trailing window applied to assistant speech-ended signals before a turn
/// is allowed to advance.
pub const SPEECH_END_DEBOUNCE: Duration = Duration::from_secs(5);

/// Weight given to a subscriber's regular chat message when debug triggering
/// is enabled. Compared against `min_bits` like a cheer of this size.
pub const DEBUG_MESSAGE_WEIGHT: u32 = 100;
