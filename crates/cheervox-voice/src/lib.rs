//! Voice-assistant integration for cheervox.
//!
//! The assistant owns everything about speech: the network call, synthesis,
//! and recognition. This crate only exposes the narrow surface the session
//! coordinator needs:
//!
//! - [`AssistantClient`], the command seam (`start_session`,
//!   `send_user_context`, `end_session`);
//! - [`VapiClient`], which implements it against the Vapi REST API;
//! - [`decode_server_message`], which turns Vapi server messages received on
//!   the webhook into [`AssistantEvent`](cheervox_types::AssistantEvent)s.

pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod vapi;

pub use client::{user_context_message, AssistantClient};
pub use config::VapiConfig;
pub use error::VoiceError;
pub use message::decode_server_message;
pub use vapi::VapiClient;
