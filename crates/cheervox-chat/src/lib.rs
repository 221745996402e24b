//! Chat input for cheervox.
//!
//! [`ChatSource`] is the seam the server drives; [`TwitchChat`] implements it
//! with an anonymous IRC connection that maps cheers, subscriptions, gifts,
//! raids and messages onto [`ChatEvent`]s.

pub mod error;
pub mod event;
pub mod message;
pub mod twitch;

pub use error::ChatError;
pub use event::chat_event;
pub use message::IrcMessage;
pub use twitch::{TwitchChat, DEFAULT_IRC_ADDR};

use async_trait::async_trait;
use cheervox_types::ChatEvent;
use tokio::sync::mpsc;

/// A live stream of chat events for one channel.
#[async_trait]
pub trait ChatSource: Send + Sync {
    /// Joins `channel` (in IRC form, e.g. `#streamer`) and forwards events to
    /// `events` until the connection ends.
    ///
    /// Returns `Ok(())` only when the receiving side of `events` has gone
    /// away. Every other ending is an error; callers do not reconnect on
    /// their own.
    async fn stream(&self, channel: &str, events: mpsc::Sender<ChatEvent>) -> Result<(), ChatError>;
}
