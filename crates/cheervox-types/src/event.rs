//! Chat and assistant event types.

use serde::{Deserialize, Serialize};

/// The recipient of a gifted subscription as reported by chat.
///
/// Twitch reports both a display name and a login; either may be missing
/// (mass gifts usually carry neither).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftRecipient {
    pub display_name: Option<String>,
    pub login: Option<String>,
}

impl GiftRecipient {
    pub fn new(display_name: Option<String>, login: Option<String>) -> Self {
        Self {
            display_name,
            login,
        }
    }

    /// Resolves the name to acknowledge: the display name when present and
    /// non-empty, otherwise the login. Returns `None` when neither is usable.
    pub fn resolve(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.login.as_deref().filter(|name| !name.is_empty()))
    }
}

/// A discrete event delivered by the chat stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A viewer cheered bits.
    Cheer { username: String, bits_used: u32 },
    /// A first-time subscription.
    Subscription { username: String },
    /// A repeat subscription.
    Resubscription { username: String },
    /// A subscription gifted to one viewer.
    GiftedSubscription { recipient: GiftRecipient },
    /// A batch of gifted subscriptions announced as one event.
    MassGiftedSubscription { recipient: GiftRecipient },
    /// Another channel raided this one.
    Raid { username: String, viewers: u32 },
    /// A regular chat message.
    Message { username: String, subscriber: bool },
}

impl ChatEvent {
    /// Returns the canonical event type label, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cheer { .. } => "cheer",
            Self::Subscription { .. } => "subscription",
            Self::Resubscription { .. } => "resubscription",
            Self::GiftedSubscription { .. } => "gifted_subscription",
            Self::MassGiftedSubscription { .. } => "mass_gifted_subscription",
            Self::Raid { .. } => "raid",
            Self::Message { .. } => "message",
        }
    }
}

/// A call the assistant opened in response to a start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedCall {
    /// Provider-assigned call identifier. Lifecycle events carrying a
    /// different id belong to another call.
    pub call_id: String,
    /// Where a listener (for example a browser source in the streaming
    /// software) joins the call to hear the assistant.
    pub join_url: Option<String>,
}

/// Lifecycle signals emitted by the voice-assistant client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum AssistantEvent {
    /// The assistant began speaking.
    SpeechStart,
    /// The assistant stopped speaking.
    SpeechEnd,
    /// The session is ready to accept user context.
    CallStart {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        call_id: Option<String>,
    },
    /// The session ended, for whatever reason.
    CallEnd {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        call_id: Option<String>,
    },
    /// The assistant reported an error. Informational only.
    Error { message: String },
}

impl AssistantEvent {
    /// The call a call-start or call-end refers to, when the provider named it.
    pub fn call_id(&self) -> Option<&str> {
        match self {
            Self::CallStart { call_id } | Self::CallEnd { call_id } => call_id.as_deref(),
            _ => None,
        }
    }
}
