//! Trigger configuration snapshot.
//!
//! A `TriggerConfig` is supplied from outside the core (config file or the
//! HTTP API) and treated as read-only for its whole lifetime. Replacing it is
//! a full reset of the chat connection and the assistant session.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The kinds of viewer actions that can be enabled as triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// Cheering bits at or above `min_bits`.
    Bits,
    /// New subscriptions and resubscriptions.
    Subscription,
    /// Single and mass gifted subscriptions (including anonymous gifts).
    GiftedSubscription,
    /// Incoming raids with at least `min_raiders` viewers.
    Raid,
}

impl TriggerKind {
    /// Returns the canonical string label for this trigger.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bits => "bits",
            Self::Subscription => "subscription",
            Self::GiftedSubscription => "gifted_subscription",
            Self::Raid => "raid",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TriggerKind {
    type Err = InvalidTriggerConfig;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bits" => Ok(Self::Bits),
            "subscription" => Ok(Self::Subscription),
            "gifted_subscription" => Ok(Self::GiftedSubscription),
            "raid" => Ok(Self::Raid),
            _ => Err(InvalidTriggerConfig::UnknownTrigger(s.to_string())),
        }
    }
}

/// Errors raised when a configuration snapshot cannot be used at all.
///
/// A `min_bits` below one is accepted here and reported each time an event
/// is classified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTriggerConfig {
    /// The channel name contains characters Twitch never allows.
    #[error("invalid channel name: {0:?}")]
    ChannelName(String),

    /// A trigger label did not match any known trigger.
    #[error("unknown trigger: {0}")]
    UnknownTrigger(String),
}

fn default_min_bits() -> u32 {
    100
}

fn default_min_raiders() -> u32 {
    10
}

fn default_enabled_triggers() -> BTreeSet<TriggerKind> {
    BTreeSet::from([TriggerKind::Bits])
}

/// Immutable trigger configuration snapshot.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Twitch channel to listen to, without the leading `#`.
    #[serde(default)]
    pub channel_name: String,

    /// Smallest cheer that qualifies. Values below one disable every trigger.
    #[serde(default = "default_min_bits")]
    pub min_bits: u32,

    /// Which viewer actions are triggers.
    #[serde(default = "default_enabled_triggers")]
    pub enabled_triggers: BTreeSet<TriggerKind>,

    /// Smallest raid that qualifies when [`TriggerKind::Raid`] is enabled.
    #[serde(default = "default_min_raiders")]
    pub min_raiders: u32,

    /// Treat subscribers' regular chat messages as triggers. Useful for
    /// exercising an assistant without spending bits.
    #[serde(default)]
    pub debug_messages: bool,

    /// Identifier of the assistant to start sessions with.
    #[serde(default)]
    pub assistant_id: String,

    /// Credential used to talk to the assistant service.
    #[serde(default, skip_serializing)]
    pub assistant_credential: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            channel_name: String::new(),
            min_bits: default_min_bits(),
            enabled_triggers: default_enabled_triggers(),
            min_raiders: default_min_raiders(),
            debug_messages: false,
            assistant_id: String::new(),
            assistant_credential: String::new(),
        }
    }
}

impl fmt::Debug for TriggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerConfig")
            .field("channel_name", &self.channel_name)
            .field("min_bits", &self.min_bits)
            .field("enabled_triggers", &self.enabled_triggers)
            .field("min_raiders", &self.min_raiders)
            .field("debug_messages", &self.debug_messages)
            .field("assistant_id", &self.assistant_id)
            .field("assistant_credential", &"[REDACTED]")
            .finish()
    }
}

impl TriggerConfig {
    /// Returns `true` if the given trigger kind is enabled.
    pub fn is_enabled(&self, kind: TriggerKind) -> bool {
        self.enabled_triggers.contains(&kind)
    }

    /// Returns the channel in IRC form: lowercase with a leading `#`.
    pub fn irc_channel(&self) -> String {
        format!(
            "#{}",
            self.channel_name.trim_start_matches('#').to_ascii_lowercase()
        )
    }

    /// Returns `true` when there is enough configuration to listen to chat
    /// and reach the assistant.
    pub fn is_complete(&self) -> bool {
        !self.channel_name.trim_start_matches('#').is_empty()
            && !self.assistant_id.is_empty()
            && !self.assistant_credential.is_empty()
    }

    /// Checks the snapshot for values no channel could ever have.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTriggerConfig::ChannelName`] if the channel name
    /// contains whitespace or IRC separator characters.
    pub fn validate(&self) -> Result<(), InvalidTriggerConfig> {
        let name = self.channel_name.trim_start_matches('#');
        if name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | ':' | '#'))
        {
            return Err(InvalidTriggerConfig::ChannelName(self.channel_name.clone()));
        }
        Ok(())
    }
}
