use crate::error::TriggerError;
use cheervox_types::{ChatEvent, TriggerConfig, TriggerKind, DEBUG_MESSAGE_WEIGHT};

/// A chat event that qualified as a trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The viewer to acknowledge.
    pub username: String,
    /// How much the event counted for against its threshold.
    pub weight: u32,
}

impl Classification {
    fn new(username: &str, weight: u32) -> Self {
        Self {
            username: username.to_string(),
            weight,
        }
    }
}

/// Decides whether `event` qualifies under `config`.
///
/// Returns `Ok(None)` when the event is well-formed but does not qualify.
/// Subscriptions and gifts always satisfy the bits threshold and are weighted
/// as exactly `min_bits`.
///
/// # Errors
///
/// Returns [`TriggerError::MinBitsBelowOne`] for every event when
/// `config.min_bits` is zero. Callers are expected to log and drop the event.
pub fn classify(
    event: &ChatEvent,
    config: &TriggerConfig,
) -> Result<Option<Classification>, TriggerError> {
    if config.min_bits < 1 {
        return Err(TriggerError::MinBitsBelowOne(config.min_bits));
    }

    let classification = match event {
        ChatEvent::Cheer {
            username,
            bits_used,
        } => (config.is_enabled(TriggerKind::Bits) && *bits_used >= config.min_bits)
            .then(|| Classification::new(username, *bits_used)),

        ChatEvent::Subscription { username } | ChatEvent::Resubscription { username } => config
            .is_enabled(TriggerKind::Subscription)
            .then(|| Classification::new(username, config.min_bits)),

        ChatEvent::GiftedSubscription { recipient }
        | ChatEvent::MassGiftedSubscription { recipient } => {
            if config.is_enabled(TriggerKind::GiftedSubscription) {
                recipient
                    .resolve()
                    .map(|name| Classification::new(name, config.min_bits))
            } else {
                None
            }
        }

        ChatEvent::Raid { username, viewers } => (config.is_enabled(TriggerKind::Raid)
            && *viewers >= config.min_raiders)
            .then(|| Classification::new(username, *viewers)),

        ChatEvent::Message {
            username,
            subscriber,
        } => (config.debug_messages && *subscriber && DEBUG_MESSAGE_WEIGHT >= config.min_bits)
            .then(|| Classification::new(username, DEBUG_MESSAGE_WEIGHT)),
    };

    Ok(classification.filter(|c| !c.username.is_empty()))
}
