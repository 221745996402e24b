use crate::filter::classify;
use crate::recency::RecencySuppressor;
use cheervox_types::{ChatEvent, TriggerConfig};
use std::time::Instant;
use tracing::{debug, warn};

/// Filter and suppressor composed into the single admission step that sits
/// in front of the speaker queue.
#[derive(Debug, Clone)]
pub struct TriggerGate {
    config: TriggerConfig,
    suppressor: RecencySuppressor,
}

impl TriggerGate {
    pub fn new(config: TriggerConfig) -> Self {
        Self::with_suppressor(config, RecencySuppressor::new())
    }

    /// Builds a gate that continues an existing recency history, so a
    /// configuration change does not re-admit viewers who were just
    /// acknowledged.
    pub fn with_suppressor(config: TriggerConfig, suppressor: RecencySuppressor) -> Self {
        Self { config, suppressor }
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    pub fn into_suppressor(self) -> RecencySuppressor {
        self.suppressor
    }

    /// Runs `event` through classification and recency suppression.
    ///
    /// Returns the username to enqueue, or `None` if the event does not
    /// qualify, the configuration disables triggering, or the viewer is still
    /// inside the recency window.
    pub fn admit(&mut self, event: &ChatEvent, now: Instant) -> Option<String> {
        let classification = match classify(event, &self.config) {
            Ok(Some(classification)) => classification,
            Ok(None) => {
                debug!(kind = event.kind(), "chat event does not qualify");
                return None;
            }
            Err(e) => {
                warn!(kind = event.kind(), error = %e, "trigger configuration error");
                return None;
            }
        };

        if !self.suppressor.admit(&classification.username, now) {
            debug!(
                username = %classification.username,
                "username still inside recency window, suppressing"
            );
            return None;
        }

        debug!(
            username = %classification.username,
            weight = classification.weight,
            kind = event.kind(),
            "chat event qualifies"
        );
        Some(classification.username)
    }
}
