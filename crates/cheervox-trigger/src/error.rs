//! Error types for trigger classification.

/// Errors that can occur while classifying a chat event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriggerError {
    /// The configured minimum bits is below one, which disables every trigger.
    #[error("min bits must be greater than or equal to 1 (configured: {0})")]
    MinBitsBelowOne(u32),
}
