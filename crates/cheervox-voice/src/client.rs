use crate::error::VoiceError;
use async_trait::async_trait;
use cheervox_types::StartedCall;

/// Command interface of a voice-assistant client.
///
/// Implementations are driven by a single worker task, so calls never
/// overlap. Lifecycle events travel the other way, outside this trait.
#[async_trait]
pub trait AssistantClient: Send + Sync {
    /// Opens a session with the given assistant and returns the call it
    /// created. Resolving successfully does not mean the session is ready;
    /// readiness is signalled by a call-start event.
    async fn start_session(&self, assistant_id: &str) -> Result<StartedCall, VoiceError>;

    /// Hands a username to the assistant as the next user turn.
    async fn send_user_context(&self, username: &str) -> Result<(), VoiceError>;

    /// Ends the current session, if any.
    async fn end_session(&self) -> Result<(), VoiceError>;
}

/// The user-turn text the assistant receives for `username`.
pub fn user_context_message(username: &str) -> String {
    format!("The username is {username}")
}
