//! Decoding of Vapi server messages into assistant lifecycle events.

use crate::error::VoiceError;
use cheervox_types::AssistantEvent;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Envelope {
    message: ServerMessage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum ServerMessage {
    SpeechUpdate {
        status: String,
        #[serde(default)]
        role: Option<String>,
    },
    StatusUpdate {
        status: String,
        #[serde(default, rename = "endedReason")]
        ended_reason: Option<String>,
        #[serde(default)]
        call: Option<CallRef>,
    },
    Hang,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct CallRef {
    #[serde(default)]
    id: Option<String>,
}

/// Decodes a webhook body.
///
/// Returns `Ok(None)` for well-formed messages that carry no lifecycle
/// meaning (transcripts, user speech, reports, ...).
///
/// # Errors
///
/// Returns [`VoiceError::Decode`] if the body is not a Vapi server message.
pub fn decode_server_message(body: &[u8]) -> Result<Option<AssistantEvent>, VoiceError> {
    let envelope: Envelope = serde_json::from_slice(body)?;

    let event = match envelope.message {
        ServerMessage::SpeechUpdate { status, role } => {
            if role.as_deref().is_some_and(|r| r != "assistant") {
                return Ok(None);
            }
            match status.as_str() {
                "started" => Some(AssistantEvent::SpeechStart),
                "stopped" => Some(AssistantEvent::SpeechEnd),
                _ => None,
            }
        }
        ServerMessage::StatusUpdate {
            status,
            ended_reason,
            call,
        } => {
            let call_id = call.and_then(|c| c.id);
            match status.as_str() {
                "in-progress" => Some(AssistantEvent::CallStart { call_id }),
                "ended" => {
                    if let Some(reason) = ended_reason {
                        tracing::info!(reason = %reason, call_id = ?call_id, "assistant call ended");
                    }
                    Some(AssistantEvent::CallEnd { call_id })
                }
                _ => None,
            }
        }
        ServerMessage::Hang => Some(AssistantEvent::Error {
            message: "assistant stopped responding".to_string(),
        }),
        ServerMessage::Other => None,
    };
    Ok(event)
}
