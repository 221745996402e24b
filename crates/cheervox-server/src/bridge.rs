//! Wiring between the chat stream, the coordinator, and the assistant.
//!
//! A [`Bridge`] runs at most one generation at a time: a coordinator task plus
//! a chat task feeding it. Replacing the trigger configuration stops the
//! current generation and starts a fresh one from `Idle`, carrying only the
//! recency history across.

use cheervox_chat::ChatSource;
use cheervox_session::{spawn_coordinator, CoordinatorHandle, CoordinatorInput, SessionStatus};
use cheervox_trigger::{RecencySuppressor, TriggerGate};
use cheervox_types::{AssistantEvent, InvalidTriggerConfig, TriggerConfig};
use cheervox_voice::{AssistantClient, VapiClient, VapiConfig, VoiceError};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Chat events buffered between the chat connection and the coordinator.
const CHAT_CHANNEL_SIZE: usize = 64;

/// Builds the assistant client for a trigger configuration.
pub type ClientFactory =
    Arc<dyn Fn(&TriggerConfig) -> Result<Arc<dyn AssistantClient>, VoiceError> + Send + Sync>;

/// A factory producing [`VapiClient`]s that authenticate with the
/// configuration's credential.
pub fn vapi_client_factory(vapi: VapiConfig) -> ClientFactory {
    Arc::new(move |config: &TriggerConfig| {
        let client = VapiClient::new(vapi.clone(), config.assistant_credential.clone())?;
        Ok(Arc::new(client) as Arc<dyn AssistantClient>)
    })
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid trigger configuration: {0}")]
    InvalidConfig(#[from] InvalidTriggerConfig),

    #[error("failed to create assistant client: {0}")]
    Assistant(#[from] VoiceError),
}

/// Reported by `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeStatus {
    /// Whether a generation is running. False until the configuration is
    /// complete.
    pub running: bool,
    pub channel: Option<String>,
    #[serde(flatten)]
    pub session: SessionStatus,
}

struct Generation {
    coordinator: CoordinatorHandle,
    chat_task: JoinHandle<()>,
}

struct BridgeState {
    config: TriggerConfig,
    running: Option<Generation>,
    /// Recency history kept while nothing is running.
    suppressor: RecencySuppressor,
}

pub struct Bridge {
    chat: Arc<dyn ChatSource>,
    client_factory: ClientFactory,
    state: Mutex<BridgeState>,
}

impl Bridge {
    pub fn new(chat: Arc<dyn ChatSource>, client_factory: ClientFactory) -> Self {
        Self {
            chat,
            client_factory,
            state: Mutex::new(BridgeState {
                config: TriggerConfig::default(),
                running: None,
                suppressor: RecencySuppressor::new(),
            }),
        }
    }

    /// The active trigger configuration.
    pub async fn config(&self) -> TriggerConfig {
        self.state.lock().await.config.clone()
    }

    /// Replaces the trigger configuration and resets.
    ///
    /// Any open session is ended and the chat connection is dropped. A new
    /// generation starts only when the configuration is complete.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::InvalidConfig`] for a malformed channel name and
    /// [`BridgeError::Assistant`] if the assistant client cannot be built.
    /// Either way the running generation is left untouched.
    pub async fn apply_config(&self, config: TriggerConfig) -> Result<(), BridgeError> {
        config.validate()?;
        let client = if config.is_complete() {
            Some((self.client_factory)(&config)?)
        } else {
            None
        };

        let mut state = self.state.lock().await;
        if let Some(generation) = state.running.take() {
            info!(channel = %state.config.channel_name, "configuration changed, resetting");
            if let Some(suppressor) = stop(generation).await {
                state.suppressor = suppressor;
            }
        }
        state.config = config;

        let Some(client) = client else {
            info!("configuration incomplete, waiting for channel and assistant settings");
            return Ok(());
        };
        let suppressor = std::mem::take(&mut state.suppressor);
        let gate = TriggerGate::with_suppressor(state.config.clone(), suppressor);
        state.running = Some(self.start(gate, client));
        Ok(())
    }

    fn start(&self, gate: TriggerGate, client: Arc<dyn AssistantClient>) -> Generation {
        let channel = gate.config().irc_channel();
        info!(channel = %channel, assistant_id = %gate.config().assistant_id, "starting bridge");

        let coordinator = spawn_coordinator(gate, client);
        let inputs = coordinator.sender();
        let chat = Arc::clone(&self.chat);

        let chat_task = tokio::spawn(async move {
            let (events_tx, mut events_rx) = mpsc::channel(CHAT_CHANNEL_SIZE);
            let forward = async move {
                while let Some(event) = events_rx.recv().await {
                    if inputs.send(CoordinatorInput::Chat(event)).await.is_err() {
                        break;
                    }
                }
            };
            let (result, ()) = tokio::join!(chat.stream(&channel, events_tx), forward);
            match result {
                Ok(()) => info!(channel = %channel, "chat stream closed"),
                Err(e) => error!(
                    channel = %channel,
                    error = %e,
                    "chat stream ended; update the configuration to reconnect"
                ),
            }
        });

        Generation {
            coordinator,
            chat_task,
        }
    }

    /// Hands an assistant lifecycle event to the running coordinator.
    /// Dropped when nothing is running.
    pub async fn forward_assistant_event(&self, event: AssistantEvent) {
        let sender = {
            let state = self.state.lock().await;
            state.running.as_ref().map(|g| g.coordinator.sender())
        };
        match sender {
            Some(sender) => {
                if sender.send(CoordinatorInput::Assistant(event)).await.is_err() {
                    warn!("coordinator stopped, dropping assistant event");
                }
            }
            None => warn!(?event, "no session running, dropping assistant event"),
        }
    }

    pub async fn status(&self) -> BridgeStatus {
        let state = self.state.lock().await;
        match &state.running {
            Some(generation) => BridgeStatus {
                running: true,
                channel: Some(state.config.irc_channel()),
                session: generation.coordinator.status(),
            },
            None => BridgeStatus {
                running: false,
                channel: None,
                session: SessionStatus::default(),
            },
        }
    }

    /// Stops the running generation, ending any open session.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        if let Some(generation) = state.running.take() {
            if let Some(suppressor) = stop(generation).await {
                state.suppressor = suppressor;
            }
            info!("bridge stopped");
        }
    }
}

async fn stop(generation: Generation) -> Option<RecencySuppressor> {
    generation.chat_task.abort();
    let gate = generation.coordinator.shutdown().await?;
    Some(gate.into_suppressor())
}
