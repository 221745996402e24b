#![allow(dead_code)]

use async_trait::async_trait;
use cheervox_chat::{ChatError, ChatSource};
use cheervox_server::bridge::{Bridge, BridgeStatus, ClientFactory};
use cheervox_types::{AssistantEvent, ChatEvent, StartedCall, TriggerConfig};
use cheervox_voice::{AssistantClient, VoiceError};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Start(String),
    Send(String),
    End,
}

#[derive(Default)]
pub struct RecordingAssistant {
    calls: Mutex<Vec<Call>>,
}

impl RecordingAssistant {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AssistantClient for RecordingAssistant {
    async fn start_session(&self, assistant_id: &str) -> Result<StartedCall, VoiceError> {
        self.record(Call::Start(assistant_id.to_string()));
        let n = self
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Start(_)))
            .count();
        Ok(StartedCall {
            call_id: format!("call-{n}"),
            join_url: Some(format!("https://rooms.example/call-{n}")),
        })
    }

    async fn send_user_context(&self, username: &str) -> Result<(), VoiceError> {
        self.record(Call::Send(username.to_string()));
        Ok(())
    }

    async fn end_session(&self) -> Result<(), VoiceError> {
        self.record(Call::End);
        Ok(())
    }
}

/// Chat source fed from a broadcast channel the test holds.
pub struct FakeChat {
    events: broadcast::Sender<ChatEvent>,
    joined: Mutex<Vec<String>>,
}

impl FakeChat {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            events,
            joined: Mutex::new(Vec::new()),
        }
    }

    pub fn joined(&self) -> Vec<String> {
        self.joined.lock().unwrap().clone()
    }

    /// Number of chat connections currently listening.
    pub fn listeners(&self) -> usize {
        self.events.receiver_count()
    }

    pub fn emit(&self, event: ChatEvent) {
        self.events.send(event).unwrap();
    }
}

#[async_trait]
impl ChatSource for FakeChat {
    async fn stream(&self, channel: &str, sink: mpsc::Sender<ChatEvent>) -> Result<(), ChatError> {
        let mut events = self.events.subscribe();
        self.joined.lock().unwrap().push(channel.to_string());
        loop {
            match events.recv().await {
                Ok(event) => {
                    if sink.send(event).await.is_err() {
                        return Ok(());
                    }
                }
                Err(_) => return Err(ChatError::Closed("fake chat closed".to_string())),
            }
        }
    }
}

pub fn factory(assistant: &Arc<RecordingAssistant>) -> ClientFactory {
    let assistant = Arc::clone(assistant);
    Arc::new(move |_: &TriggerConfig| Ok(Arc::clone(&assistant) as Arc<dyn AssistantClient>))
}

pub fn complete_config() -> TriggerConfig {
    TriggerConfig {
        channel_name: "Streamer".to_string(),
        assistant_id: "asst".to_string(),
        assistant_credential: "sk-test".to_string(),
        ..TriggerConfig::default()
    }
}

pub fn bridge() -> (Arc<Bridge>, Arc<FakeChat>, Arc<RecordingAssistant>) {
    let chat = Arc::new(FakeChat::new());
    let assistant = Arc::new(RecordingAssistant::default());
    let bridge = Arc::new(Bridge::new(chat.clone(), factory(&assistant)));
    (bridge, chat, assistant)
}

pub fn call_start(call_id: &str) -> AssistantEvent {
    AssistantEvent::CallStart {
        call_id: Some(call_id.to_string()),
    }
}

pub fn call_end(call_id: &str) -> AssistantEvent {
    AssistantEvent::CallEnd {
        call_id: Some(call_id.to_string()),
    }
}

pub fn cheer(username: &str) -> ChatEvent {
    ChatEvent::Cheer {
        username: username.to_string(),
        bits_used: 1_000,
    }
}

/// Polls `condition` until it holds, failing the test after two seconds.
pub async fn wait_until<F>(mut condition: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met in time");
}

/// Polls the bridge status until `condition` holds and returns that status.
pub async fn wait_for_status<F>(bridge: &Bridge, mut condition: F) -> BridgeStatus
where
    F: FnMut(&BridgeStatus) -> bool,
{
    for _ in 0..200 {
        let status = bridge.status().await;
        if condition(&status) {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("status condition not met in time");
}
