use crate::dispatcher::TurnDispatcher;
use crate::queue::PendingSpeakerQueue;
use cheervox_types::{AssistantEvent, StartedCall};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Phase of the single logical assistant session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No session open and none requested.
    Idle,
    /// A session was requested; waiting for call-start.
    Starting,
    /// Exactly one session is open.
    Active,
}

/// A side effect the coordinator wants performed on the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantCommand {
    StartSession { assistant_id: String },
    SendUserContext { username: String },
    EndSession,
}

/// Point-in-time view of the coordinator, published for status reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub phase: SessionPhase,
    /// Usernames waiting behind the current turn.
    pub queued: usize,
    /// Whether the assistant is currently marked as speaking.
    pub speaking: bool,
    /// The username of the turn in progress, if any.
    pub current: Option<String>,
    /// The call backing the session, once the assistant reported it.
    pub call: Option<StartedCall>,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            queued: 0,
            speaking: false,
            current: None,
            call: None,
        }
    }
}

/// Reconciles the speaker queue with the assistant session.
///
/// Owns the queue and the turn dispatcher exclusively. Every method is a
/// synchronous transition that returns the command (if any) the caller must
/// execute; nothing here awaits.
#[derive(Debug)]
pub struct SessionCoordinator {
    assistant_id: String,
    phase: SessionPhase,
    queue: PendingSpeakerQueue,
    dispatcher: TurnDispatcher,
    current: Option<String>,
    call: Option<StartedCall>,
}

impl SessionCoordinator {
    pub fn new(assistant_id: impl Into<String>) -> Self {
        Self::with_dispatcher(assistant_id, TurnDispatcher::new())
    }

    pub fn with_dispatcher(assistant_id: impl Into<String>, dispatcher: TurnDispatcher) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            phase: SessionPhase::Idle,
            queue: PendingSpeakerQueue::new(),
            dispatcher,
            current: None,
            call: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn queue(&self) -> &PendingSpeakerQueue {
        &self.queue
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            phase: self.phase,
            queued: self.queue.len(),
            speaking: self.dispatcher.is_speaking(),
            current: self.current.clone(),
            call: self.call.clone(),
        }
    }

    /// When the debounce timer next needs to be polled.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            SessionPhase::Active => self.dispatcher.deadline(),
            _ => None,
        }
    }

    /// Appends an accepted username. Requests a session when none is open or
    /// starting, which also retries after an earlier start failure.
    pub fn enqueue(&mut self, username: impl Into<String>) -> Option<AssistantCommand> {
        let username = username.into();
        info!(username = %username, phase = ?self.phase, "queued username");
        self.queue.enqueue(username);

        if self.phase != SessionPhase::Idle {
            return None;
        }
        self.phase = SessionPhase::Starting;
        Some(AssistantCommand::StartSession {
            assistant_id: self.assistant_id.clone(),
        })
    }

    /// Applies a lifecycle signal from the assistant.
    pub fn handle_event(&mut self, event: AssistantEvent, now: Instant) -> Option<AssistantCommand> {
        match event {
            AssistantEvent::SpeechStart => {
                if self.phase == SessionPhase::Active {
                    self.dispatcher.speech_started();
                }
                None
            }
            AssistantEvent::SpeechEnd => {
                if self.phase == SessionPhase::Active && !self.dispatcher.speech_ended(now) {
                    debug!("speech end without matching speech start, ignoring");
                }
                None
            }
            AssistantEvent::CallStart { call_id } => match self.phase {
                SessionPhase::Starting => {
                    if self.is_other_call(call_id.as_deref()) {
                        debug!(call_id = ?call_id, "call start for another call, ignoring");
                        return None;
                    }
                    info!(queued = self.queue.len(), call_id = ?call_id, "assistant session ready");
                    if self.call.is_none() {
                        self.call = call_id.map(|call_id| StartedCall {
                            call_id,
                            join_url: None,
                        });
                    }
                    self.phase = SessionPhase::Active;
                    self.advance()
                }
                SessionPhase::Active => {
                    debug!("duplicate call start, ignoring");
                    None
                }
                SessionPhase::Idle => {
                    warn!("call start while idle, ignoring");
                    None
                }
            },
            AssistantEvent::CallEnd { call_id } => {
                // While starting, only an end naming the requested call counts;
                // anything else is the tail of an earlier call.
                let ours = match self.phase {
                    SessionPhase::Idle => false,
                    SessionPhase::Starting => matches!(
                        (call_id.as_deref(), &self.call),
                        (Some(id), Some(call)) if id == call.call_id
                    ),
                    SessionPhase::Active => !self.is_other_call(call_id.as_deref()),
                };
                if ours {
                    info!(
                        queued = self.queue.len(),
                        call_id = ?call_id,
                        "assistant session ended externally, keeping queue"
                    );
                    self.go_idle();
                } else if self.phase != SessionPhase::Idle {
                    debug!(call_id = ?call_id, phase = ?self.phase, "call end for another call, ignoring");
                }
                None
            }
            AssistantEvent::Error { message } => {
                warn!(error = %message, "assistant reported an error");
                None
            }
        }
    }

    /// Advances the turn if the debounce window has elapsed.
    pub fn poll_turn(&mut self, now: Instant) -> Option<AssistantCommand> {
        if self.phase == SessionPhase::Active && self.dispatcher.poll(now) {
            self.advance()
        } else {
            None
        }
    }

    /// The assistant created the call requested by the last `StartSession`.
    pub fn session_created(&mut self, call: StartedCall) {
        if self.phase == SessionPhase::Idle {
            debug!(call_id = %call.call_id, "call created after the session closed");
            return;
        }
        if let Some(known) = &self.call {
            if known.call_id != call.call_id {
                warn!(
                    expected = %known.call_id,
                    created = %call.call_id,
                    "created call differs from the one that started"
                );
            }
        }
        match &call.join_url {
            Some(url) => info!(call_id = %call.call_id, join_url = %url, "assistant call created"),
            None => info!(call_id = %call.call_id, "assistant call created"),
        }
        self.call = Some(call);
    }

    /// The session failed to start. The queue is kept for the next attempt.
    pub fn start_failed(&mut self) -> Option<AssistantCommand> {
        if self.phase == SessionPhase::Starting {
            info!(queued = self.queue.len(), "session start failed, returning to idle");
            self.phase = SessionPhase::Idle;
        }
        None
    }

    /// Delivering `username` failed. That turn is lost; move on so the rest
    /// of the queue is not stuck behind it.
    pub fn send_failed(&mut self, username: &str) -> Option<AssistantCommand> {
        if self.phase != SessionPhase::Active || self.current.as_deref() != Some(username) {
            return None;
        }
        warn!(username, "dropping turn after failed delivery");
        self.dispatcher.reset();
        self.advance()
    }

    /// Closes any open or starting session.
    pub fn shutdown(&mut self) -> Option<AssistantCommand> {
        if self.phase == SessionPhase::Idle {
            return None;
        }
        self.go_idle();
        Some(AssistantCommand::EndSession)
    }

    fn advance(&mut self) -> Option<AssistantCommand> {
        match self.queue.pop_front() {
            Some(username) => {
                info!(username = %username, remaining = self.queue.len(), "starting turn");
                self.current = Some(username.clone());
                Some(AssistantCommand::SendUserContext { username })
            }
            None => {
                info!("queue drained, ending session");
                self.go_idle();
                Some(AssistantCommand::EndSession)
            }
        }
    }

    fn go_idle(&mut self) {
        self.phase = SessionPhase::Idle;
        self.current = None;
        self.call = None;
        self.dispatcher.reset();
    }

    /// Whether `call_id` names a call other than the one this session holds.
    /// Unnamed events, or events arriving before the call is known, are not
    /// attributed to another call.
    fn is_other_call(&self, call_id: Option<&str>) -> bool {
        match (call_id, &self.call) {
            (Some(id), Some(call)) => id != call.call_id,
            _ => false,
        }
    }
}
