use cheervox_types::SPEECH_END_DEBOUNCE;
use std::time::{Duration, Instant};

/// Trailing-edge debounce over the assistant's speech lifecycle.
///
/// A speech-ended signal only counts when the assistant was marked as
/// speaking, so duplicate end signals are dropped outright. Each counted end
/// (re)arms a deadline one window out; a speech-start before the deadline
/// cancels it. The turn advances when the deadline passes in silence.
#[derive(Debug, Clone)]
pub struct TurnDispatcher {
    window: Duration,
    speaking: bool,
    deadline: Option<Instant>,
}

impl TurnDispatcher {
    pub fn new() -> Self {
        Self::with_window(SPEECH_END_DEBOUNCE)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            speaking: false,
            deadline: None,
        }
    }

    pub fn speech_started(&mut self) {
        self.speaking = true;
        self.deadline = None;
    }

    /// Records a speech-ended signal. Returns `false` if it was ignored
    /// because the assistant was not marked as speaking.
    pub fn speech_ended(&mut self, now: Instant) -> bool {
        if !self.speaking {
            return false;
        }
        self.speaking = false;
        self.deadline = Some(now + self.window);
        true
    }

    /// Returns `true` exactly once when an armed window has elapsed while the
    /// assistant stayed silent.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                !self.speaking
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn reset(&mut self) {
        self.speaking = false;
        self.deadline = None;
    }
}

impl Default for TurnDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
