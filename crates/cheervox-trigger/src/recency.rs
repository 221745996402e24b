use cheervox_types::RECENCY_WINDOW;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Number of entries above which expired entries are reclaimed.
const EVICTION_THRESHOLD: usize = 10_000;

/// Per-username cooldown store.
///
/// Usernames are compared exactly as received (case-sensitive). An entry that
/// has outlived its window behaves as if it were absent; expired entries are
/// only reclaimed once the store grows past a fixed size, and then at most
/// once per window.
#[derive(Debug, Clone)]
pub struct RecencySuppressor {
    window: Duration,
    last_triggered: HashMap<String, Instant>,
    last_sweep: Option<Instant>,
}

impl RecencySuppressor {
    pub fn new() -> Self {
        Self::with_window(RECENCY_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            last_triggered: HashMap::new(),
            last_sweep: None,
        }
    }

    /// Returns `true` iff `username` triggered less than one window before `now`.
    pub fn should_suppress(&self, username: &str, now: Instant) -> bool {
        self.last_triggered
            .get(username)
            .is_some_and(|&t0| now < t0 + self.window)
    }

    /// Records that `username` triggered at `now`, starting a fresh window.
    pub fn record_trigger(&mut self, username: &str, now: Instant) {
        if self.last_triggered.len() > EVICTION_THRESHOLD && self.sweep_due(now) {
            let window = self.window;
            self.last_triggered
                .retain(|_, t0| now.saturating_duration_since(*t0) < window);
            self.last_sweep = Some(now);
        }
        self.last_triggered.insert(username.to_string(), now);
    }

    /// Everything live at the previous sweep has expired one window later,
    /// so sweeping more often than that reclaims nothing new.
    fn sweep_due(&self, now: Instant) -> bool {
        self.last_sweep
            .map_or(true, |last| now.saturating_duration_since(last) >= self.window)
    }

    /// Checks and records in one step.
    ///
    /// Returns `true` if the username was admitted (and is now recorded), or
    /// `false` if it is still inside its window. A suppressed attempt does not
    /// extend the window.
    pub fn admit(&mut self, username: &str, now: Instant) -> bool {
        if self.should_suppress(username, now) {
            return false;
        }
        self.record_trigger(username, now);
        true
    }

    /// Number of usernames currently tracked, expired or not.
    pub fn len(&self) -> usize {
        self.last_triggered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_triggered.is_empty()
    }
}

impl Default for RecencySuppressor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_username_is_not_suppressed() {
        let suppressor = RecencySuppressor::new();
        assert!(!suppressor.should_suppress("alice", Instant::now()));
    }

    #[test]
    fn suppressed_until_window_elapses() {
        let mut suppressor = RecencySuppressor::new();
        let t0 = Instant::now();
        suppressor.record_trigger("alice", t0);

        assert!(suppressor.should_suppress("alice", t0));
        assert!(suppressor.should_suppress("alice", t0 + Duration::from_millis(59_999)));
        assert!(!suppressor.should_suppress("alice", t0 + Duration::from_millis(60_000)));
    }

    #[test]
    fn usernames_are_case_sensitive() {
        let mut suppressor = RecencySuppressor::new();
        let t0 = Instant::now();
        suppressor.record_trigger("Alice", t0);
        assert!(!suppressor.should_suppress("alice", t0));
    }

    #[test]
    fn admit_records_once_per_window() {
        let mut suppressor = RecencySuppressor::new();
        let t0 = Instant::now();
        assert!(suppressor.admit("alice", t0));
        assert!(!suppressor.admit("alice", t0 + Duration::from_secs(1)));
        assert!(!suppressor.admit("alice", t0 + Duration::from_secs(59)));
        assert!(suppressor.admit("alice", t0 + Duration::from_secs(60)));
    }

    #[test]
    fn suppressed_attempts_do_not_extend_window() {
        let mut suppressor = RecencySuppressor::new();
        let t0 = Instant::now();
        assert!(suppressor.admit("alice", t0));
        assert!(!suppressor.admit("alice", t0 + Duration::from_secs(50)));
        assert!(suppressor.admit("alice", t0 + Duration::from_secs(61)));
    }

    #[test]
    fn eviction_keeps_live_entries() {
        let mut suppressor = RecencySuppressor::with_window(Duration::from_secs(60));
        let t0 = Instant::now();
        for i in 0..=EVICTION_THRESHOLD {
            suppressor.record_trigger(&format!("old-{i}"), t0);
        }
        let later = t0 + Duration::from_secs(30);
        suppressor.record_trigger("fresh", later);

        // Nothing has expired yet, so every entry survives the sweep.
        assert_eq!(suppressor.len(), EVICTION_THRESHOLD + 2);
        assert!(suppressor.should_suppress("old-0", later));

        let much_later = t0 + Duration::from_secs(120);
        suppressor.record_trigger("newest", much_later);
        assert_eq!(suppressor.len(), 1);
        assert!(suppressor.should_suppress("newest", much_later));
        assert!(!suppressor.should_suppress("old-0", much_later));
    }

    #[test]
    fn full_store_is_swept_at_most_once_per_window() {
        let mut suppressor = RecencySuppressor::with_window(Duration::from_secs(60));
        let t0 = Instant::now();
        for i in 0..=EVICTION_THRESHOLD {
            suppressor.record_trigger(&format!("old-{i}"), t0);
        }

        // Sweeps at t0+30 but nothing has expired yet.
        suppressor.record_trigger("a", t0 + Duration::from_secs(30));
        assert_eq!(suppressor.len(), EVICTION_THRESHOLD + 2);

        // The old entries have expired, but the last sweep is too recent.
        suppressor.record_trigger("b", t0 + Duration::from_secs(61));
        assert_eq!(suppressor.len(), EVICTION_THRESHOLD + 3);

        let t1 = t0 + Duration::from_secs(90);
        suppressor.record_trigger("c", t1);
        assert_eq!(suppressor.len(), 2);
        assert!(suppressor.should_suppress("b", t1));
        assert!(suppressor.should_suppress("c", t1));
    }
}
