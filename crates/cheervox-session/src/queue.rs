use std::collections::VecDeque;

/// Usernames awaiting acknowledgment, in the order they were accepted.
///
/// The queue does not deduplicate; the recency window in front of it already
/// keeps a viewer from being accepted twice while waiting.
#[derive(Debug, Clone, Default)]
pub struct PendingSpeakerQueue {
    usernames: VecDeque<String>,
}

impl PendingSpeakerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, username: impl Into<String>) {
        self.usernames.push_back(username.into());
    }

    /// Removes and returns the username that has waited longest.
    pub fn pop_front(&mut self) -> Option<String> {
        self.usernames.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.usernames.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.usernames.iter().map(String::as_str)
    }
}
