//! Chat message model

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Local, Utc};

/// Message identifier: milliseconds since the epoch at creation, bumped so
/// that identifiers never repeat or go backwards within a process.
pub type MessageId = u64;

static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Allocate the next message identifier.
pub fn next_message_id() -> MessageId {
    let now = Utc::now().timestamp_millis().max(0) as u64;
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return candidate,
            Err(current) => last = current,
        }
    }
}

/// Current local time formatted for display (e.g. "09:42").
pub fn display_timestamp() -> String {
    Local::now().format("%H:%M").to_string()
}

/// A single chat message. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    /// Author display name.
    pub user: String,
    pub text: String,
    /// Display timestamp ("HH:MM").
    pub timestamp: String,
}

impl Message {
    /// Create a message stamped with a fresh id and the current time.
    pub fn new(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: next_message_id(),
            user: user.into(),
            text: text.into(),
            timestamp: display_timestamp(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.user == super::SYSTEM_AUTHOR
    }

    pub fn is_assistant(&self) -> bool {
        self.user == super::ASSISTANT_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let ids: Vec<MessageId> = (0..1000).map(|_| next_message_id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_id_tracks_wall_clock() {
        let before = Utc::now().timestamp_millis() as u64;
        let id = next_message_id();
        assert!(id >= before);
    }

    #[test]
    fn test_timestamp_format() {
        let ts = display_timestamp();
        assert_eq!(ts.len(), 5);
        assert_eq!(ts.as_bytes()[2], b':');
    }

    #[test]
    fn test_author_kinds() {
        assert!(Message::new("System", "hi").is_system());
        assert!(Message::new("AI Assistant", "hi").is_assistant());
        let m = Message::new("alice", "hi");
        assert!(!m.is_system() && !m.is_assistant());
    }
}
