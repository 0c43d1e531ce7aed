//! In-memory chat room: roster, message log and the assistant hand-off.
//!
//! Nothing here leaves the process. The only "other user" is the assistant,
//! whose replies are fed back in through [`ChatRoom::receive_ai_reply`].

use crate::models::{Message, Session, ASSISTANT_NAME, SYSTEM_AUTHOR};

/// Prefix that routes a message to the assistant.
const AI_PREFIX: &str = "@ai ";

/// Return the assistant prompt if `text` starts with `@ai ` (any case).
pub fn ai_prompt(text: &str) -> Option<&str> {
    let head = text.get(..AI_PREFIX.len())?;
    if head.eq_ignore_ascii_case(AI_PREFIX) {
        Some(&text[AI_PREFIX.len()..])
    } else {
        None
    }
}

/// State of one room visit.
pub struct ChatRoom {
    session: Session,
    users: Vec<String>,
    messages: Vec<Message>,
    /// Outstanding assistant requests.
    pending_ai: usize,
}

impl ChatRoom {
    /// Enter a room: seed the roster and post the welcome notice.
    pub fn open(session: Session) -> Self {
        let users = vec![session.username.clone(), ASSISTANT_NAME.to_string()];
        let welcome = Message::new(
            SYSTEM_AUTHOR,
            format!(
                "Welcome {}! You've joined room {}. Try asking the AI Assistant a question \
                 by starting your message with '@ai'.",
                session.username, session.room_code
            ),
        );
        tracing::info!(room = %session.room_code, user = %session.username, "joined room");
        Self {
            session,
            users,
            messages: vec![welcome],
            pending_ai: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn username(&self) -> &str {
        &self.session.username
    }

    pub fn room_code(&self) -> &str {
        &self.session.room_code
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether the typing indicator should be shown.
    pub fn is_ai_typing(&self) -> bool {
        self.pending_ai > 0
    }

    /// Post a message as the current user.
    ///
    /// Returns the prompt to forward to the assistant when the message is
    /// addressed to it.
    pub fn send(&mut self, text: &str) -> Option<String> {
        let message = Message::new(self.session.username.clone(), text);
        tracing::debug!(id = message.id, "message posted");
        self.messages.push(message);

        let prompt = ai_prompt(text)?.to_string();
        self.pending_ai += 1;
        tracing::debug!(pending = self.pending_ai, "forwarding prompt to assistant");
        Some(prompt)
    }

    /// Post the assistant's reply. Replies land in arrival order.
    pub fn receive_ai_reply(&mut self, text: impl Into<String>) {
        self.messages.push(Message::new(ASSISTANT_NAME, text));
        self.pending_ai = self.pending_ai.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> ChatRoom {
        ChatRoom::open(Session::new("alice", "lobby").unwrap())
    }

    #[test]
    fn test_open_seeds_roster_and_welcome() {
        let room = room();
        assert_eq!(room.users(), &["alice".to_string(), "AI Assistant".to_string()]);
        assert_eq!(room.messages().len(), 1);
        let welcome = &room.messages()[0];
        assert!(welcome.is_system());
        assert!(welcome.text.contains("Welcome alice!"));
        assert!(welcome.text.contains("room LOBBY"));
        assert!(!room.is_ai_typing());
    }

    #[test]
    fn test_plain_message_appends_once() {
        let mut room = room();
        assert_eq!(room.send("hello there"), None);
        assert_eq!(room.messages().len(), 2);
        let last = room.messages().last().unwrap();
        assert_eq!(last.user, "alice");
        assert_eq!(last.text, "hello there");
        assert!(!room.is_ai_typing());
    }

    #[test]
    fn test_ai_message_round_trip() {
        let mut room = room();
        let prompt = room.send("@ai what is rust?");
        assert_eq!(prompt.as_deref(), Some("what is rust?"));
        assert_eq!(room.messages().len(), 2);
        assert_eq!(room.messages()[1].user, "alice");
        assert!(room.is_ai_typing());

        room.receive_ai_reply("A systems language.");
        assert_eq!(room.messages().len(), 3);
        let reply = &room.messages()[2];
        assert!(reply.is_assistant());
        assert_eq!(reply.text, "A systems language.");
        assert!(!room.is_ai_typing());
    }

    #[test]
    fn test_typing_until_all_replies_arrive() {
        let mut room = room();
        room.send("@ai one");
        room.send("@AI two");
        room.receive_ai_reply("first");
        assert!(room.is_ai_typing());
        room.receive_ai_reply("second");
        assert!(!room.is_ai_typing());
        let texts: Vec<&str> = room.messages()[3..].iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_ai_prefix_detection() {
        assert_eq!(ai_prompt("@ai hi"), Some("hi"));
        assert_eq!(ai_prompt("@Ai hi"), Some("hi"));
        assert_eq!(ai_prompt("@ai"), None);
        assert_eq!(ai_prompt("@aihi"), None);
        assert_eq!(ai_prompt("hey @ai hi"), None);
        assert_eq!(ai_prompt("é"), None);
    }

    #[test]
    fn test_message_ids_increase() {
        let mut room = room();
        room.send("a");
        room.send("b");
        let ids: Vec<u64> = room.messages().iter().map(|m| m.id).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
