//! Room session model

use thiserror::Error;

/// Validation failure when joining a room.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please enter a username and a room code.")]
    MissingFields,
}

/// Username and room code for one room visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub room_code: String,
}

impl Session {
    /// Build a session from raw form input.
    ///
    /// The username is trimmed; the room code is trimmed and upper-cased.
    pub fn new(username: &str, room_code: &str) -> Result<Self, SessionError> {
        let username = username.trim();
        let room_code = room_code.trim();
        if username.is_empty() || room_code.is_empty() {
            return Err(SessionError::MissingFields);
        }
        Ok(Self {
            username: username.to_string(),
            room_code: room_code.to_uppercase(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_normalizes_input() {
        let s = Session::new("  alice ", " abc12x ").unwrap();
        assert_eq!(s.username, "alice");
        assert_eq!(s.room_code, "ABC12X");
    }

    #[test]
    fn test_session_rejects_blank_fields() {
        assert_eq!(Session::new("", "ROOM"), Err(SessionError::MissingFields));
        assert_eq!(Session::new("bob", "   "), Err(SessionError::MissingFields));
        assert_eq!(
            SessionError::MissingFields.to_string(),
            "Please enter a username and a room code."
        );
    }
}
