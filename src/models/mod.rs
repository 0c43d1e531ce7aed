//! Data models for the chat room

mod message;
mod session;

pub use message::*;
pub use session::*;

/// Author name used for room notices.
pub const SYSTEM_AUTHOR: &str = "System";

/// Display name of the scripted assistant participant.
pub const ASSISTANT_NAME: &str = "AI Assistant";
