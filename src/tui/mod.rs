//! Terminal user interface using Ratatui.

mod app;
mod backend;
mod compose;
mod debug_log;
mod input;
mod key_prompt;
mod log_capture;
mod messages;
mod roster;
mod ui;
mod welcome;

pub use app::{run, TuiOptions};
pub use log_capture::LogBuffer;
