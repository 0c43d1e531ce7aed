//! TUI application state and main event loop

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{FutureExt, StreamExt};
use ratatui::DefaultTerminal;

use super::backend::{Backend, BackendCommand, BackendResponse};
use super::compose::ComposeState;
use super::debug_log::DebugLogState;
use super::key_prompt::{KeyPromptAction, KeyPromptState};
use super::log_capture::LogBuffer;
use super::messages::MessagesState;
use super::ui;
use super::welcome::WelcomeForm;
use crate::assistant::AiReply;
use crate::config::{Config, KeySource, ResolvedKey};
use crate::models::Session;
use crate::room::ChatRoom;

/// Target frame rate for UI updates (~30 fps)
const FRAME_DURATION_MS: u64 = 33;

/// Lines moved per PageUp/PageDown.
const PAGE_LINES: usize = 10;

/// Startup options from the command line.
pub struct TuiOptions {
    pub username: Option<String>,
    pub room: Option<String>,
    pub api_key: Option<ResolvedKey>,
    pub config: Config,
}

/// The chat view: one room visit.
pub struct ChatView {
    pub room: ChatRoom,
    pub compose: ComposeState,
    pub messages: MessagesState,
}

/// Which screen is showing.
pub enum Screen {
    Welcome(WelcomeForm),
    Chat(ChatView),
}

/// Application state
pub struct App {
    /// Whether the app should exit
    pub should_exit: bool,
    pub screen: Screen,
    /// Bumped on every join and leave; replies for older generations are dropped.
    pub generation: u64,
    /// Where the active API key came from (None = no key).
    pub key_source: Option<KeySource>,
    /// Open API key popup, if any.
    pub key_prompt: Option<KeyPromptState>,
    pub debug_log: DebugLogState,
    /// Transient status bar message and whether it is an error.
    pub status: Option<(String, bool)>,
    /// Frame counter, drives the typing animation.
    pub tick: u64,
    config: Config,
    outbox: Vec<BackendCommand>,
}

impl App {
    pub fn new(options: &TuiOptions, log_buffer: LogBuffer) -> Self {
        Self {
            should_exit: false,
            screen: Screen::Welcome(WelcomeForm::prefilled(
                options.username.as_deref(),
                options.room.as_deref(),
            )),
            generation: 0,
            key_source: options.api_key.as_ref().map(|k| k.source),
            key_prompt: None,
            debug_log: DebugLogState::new(log_buffer),
            status: None,
            tick: 0,
            config: options.config.clone(),
            outbox: Vec::new(),
        }
    }

    /// Current session, if in a room.
    pub fn session(&self) -> Option<&Session> {
        match &self.screen {
            Screen::Chat(view) => Some(view.room.session()),
            Screen::Welcome(_) => None,
        }
    }

    /// Commands queued for the backend since the last call.
    pub fn drain_commands(&mut self) -> Vec<BackendCommand> {
        std::mem::take(&mut self.outbox)
    }

    /// Enter the chat view for `session`.
    pub fn join(&mut self, session: Session) {
        self.generation += 1;
        self.status = None;
        self.screen = Screen::Chat(ChatView {
            room: ChatRoom::open(session),
            compose: ComposeState::default(),
            messages: MessagesState::default(),
        });
    }

    /// Leave the room: drop the session and every message.
    pub fn leave(&mut self) {
        if let Screen::Chat(view) = &self.screen {
            tracing::info!(room = %view.room.room_code(), "left room");
        }
        self.generation += 1;
        self.status = None;
        self.screen = Screen::Welcome(WelcomeForm::default());
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_exit = true;
            return;
        }
        if key.code == KeyCode::F(12) {
            self.debug_log.toggle();
            return;
        }
        if self.debug_log.visible && ctrl {
            match key.code {
                KeyCode::Up => return self.debug_log.scroll_up(1),
                KeyCode::Down => return self.debug_log.scroll_down(1),
                _ => {}
            }
        }

        if let Some(prompt) = self.key_prompt.as_mut() {
            match prompt.handle_key(key) {
                KeyPromptAction::Pending => {}
                KeyPromptAction::Cancel => self.key_prompt = None,
                KeyPromptAction::Apply { key, save } => {
                    self.key_prompt = None;
                    self.apply_api_key(key, save);
                }
            }
            return;
        }

        match &mut self.screen {
            Screen::Welcome(form) => match key.code {
                KeyCode::Enter => {
                    if let Some(session) = form.submit() {
                        self.join(session);
                    }
                }
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                    form.toggle_focus()
                }
                KeyCode::Char('g') if ctrl => form.create_room(),
                _ => {
                    form.focused_input().handle_key(key);
                }
            },
            Screen::Chat(view) => match key.code {
                KeyCode::Esc => self.leave(),
                KeyCode::Char('l') if ctrl => self.leave(),
                KeyCode::Enter
                    if key
                        .modifiers
                        .intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
                {
                    view.compose.insert_newline()
                }
                KeyCode::Enter => {
                    if let Some(text) = view.compose.send() {
                        view.messages.follow_bottom();
                        if let Some(prompt) = view.room.send(&text) {
                            self.outbox.push(BackendCommand::Ask {
                                generation: self.generation,
                                prompt,
                            });
                        }
                    }
                }
                KeyCode::PageUp => view.messages.scroll_up(PAGE_LINES),
                KeyCode::PageDown => view.messages.scroll_down(PAGE_LINES),
                _ => {
                    view.compose.input.handle_key(key);
                }
            },
        }
    }

    /// Handle a response from the backend.
    pub fn handle_response(&mut self, resp: BackendResponse) {
        match resp {
            BackendResponse::AiReply { generation, reply } => {
                self.receive_ai_reply(generation, reply)
            }
        }
    }

    fn receive_ai_reply(&mut self, generation: u64, reply: AiReply) {
        let view = match &mut self.screen {
            Screen::Chat(view) if generation == self.generation => view,
            _ => {
                tracing::debug!(generation, "dropping reply for a room that was left");
                return;
            }
        };

        view.room.receive_ai_reply(reply.text);
        if reply.offer_key_selection && self.key_prompt.is_none() {
            let reason = if self.key_source.is_some() {
                "The assistant could not use the current API key."
            } else {
                "No API key is configured for the assistant."
            };
            self.key_prompt = Some(KeyPromptState::new(reason));
        }
    }

    fn apply_api_key(&mut self, key: String, save: bool) {
        if save {
            self.config.set_api_key(key.clone());
            match self.config.save() {
                Ok(()) => self.status = Some(("API key saved".to_string(), false)),
                Err(e) => {
                    tracing::error!("saving API key failed: {:#}", e);
                    self.status = Some((format!("Could not save API key: {:#}", e), true));
                }
            }
        } else {
            self.status = Some(("API key set for this session".to_string(), false));
        }
        self.key_source = Some(KeySource::Session);
        self.outbox.push(BackendCommand::SetApiKey { key });
    }

    /// Render the UI
    pub fn render(&self, frame: &mut ratatui::Frame) {
        ui::render(frame, self);
    }
}

/// Run the TUI application with panic-safe terminal restore
pub async fn run(options: TuiOptions, log_buffer: LogBuffer) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = AssertUnwindSafe(run_app(&mut terminal, options, log_buffer))
        .catch_unwind()
        .await;
    ratatui::restore();

    match result {
        Ok(r) => r,
        Err(e) => std::panic::resume_unwind(e),
    }
}

async fn run_app(
    terminal: &mut DefaultTerminal,
    options: TuiOptions,
    log_buffer: LogBuffer,
) -> Result<()> {
    let mut app = App::new(&options, log_buffer);
    let mut backend = Backend::start(
        options.config.assistant_settings(),
        options.api_key.map(|k| k.key),
    );
    let mut events = EventStream::new();
    let mut frame_tick = tokio::time::interval(Duration::from_millis(FRAME_DURATION_MS));

    while !app.should_exit {
        app.debug_log.refresh();
        terminal.draw(|frame| app.render(frame))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(resp) = backend.recv() => app.handle_response(resp),
            _ = frame_tick.tick() => app.tick = app.tick.wrapping_add(1),
        }

        for cmd in app.drain_commands() {
            backend.send(cmd);
        }
    }

    Ok(())
}
