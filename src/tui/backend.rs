//! Async backend: runs assistant requests off the UI task.
//!
//! The TUI sends `BackendCommand` values over an mpsc channel; a background
//! tokio task executes them and sends `BackendResponse` values back.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::assistant::{self, AiReply, AssistantSettings, GeminiClient};

/// Commands sent from the TUI event loop to the async backend.
#[derive(Debug, PartialEq, Eq)]
pub enum BackendCommand {
    /// Ask the assistant on behalf of the room with this generation.
    Ask { generation: u64, prompt: String },
    /// Use a different API key from now on.
    SetApiKey { key: String },
}

/// Responses from the async backend to the TUI.
#[derive(Debug)]
pub enum BackendResponse {
    AiReply { generation: u64, reply: AiReply },
}

/// Handle for interacting with the backend from the TUI side.
pub struct Backend {
    cmd_tx: mpsc::UnboundedSender<BackendCommand>,
    resp_rx: mpsc::UnboundedReceiver<BackendResponse>,
}

impl Backend {
    /// Spawn the backend task. `api_key` is `None` when no key was found.
    pub fn start(settings: AssistantSettings, api_key: Option<String>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();

        tokio::spawn(backend_loop(cmd_rx, resp_tx, settings, api_key));

        Self { cmd_tx, resp_rx }
    }

    /// Send a command to the backend (non-blocking).
    pub fn send(&self, cmd: BackendCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("Backend channel closed -- command dropped");
        }
    }

    /// Next response; `None` once the backend has shut down.
    /// Designed to be used inside `tokio::select!`.
    pub async fn recv(&mut self) -> Option<BackendResponse> {
        self.resp_rx.recv().await
    }
}

/// Background loop. Each `Ask` runs on its own task so slow replies do not
/// hold up later ones.
async fn backend_loop(
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    resp_tx: mpsc::UnboundedSender<BackendResponse>,
    settings: AssistantSettings,
    api_key: Option<String>,
) {
    let mut client = api_key.map(|key| Arc::new(GeminiClient::new(key, &settings)));

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            BackendCommand::SetApiKey { key } => {
                tracing::info!("API key updated");
                client = Some(Arc::new(GeminiClient::new(key, &settings)));
            }
            BackendCommand::Ask { generation, prompt } => {
                let client = client.clone();
                let resp_tx = resp_tx.clone();
                tokio::spawn(async move {
                    let reply = assistant::get_ai_response(client.as_deref(), &prompt).await;
                    let _ = resp_tx.send(BackendResponse::AiReply { generation, reply });
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::MISSING_KEY_REPLY;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_ask_without_key() {
        let settings = AssistantSettings {
            model: "m".into(),
            base_url: "http://127.0.0.1:9".into(),
        };
        let mut backend = Backend::start(settings, None);
        backend.send(BackendCommand::Ask {
            generation: 7,
            prompt: "hi".into(),
        });

        let BackendResponse::AiReply { generation, reply } = backend.recv().await.unwrap();
        assert_eq!(generation, 7);
        assert_eq!(reply.text, MISSING_KEY_REPLY);
        assert!(reply.offer_key_selection);
    }

    #[tokio::test]
    async fn test_set_key_enables_replies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "hello" }] } }]
            })))
            .mount(&server)
            .await;
        let settings = AssistantSettings {
            model: "m".into(),
            base_url: server.uri(),
        };

        let mut backend = Backend::start(settings, None);
        backend.send(BackendCommand::SetApiKey { key: "k".into() });
        backend.send(BackendCommand::Ask {
            generation: 1,
            prompt: "hi".into(),
        });

        let BackendResponse::AiReply { reply, .. } = backend.recv().await.unwrap();
        assert_eq!(reply.text, "hello");
        assert!(!reply.offer_key_selection);
    }
}
