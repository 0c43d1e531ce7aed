//! AI response retrieval
//!
//! [`get_ai_response`] never fails: every outcome becomes display text, with
//! a flag telling the UI whether to offer key selection.

mod client;
mod error;

pub use client::{AssistantSettings, GeminiClient};
use error::AssistantError;

/// Shown when no API key is available.
pub const MISSING_KEY_REPLY: &str =
    "API key not configured. Please set the API_KEY environment variable.";

/// Shown when the request fails for any reason.
pub const FAILURE_REPLY: &str = "Sorry, I encountered an error while processing your request.";

/// Display text for the assistant plus a key-selection hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiReply {
    pub text: String,
    /// The UI should prompt for a (new) API key.
    pub offer_key_selection: bool,
}

impl AiReply {
    fn answer(text: String) -> Self {
        Self {
            text,
            offer_key_selection: false,
        }
    }

    fn missing_key() -> Self {
        Self {
            text: MISSING_KEY_REPLY.to_string(),
            offer_key_selection: true,
        }
    }

    fn failure(err: &AssistantError) -> Self {
        Self {
            text: FAILURE_REPLY.to_string(),
            offer_key_selection: err.is_credential_error(),
        }
    }
}

/// Ask the assistant. `client` is `None` when no key has been configured.
pub async fn get_ai_response(client: Option<&GeminiClient>, prompt: &str) -> AiReply {
    let Some(client) = client else {
        tracing::warn!("assistant request without an API key");
        return AiReply::missing_key();
    };

    match client.generate(prompt).await {
        Ok(text) => AiReply::answer(text),
        Err(e) => {
            tracing::warn!("Gemini API error: {}", e);
            AiReply::failure(&e)
        }
    }
}

/// One-shot query for the `ask` command.
pub async fn ask(api_key: Option<String>, settings: &AssistantSettings, prompt: &str) -> AiReply {
    let client = api_key.map(|key| GeminiClient::new(key, settings));
    get_ai_response(client.as_ref(), prompt).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn server_with(template: ResponseTemplate) -> (MockServer, AssistantSettings) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(template)
            .mount(&server)
            .await;
        let settings = AssistantSettings {
            model: "m".to_string(),
            base_url: server.uri(),
        };
        (server, settings)
    }

    #[tokio::test]
    async fn test_no_client_returns_missing_key_text() {
        let reply = get_ai_response(None, "hi").await;
        assert_eq!(reply.text, MISSING_KEY_REPLY);
        assert!(reply.offer_key_selection);
    }

    #[tokio::test]
    async fn test_success_passes_text_through() {
        let (_server, settings) = server_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "42" }] } }]
        })))
        .await;
        let reply = ask(Some("k".into()), &settings, "answer?").await;
        assert_eq!(reply, AiReply::answer("42".to_string()));
    }

    #[tokio::test]
    async fn test_server_error_returns_fallback() {
        let (_server, settings) = server_with(ResponseTemplate::new(500)).await;
        let reply = ask(Some("k".into()), &settings, "hi").await;
        assert_eq!(reply.text, FAILURE_REPLY);
        assert!(!reply.offer_key_selection);
    }

    #[tokio::test]
    async fn test_invalid_key_offers_selection() {
        let (_server, settings) = server_with(
            ResponseTemplate::new(400).set_body_string("API key not valid. Please pass a valid API key."),
        )
        .await;
        let reply = ask(Some("k".into()), &settings, "hi").await;
        assert_eq!(reply.text, FAILURE_REPLY);
        assert!(reply.offer_key_selection);
    }

    #[test]
    fn test_network_failure_returns_fallback() {
        // Nothing listens on port 9 (discard) locally.
        let settings = AssistantSettings {
            model: "m".to_string(),
            base_url: "http://127.0.0.1:9".to_string(),
        };
        let reply = tokio_test::block_on(ask(Some("k".into()), &settings, "hi"));
        assert_eq!(reply.text, FAILURE_REPLY);
        assert!(!reply.offer_key_selection);
    }
}
