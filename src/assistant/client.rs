//! Gemini `generateContent` client
//!
//! One request per prompt. No retries, no timeout, no streaming.

use serde::{Deserialize, Serialize};

use super::error::AssistantError;

/// Fixed role description sent with every prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful AI assistant in a chat room. \
A user is asking you a question. Keep your response concise and helpful.";

/// Model and endpoint used by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantSettings {
    pub model: String,
    pub base_url: String,
}

// -- Request / response bodies --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let candidate = self.candidates?.into_iter().next()?;
        let text: String = candidate
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// HTTP client bound to one API key.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    settings: AssistantSettings,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, settings: &AssistantSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            settings: settings.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    /// Send `prompt` and return the model's text output.
    pub async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        if self.api_key.trim().is_empty() {
            return Err(AssistantError::MissingKey);
        }

        let url = self.endpoint();
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
        };
        tracing::debug!("Gemini POST {}", url);

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes)?;
        parsed.text().ok_or(AssistantError::EmptyResponse)
    }
}
