//! Assistant error type

use thiserror::Error;

/// Failure modes of a single generation request.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("no API key configured")]
    MissingKey,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response contained no text")]
    EmptyResponse,
}

impl AssistantError {
    /// Whether the failure points at the API key rather than the request.
    pub fn is_credential_error(&self) -> bool {
        match self {
            AssistantError::MissingKey => true,
            AssistantError::Status { status, body } => {
                matches!(status, 401 | 403)
                    || (*status == 400 && body.to_ascii_lowercase().contains("api key"))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, body: &str) -> AssistantError {
        AssistantError::Status {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_credential_classification() {
        assert!(AssistantError::MissingKey.is_credential_error());
        assert!(status(401, "").is_credential_error());
        assert!(status(403, "forbidden").is_credential_error());
        assert!(status(400, "API key not valid. Please pass a valid API key.").is_credential_error());
        assert!(!status(400, "bad request").is_credential_error());
        assert!(!status(500, "oops").is_credential_error());
        assert!(!AssistantError::EmptyResponse.is_credential_error());
    }
}
