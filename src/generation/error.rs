use reqwest::StatusCode;

use crate::llm::gemini::GeminiError;

const ENTITY_NOT_FOUND: &str = "Requested entity was not found";

/// Failure classes surfaced to the caller. Nothing here is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The provider refused the credential for this model; the caller should offer key selection.
    #[error("API key required (status {status:?}): {message}")]
    ApiKeyRequired { status: Option<u16>, message: String },
    #[error("The model did not return any image data (model: {model}). Please check safety settings.")]
    NoImageReturned { model: String },
    #[error("{0}")]
    Unknown(String),
}

impl GenerationError {
    pub fn is_api_key_required(&self) -> bool {
        matches!(self, GenerationError::ApiKeyRequired { .. })
    }
}

fn is_credential_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
    )
}

impl From<GeminiError> for GenerationError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::Status { status, message }
                if is_credential_status(status) || message.contains(ENTITY_NOT_FOUND) =>
            {
                GenerationError::ApiKeyRequired {
                    status: Some(status.as_u16()),
                    message,
                }
            }
            GeminiError::Transport(message) if message.contains(ENTITY_NOT_FOUND) => {
                GenerationError::ApiKeyRequired {
                    status: None,
                    message,
                }
            }
            other => GenerationError::Unknown(other.to_string()),
        }
    }
}
