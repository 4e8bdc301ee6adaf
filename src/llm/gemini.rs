use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::config::CONFIG;
use crate::utils::http::get_http_client;

const X_GOOG_API_KEY: &str = "x-goog-api-key";

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("Gemini request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("Gemini request failed: {0}")]
    Transport(String),
    #[error("Gemini response could not be decoded: {0}")]
    Decode(String),
    #[error("Invalid Gemini endpoint for model {model}: {message}")]
    Endpoint { model: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiInlineData {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    pub candidates: Option<Vec<GeminiCandidate>>,
    pub prompt_feedback: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiContent {
    pub parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GeminiPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Other(Value),
}

impl GeminiResponse {
    /// First inline payload of the first candidate; later candidates are not consulted.
    pub fn first_inline_image(&self) -> Option<&GeminiInlineData> {
        let candidate = self.candidates.as_deref()?.first()?;
        let parts = candidate.content.as_ref()?.parts.as_deref()?;
        parts.iter().find_map(|part| match part {
            GeminiPart::InlineData { inline_data } if !inline_data.data.is_empty() => {
                Some(inline_data)
            }
            _ => None,
        })
    }

    /// First text part of the first candidate, usually the model's explanation when no image came back.
    pub fn first_text(&self) -> Option<&str> {
        let candidate = self.candidates.as_deref()?.first()?;
        let parts = candidate.content.as_ref()?.parts.as_deref()?;
        parts.iter().find_map(|part| match part {
            GeminiPart::Text { text } if !text.trim().is_empty() => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .as_deref()?
            .first()?
            .finish_reason
            .as_deref()
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()?
            .get("blockReason")
            .and_then(|value| value.as_str())
    }
}

/// Stateless `generateContent` transport. One HTTP round trip per call, no retries.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: String,
    api_base: Url,
    http: Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_base", &self.api_base)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, api_base: Url, http: Client) -> Self {
        Self {
            api_key: api_key.into(),
            api_base,
            http,
        }
    }

    pub fn from_config() -> Self {
        Self::new(
            CONFIG.gemini_api_key.clone(),
            CONFIG.gemini_api_base.clone(),
            get_http_client().clone(),
        )
    }

    pub fn endpoint(&self, model: &str) -> Result<Url, GeminiError> {
        self.api_base
            .join(&format!("models/{model}:generateContent"))
            .map_err(|err| GeminiError::Endpoint {
                model: model.to_string(),
                message: err.to_string(),
            })
    }

    fn redact(&self, text: &str) -> String {
        let key = self.api_key.trim();
        if key.is_empty() {
            return text.to_string();
        }
        text.replace(key, "[redacted]")
    }

    pub async fn generate_content(
        &self,
        model: &str,
        payload: &Value,
    ) -> Result<GeminiResponse, GeminiError> {
        let url = self.endpoint(model)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            let payload_summary = summarize_gemini_payload(payload);
            debug!(target: "llm.gemini", model = model, payload = %payload_summary);
        }

        let response = self
            .http
            .post(url)
            .header(X_GOOG_API_KEY, &self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|err| {
                let err_text = self.redact(&err.to_string());
                warn!(
                    "Gemini request failed to send: {} (timeout={}, connect={})",
                    err_text,
                    err.is_timeout(),
                    err.is_connect()
                );
                GeminiError::Transport(err_text)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (message, body_summary) = summarize_error_body(&body);
            warn!("Gemini API error: status={}, body={}", status, body_summary);
            return Err(GeminiError::Status {
                status,
                message: self.redact(&message.unwrap_or(body_summary)),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| GeminiError::Transport(self.redact(&err.to_string())))?;
        let value = serde_json::from_str::<GeminiResponse>(&body)
            .map_err(|err| GeminiError::Decode(err.to_string()))?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            let response_summary = summarize_gemini_response(&value);
            debug!(target: "llm.gemini", model = model, response = %response_summary);
        }
        Ok(value)
    }
}

fn clip(value: &str, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}... (truncated)", &value[..cut]),
        None => value.to_string(),
    }
}

fn summarize_part(part: &Value) -> Option<Value> {
    if let Some(text) = part.get("text").and_then(Value::as_str) {
        return Some(json!({ "text": clip(text, 200) }));
    }
    let inline = part.get("inlineData")?;
    Some(json!({
        "mimeType": inline.get("mimeType").and_then(Value::as_str),
        "bytes": inline.get("data").and_then(Value::as_str).map_or(0, str::len),
    }))
}

/// Log-safe view of a request: reference images collapse to their encoded length.
fn summarize_gemini_payload(payload: &Value) -> Value {
    let parts: Vec<Value> = payload
        .pointer("/contents/0/parts")
        .and_then(Value::as_array)
        .map(|parts| parts.iter().filter_map(summarize_part).collect())
        .unwrap_or_default();
    json!({
        "parts": parts,
        "imageConfig": payload.pointer("/generationConfig/imageConfig"),
    })
}

fn summarize_gemini_response(response: &GeminiResponse) -> Value {
    let image = response.first_inline_image();
    json!({
        "candidates": response.candidates.as_ref().map_or(0, Vec::len),
        "imageMime": image.map(|image| image.mime_type.as_str()),
        "imageBytes": image.map_or(0, |image| image.data.len()),
        "text": response.first_text().map(|text| clip(text, 200)),
        "finishReason": response.finish_reason(),
        "blockReason": response.block_reason(),
    })
}

/// Pulls `error.message` out of a provider error body; the second value is a clipped copy for logs.
fn summarize_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "empty response body".to_string());
    }
    let message = serde_json::from_str::<Value>(trimmed).ok().and_then(|value| {
        value
            .pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    (message, clip(trimmed, 2000))
}
