pub mod assembler;
pub mod error;
pub mod history;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::llm::gemini::GeminiClient;
use crate::settings::Settings;
use crate::utils::data_url::to_data_url;
use crate::utils::timing::{log_llm_timing, LlmCall};

pub use assembler::{assemble, AssembledRequest, ImageConfig, RequestPart};
pub use error::GenerationError;
pub use history::HistoryItem;

const FALLBACK_RESULT_MIME: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// `data:` URL of the generated image.
    pub image_url: String,
    /// Exact text of the prompt part that produced the image.
    pub prompt: String,
}

pub async fn submit(
    client: &GeminiClient,
    request: &AssembledRequest,
) -> Result<GenerationResult, GenerationError> {
    let model = request.model.as_str();
    info!(
        model = model,
        images = request.image_count(),
        "Submitting generation request"
    );
    let metadata = json!({
        "images": request.image_count(),
        "parts": request.parts.len(),
        "aspectRatio": request.image_config.aspect_ratio.as_str(),
        "imageSize": request.image_config.image_size.map(|size| size.as_str()),
    });

    let call = LlmCall {
        provider: "gemini",
        model,
        operation: "generate_image",
    };
    log_llm_timing(call, Some(metadata), move || async move {
        let response = client
            .generate_content(model, &request.payload())
            .await
            .map_err(GenerationError::from)?;

        let Some(image) = response.first_inline_image() else {
            warn!(
                model = model,
                finish_reason = ?response.finish_reason(),
                block_reason = ?response.block_reason(),
                reply = ?response.first_text(),
                "Gemini returned no image data"
            );
            return Err(GenerationError::NoImageReturned {
                model: model.to_string(),
            });
        };

        let mime_type = if image.mime_type.trim().is_empty() {
            FALLBACK_RESULT_MIME
        } else {
            image.mime_type.trim()
        };
        info!(model = model, mime_type = mime_type, "Gemini returned an image");
        Ok(GenerationResult {
            image_url: to_data_url(mime_type, &image.data),
            prompt: request.prompt.clone(),
        })
    })
    .await
}

/// Compiles (or takes the override), assembles and submits in one call.
pub async fn generate(
    client: &GeminiClient,
    settings: &Settings,
    catalog: &Catalog,
    prompt_override: Option<&str>,
) -> Result<GenerationResult, GenerationError> {
    let request = assemble(settings, catalog, prompt_override);
    submit(client, &request).await
}
