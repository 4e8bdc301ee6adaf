use serde::Serialize;
use serde_json::{json, Value};

use crate::catalog::Catalog;
use crate::llm::gemini::GeminiInlineData;
use crate::prompt::compile;
use crate::settings::{AspectRatio, ImageSize, ModelType, Settings};
use crate::utils::data_url::strip_data_url_header;

/// Reference uploads are always declared as JPEG on the wire.
pub const REFERENCE_TRANSPORT_MIME: &str = "image/jpeg";

pub const CHARACTER_ROLE_TEXT: &str =
    "Primary Identity Reference: Focus on the facial structure and likeness of the person in this image.";
pub const BACKGROUND_ROLE_TEXT: &str =
    "Background/Setting Reference: Replicate the environment, style, and atmosphere of this image.";
pub const ADDITIONAL_ROLE_TEXT: &str =
    "Element/Props Reference: Use these images for specific items and visual details.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
    Text {
        text: String,
    },
}

impl RequestPart {
    fn reference_image(data_url: &str) -> Self {
        RequestPart::InlineData {
            inline_data: GeminiInlineData {
                mime_type: REFERENCE_TRANSPORT_MIME.to_string(),
                data: strip_data_url_header(data_url).to_string(),
            },
        }
    }

    fn text(text: impl Into<String>) -> Self {
        RequestPart::Text { text: text.into() }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, RequestPart::InlineData { .. })
    }

    #[cfg(test)]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RequestPart::Text { text } => Some(text),
            RequestPart::InlineData { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: AspectRatio,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledRequest {
    pub model: ModelType,
    pub parts: Vec<RequestPart>,
    pub image_config: ImageConfig,
    /// Text of the final part, kept for the generation result.
    pub prompt: String,
}

impl AssembledRequest {
    pub fn payload(&self) -> Value {
        json!({
            "contents": [{ "role": "user", "parts": self.parts }],
            "generationConfig": { "imageConfig": self.image_config },
        })
    }

    pub fn image_count(&self) -> usize {
        self.parts.iter().filter(|part| part.is_image()).count()
    }
}

/// Builds the ordered request parts. A non-empty override replaces the compiled prompt verbatim.
pub fn assemble(
    settings: &Settings,
    catalog: &Catalog,
    prompt_override: Option<&str>,
) -> AssembledRequest {
    let prompt = match prompt_override.filter(|text| !text.is_empty()) {
        Some(text) => text.to_string(),
        None => compile(settings, catalog).to_string(),
    };
    let refs = &settings.reference_images;
    let mut parts = Vec::with_capacity(refs.additional.len() + 5);

    if let Some(character) = refs.character() {
        parts.push(RequestPart::reference_image(character));
        parts.push(RequestPart::text(CHARACTER_ROLE_TEXT));
    }

    if let Some(background) = refs.background() {
        parts.push(RequestPart::reference_image(background));
        parts.push(RequestPart::text(BACKGROUND_ROLE_TEXT));
    }

    if refs.has_additional() {
        for image in refs.additional_images() {
            parts.push(RequestPart::reference_image(image));
        }
        parts.push(RequestPart::text(ADDITIONAL_ROLE_TEXT));
    }

    parts.push(RequestPart::text(prompt.clone()));

    AssembledRequest {
        model: settings.model,
        parts,
        image_config: ImageConfig {
            aspect_ratio: settings.aspect_ratio,
            image_size: settings.model.is_pro().then_some(settings.image_size),
        },
        prompt,
    }
}
