use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{Catalog, CategoryId, NONE_OPTION_ID};

pub const MAX_ADDITIONAL_REFERENCES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("At most {limit} additional reference images are allowed (attempted {attempted})")]
    TooManyAdditionalImages { limit: usize, attempted: usize },
    #[error("Unknown option '{option}' for category '{category}'")]
    UnknownOption { category: CategoryId, option: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelType {
    #[default]
    #[serde(rename = "gemini-2.5-flash-image")]
    Flash,
    #[serde(rename = "gemini-3-pro-image-preview")]
    Pro,
}

impl ModelType {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelType::Flash => "gemini-2.5-flash-image",
            ModelType::Pro => "gemini-3-pro-image-preview",
        }
    }

    /// The pro tier is the only model that accepts an explicit image size.
    pub fn is_pro(self) -> bool {
        matches!(self, ModelType::Pro)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:3")]
    Landscape4x3,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Landscape4x3 => "4:3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
            ImageSize::FourK => "4K",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Woman,
    Man,
}

impl Gender {
    /// Phrase appended to the main subject clause.
    pub fn phrase(self) -> &'static str {
        match self {
            Gender::Woman => "woman",
            Gender::Man => "man",
        }
    }
}

/// Reference images as base64 data URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceImages {
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default, deserialize_with = "deserialize_additional")]
    pub additional: Vec<String>,
}

fn deserialize_additional<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let images = Vec::<String>::deserialize(deserializer)?;
    if images.len() > MAX_ADDITIONAL_REFERENCES {
        return Err(serde::de::Error::custom(
            ValidationError::TooManyAdditionalImages {
                limit: MAX_ADDITIONAL_REFERENCES,
                attempted: images.len(),
            },
        ));
    }
    Ok(images)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|image| !image.trim().is_empty())
}

impl ReferenceImages {
    /// Adds an item reference; the sixth image is rejected, never truncated.
    pub fn push_additional(&mut self, image: String) -> Result<(), ValidationError> {
        if self.additional.len() >= MAX_ADDITIONAL_REFERENCES {
            return Err(ValidationError::TooManyAdditionalImages {
                limit: MAX_ADDITIONAL_REFERENCES,
                attempted: self.additional.len() + 1,
            });
        }
        self.additional.push(image);
        Ok(())
    }

    /// Character reference, ignoring empty uploads.
    pub fn character(&self) -> Option<&str> {
        non_blank(self.character.as_deref())
    }

    pub fn background(&self) -> Option<&str> {
        non_blank(self.background.as_deref())
    }

    pub fn additional_images(&self) -> impl Iterator<Item = &str> {
        self.additional
            .iter()
            .filter_map(|image| non_blank(Some(image.as_str())))
    }

    pub fn has_character(&self) -> bool {
        self.character().is_some()
    }

    pub fn has_background(&self) -> bool {
        self.background().is_some()
    }

    pub fn has_additional(&self) -> bool {
        self.additional_images().next().is_some()
    }
}

/// Snapshot of everything the user picked for one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub model: ModelType,
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
    pub reference_images: ReferenceImages,
    pub gender: Option<Gender>,
    pub selected_styles: BTreeMap<CategoryId, String>,
}

impl Settings {
    #[cfg(test)]
    pub fn with_style(mut self, category: CategoryId, option_id: impl Into<String>) -> Self {
        self.selected_styles.insert(category, option_id.into());
        self
    }

    #[cfg(test)]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn selected(&self, category: CategoryId) -> Option<&str> {
        self.selected_styles.get(&category).map(String::as_str)
    }

    /// Rejects selections the catalog cannot resolve and over-full reference lists.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), ValidationError> {
        if self.reference_images.additional.len() > MAX_ADDITIONAL_REFERENCES {
            return Err(ValidationError::TooManyAdditionalImages {
                limit: MAX_ADDITIONAL_REFERENCES,
                attempted: self.reference_images.additional.len(),
            });
        }

        for (category, option) in &self.selected_styles {
            if option == NONE_OPTION_ID {
                continue;
            }
            if catalog.option(*category, option).is_none() {
                return Err(ValidationError::UnknownOption {
                    category: *category,
                    option: option.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{StyleCategory, StyleOption};

    #[test]
    fn parses_the_studio_settings_shape() {
        let raw = r#"{
            "model": "gemini-3-pro-image-preview",
            "aspectRatio": "16:9",
            "imageSize": "2K",
            "referenceImages": { "character": null, "background": "data:image/jpeg;base64,AAAA", "additional": [] },
            "gender": "woman",
            "selectedStyles": { "hair_color": "blonde", "effects_fx": "none" }
        }"#;
        let settings: Settings = serde_json::from_str(raw).unwrap();
        assert_eq!(settings.model, ModelType::Pro);
        assert_eq!(settings.aspect_ratio, AspectRatio::Landscape16x9);
        assert_eq!(settings.image_size, ImageSize::TwoK);
        assert_eq!(settings.gender, Some(Gender::Woman));
        assert!(settings.reference_images.has_background());
        assert_eq!(settings.selected(CategoryId::HairColor), Some("blonde"));
        assert_eq!(settings.selected(CategoryId::Clothing), None);
    }

    #[test]
    fn missing_fields_fall_back_to_session_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.model, ModelType::Flash);
        assert_eq!(settings.aspect_ratio.as_str(), "1:1");
        assert_eq!(settings.image_size.as_str(), "1K");
        assert_eq!(settings.gender, None);
    }

    #[test]
    fn rejects_unknown_category_ids_at_deserialization() {
        let raw = r#"{ "selectedStyles": { "background_scene": "forest" } }"#;
        assert!(serde_json::from_str::<Settings>(raw).is_err());
    }

    #[test]
    fn rejects_more_than_five_additional_references_when_parsing() {
        let raw = r#"{ "referenceImages": { "additional": ["a", "b", "c", "d", "e", "f"] } }"#;
        let err = serde_json::from_str::<Settings>(raw).unwrap_err();
        assert!(err.to_string().contains("At most 5 additional reference images"));
    }

    #[test]
    fn push_additional_rejects_the_sixth_image_without_truncating() {
        let mut refs = ReferenceImages::default();
        for index in 0..MAX_ADDITIONAL_REFERENCES {
            refs.push_additional(format!("img-{index}")).unwrap();
        }
        let err = refs.push_additional("img-5".to_string()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooManyAdditionalImages {
                limit: 5,
                attempted: 6
            }
        );
        assert_eq!(refs.additional.len(), 5);
        assert_eq!(refs.additional.last().map(String::as_str), Some("img-4"));
    }

    #[test]
    fn empty_uploads_count_as_missing_references() {
        let refs = ReferenceImages {
            character: Some(String::new()),
            background: Some("   ".to_string()),
            additional: vec![String::new(), " ".to_string()],
        };
        assert_eq!(refs.character(), None);
        assert!(!refs.has_character());
        assert!(!refs.has_background());
        assert!(!refs.has_additional());

        let refs = ReferenceImages {
            additional: vec![String::new(), "data:image/png;base64,AAAA".to_string()],
            ..ReferenceImages::default()
        };
        assert!(refs.has_additional());
        assert_eq!(
            refs.additional_images().collect::<Vec<_>>(),
            vec!["data:image/png;base64,AAAA"]
        );
    }

    #[test]
    fn validate_flags_options_missing_from_the_catalog() {
        let catalog = Catalog::from_categories(vec![StyleCategory::new(
            CategoryId::Clothing,
            "Clothing",
            vec![StyleOption::new("jacket", "leather jacket")],
        )]);

        let ok = Settings::default()
            .with_style(CategoryId::Clothing, "jacket")
            .with_style(CategoryId::Headwear, "none");
        assert!(ok.validate(&catalog).is_ok());

        let bad = Settings::default().with_style(CategoryId::Clothing, "cape");
        assert_eq!(
            bad.validate(&catalog),
            Err(ValidationError::UnknownOption {
                category: CategoryId::Clothing,
                option: "cape".to_string()
            })
        );
    }
}
