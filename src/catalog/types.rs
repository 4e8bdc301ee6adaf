use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Option id that means "no opinion" for a category.
pub const NONE_OPTION_ID: &str = "none";

/// Closed set of categories the prompt compiler knows how to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryId {
    Subject,
    HairLength,
    HairColor,
    Hairstyle,
    Clothing,
    Material,
    Pattern,
    Features,
    Headwear,
    Accessories,
    Painters,
    CameraDistance,
    CameraFocus,
    CameraPosition,
    LightSettings,
    LightSources,
    FiltersColors,
    EffectsFx,
}

impl CategoryId {
    pub const ALL: [CategoryId; 18] = [
        CategoryId::Subject,
        CategoryId::HairLength,
        CategoryId::HairColor,
        CategoryId::Hairstyle,
        CategoryId::Clothing,
        CategoryId::Material,
        CategoryId::Pattern,
        CategoryId::Features,
        CategoryId::Headwear,
        CategoryId::Accessories,
        CategoryId::Painters,
        CategoryId::CameraDistance,
        CategoryId::CameraFocus,
        CategoryId::CameraPosition,
        CategoryId::LightSettings,
        CategoryId::LightSources,
        CategoryId::FiltersColors,
        CategoryId::EffectsFx,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryId::Subject => "subject",
            CategoryId::HairLength => "hair_length",
            CategoryId::HairColor => "hair_color",
            CategoryId::Hairstyle => "hairstyle",
            CategoryId::Clothing => "clothing",
            CategoryId::Material => "material",
            CategoryId::Pattern => "pattern",
            CategoryId::Features => "features",
            CategoryId::Headwear => "headwear",
            CategoryId::Accessories => "accessories",
            CategoryId::Painters => "painters",
            CategoryId::CameraDistance => "camera_distance",
            CategoryId::CameraFocus => "camera_focus",
            CategoryId::CameraPosition => "camera_position",
            CategoryId::LightSettings => "light_settings",
            CategoryId::LightSources => "light_sources",
            CategoryId::FiltersColors => "filters_colors",
            CategoryId::EffectsFx => "effects_fx",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|id| id.as_str() == value)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOption {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_value: Option<String>,
    /// UI grouping label; never reaches the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl StyleOption {
    #[cfg(test)]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            preview_url: None,
            prompt_value: None,
            group: None,
        }
    }

    #[cfg(test)]
    pub fn with_prompt_value(mut self, value: impl Into<String>) -> Self {
        self.prompt_value = Some(value.into());
        self
    }

    pub fn is_none(&self) -> bool {
        self.id == NONE_OPTION_ID
    }

    /// Text contributed to the prompt: `prompt_value` when set, otherwise the display name.
    pub fn resolved_value(&self) -> &str {
        self.prompt_value
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCategory {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub options: Vec<StyleOption>,
}

impl StyleCategory {
    #[cfg(test)]
    pub fn new(id: CategoryId, name: impl Into<String>, options: Vec<StyleOption>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            options,
        }
    }

    pub fn option(&self, option_id: &str) -> Option<&StyleOption> {
        self.options.iter().find(|option| option.id == option_id)
    }
}

/// Read-only option catalog indexed by category.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<StyleCategory>,
    index: HashMap<CategoryId, usize>,
}

impl Catalog {
    /// Builds the catalog; a repeated category id keeps its first definition.
    pub fn from_categories(categories: Vec<StyleCategory>) -> Self {
        let mut kept = Vec::with_capacity(categories.len());
        let mut index = HashMap::new();
        for category in categories {
            if index.contains_key(&category.id) {
                continue;
            }
            index.insert(category.id, kept.len());
            kept.push(category);
        }
        Self {
            categories: kept,
            index,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, id: CategoryId) -> Option<&StyleCategory> {
        self.index.get(&id).map(|position| &self.categories[*position])
    }

    pub fn option(&self, id: CategoryId, option_id: &str) -> Option<&StyleOption> {
        self.category(id)?.option(option_id)
    }

    /// Resolves a selection to prompt text. Missing, unknown and `"none"` selections yield `None`.
    pub fn resolve(&self, id: CategoryId, selected: Option<&str>) -> Option<&str> {
        let selected = selected?;
        if selected == NONE_OPTION_ID {
            return None;
        }
        let option = self.option(id, selected)?;
        if option.is_none() {
            return None;
        }
        Some(option.resolved_value())
    }
}
