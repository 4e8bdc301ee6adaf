use crate::catalog::CategoryId;

/// Labeled prompt segments, declared general to specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseGroup {
    MainSubject,
    Attributes,
    Style,
    Composition,
    Setting,
    Lighting,
    Render,
}

impl ClauseGroup {
    pub const ORDER: [ClauseGroup; 7] = [
        ClauseGroup::MainSubject,
        ClauseGroup::Attributes,
        ClauseGroup::Style,
        ClauseGroup::Composition,
        ClauseGroup::Setting,
        ClauseGroup::Lighting,
        ClauseGroup::Render,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ClauseGroup::MainSubject => "main subject",
            ClauseGroup::Attributes => "attributes",
            ClauseGroup::Style => "style",
            ClauseGroup::Composition => "composition",
            ClauseGroup::Setting => "setting",
            ClauseGroup::Lighting => "lighting",
            ClauseGroup::Render => "render",
        }
    }

    pub(crate) fn position(self) -> usize {
        match self {
            ClauseGroup::MainSubject => 0,
            ClauseGroup::Attributes => 1,
            ClauseGroup::Style => 2,
            ClauseGroup::Composition => 3,
            ClauseGroup::Setting => 4,
            ClauseGroup::Lighting => 5,
            ClauseGroup::Render => 6,
        }
    }
}

// Hair first, then garments and gear.
pub const ATTRIBUTE_CATEGORIES: [CategoryId; 9] = [
    CategoryId::HairLength,
    CategoryId::HairColor,
    CategoryId::Hairstyle,
    CategoryId::Clothing,
    CategoryId::Material,
    CategoryId::Pattern,
    CategoryId::Features,
    CategoryId::Headwear,
    CategoryId::Accessories,
];

pub const STYLE_CATEGORIES: [CategoryId; 1] = [CategoryId::Painters];

pub const COMPOSITION_CATEGORIES: [CategoryId; 3] = [
    CategoryId::CameraDistance,
    CategoryId::CameraFocus,
    CategoryId::CameraPosition,
];

pub const LIGHTING_CATEGORIES: [CategoryId; 2] =
    [CategoryId::LightSettings, CategoryId::LightSources];

pub const RENDER_CATEGORIES: [CategoryId; 2] = [CategoryId::FiltersColors, CategoryId::EffectsFx];

pub const FALLBACK_SUBJECT: &str = "a person";

pub const CHARACTER_REFERENCE_CLAUSE: &str = "The exact person from the primary character reference image, maintaining 100% facial likeness, features, and identity";

pub const ADDITIONAL_REFERENCE_CLAUSE: &str = "incorporating all visual elements, props, and details shown in the additional item reference images";

pub const BACKGROUND_REFERENCE_CLAUSE: &str = "The exact environment, architecture, and background style shown in the provided background reference image";
