use std::fmt;

use crate::catalog::{Catalog, CategoryId};
use crate::prompt::clauses::{
    ClauseGroup, ADDITIONAL_REFERENCE_CLAUSE, ATTRIBUTE_CATEGORIES, BACKGROUND_REFERENCE_CLAUSE,
    CHARACTER_REFERENCE_CLAUSE, COMPOSITION_CATEGORIES, FALLBACK_SUBJECT, LIGHTING_CATEGORIES,
    RENDER_CATEGORIES, STYLE_CATEGORIES,
};
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub group: ClauseGroup,
    pub values: Vec<String>,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}: {})", self.group.label(), self.values.join(", "))
    }
}

/// Compiled prompt: non-empty clause groups in fixed order, one per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptText {
    clauses: Vec<Clause>,
}

impl PromptText {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    #[cfg(test)]
    pub fn clause(&self, group: ClauseGroup) -> Option<&Clause> {
        self.clauses.iter().find(|clause| clause.group == group)
    }
}

impl fmt::Display for PromptText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, clause) in self.clauses.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

impl From<PromptText> for String {
    fn from(value: PromptText) -> Self {
        value.to_string()
    }
}

#[derive(Default)]
struct ClauseBuilder {
    groups: [Vec<String>; 7],
}

impl ClauseBuilder {
    fn push(&mut self, group: ClauseGroup, value: &str) {
        self.groups[group.position()].push(value.to_string());
    }

    fn extend<'a>(&mut self, group: ClauseGroup, values: impl IntoIterator<Item = &'a str>) {
        for value in values {
            self.push(group, value);
        }
    }

    fn build(self) -> PromptText {
        let mut clauses = Vec::new();
        for (group, values) in ClauseGroup::ORDER.into_iter().zip(self.groups) {
            let mut unique: Vec<String> = Vec::with_capacity(values.len());
            for value in values {
                if !unique.contains(&value) {
                    unique.push(value);
                }
            }
            if !unique.is_empty() {
                clauses.push(Clause {
                    group,
                    values: unique,
                });
            }
        }
        PromptText { clauses }
    }
}

fn resolve_all<'a>(
    settings: &'a Settings,
    catalog: &'a Catalog,
    categories: &'a [CategoryId],
) -> impl Iterator<Item = &'a str> + 'a {
    categories
        .iter()
        .filter_map(move |category| catalog.resolve(*category, settings.selected(*category)))
}

pub fn compile(settings: &Settings, catalog: &Catalog) -> PromptText {
    let refs = &settings.reference_images;

    let mut builder = ClauseBuilder::default();

    // The character reference fixes identity, so subject style and gender are dropped.
    if refs.has_character() {
        builder.push(ClauseGroup::MainSubject, CHARACTER_REFERENCE_CLAUSE);
    } else {
        let subject = catalog
            .resolve(CategoryId::Subject, settings.selected(CategoryId::Subject))
            .unwrap_or(FALLBACK_SUBJECT);
        builder.push(ClauseGroup::MainSubject, subject);
        if let Some(gender) = settings.gender {
            builder.push(ClauseGroup::MainSubject, gender.phrase());
        }
    }

    builder.extend(
        ClauseGroup::Attributes,
        resolve_all(settings, catalog, &ATTRIBUTE_CATEGORIES),
    );
    if refs.has_additional() {
        builder.push(ClauseGroup::Attributes, ADDITIONAL_REFERENCE_CLAUSE);
    }

    builder.extend(ClauseGroup::Style, resolve_all(settings, catalog, &STYLE_CATEGORIES));
    builder.extend(
        ClauseGroup::Composition,
        resolve_all(settings, catalog, &COMPOSITION_CATEGORIES),
    );

    if refs.has_background() {
        builder.push(ClauseGroup::Setting, BACKGROUND_REFERENCE_CLAUSE);
    }

    builder.extend(
        ClauseGroup::Lighting,
        resolve_all(settings, catalog, &LIGHTING_CATEGORIES),
    );
    builder.extend(ClauseGroup::Render, resolve_all(settings, catalog, &RENDER_CATEGORIES));

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::sample_catalog;
    use crate::settings::{AspectRatio, Gender, ModelType};

    const IMAGE: &str = "data:image/jpeg;base64,/9j/AAAA";

    #[test]
    fn empty_settings_fall_back_to_a_person() {
        let prompt = compile(&Settings::default(), &sample_catalog());
        assert_eq!(prompt.to_string(), "(main subject: a person)");
    }

    #[test]
    fn empty_catalog_still_yields_the_fallback_subject() {
        let settings = Settings::default()
            .with_style(CategoryId::HairColor, "blonde")
            .with_style(CategoryId::Painters, "monet");
        let prompt = compile(&settings, &Catalog::default());
        assert_eq!(prompt.to_string(), "(main subject: a person)");
    }

    #[test]
    fn names_are_used_when_prompt_value_is_absent() {
        let settings = Settings::default()
            .with_style(CategoryId::HairColor, "blonde")
            .with_style(CategoryId::Clothing, "leather jacket")
            .with_gender(Gender::Woman);
        let prompt = compile(&settings, &sample_catalog());
        assert_eq!(
            prompt.to_string(),
            "(main subject: a person, woman)\n(attributes: blonde, leather jacket)"
        );
    }

    #[test]
    fn character_reference_suppresses_subject_style_and_gender() {
        let mut settings = Settings::default()
            .with_style(CategoryId::Subject, "warrior")
            .with_gender(Gender::Man);
        settings.reference_images.character = Some(IMAGE.to_string());

        let prompt = compile(&settings, &sample_catalog()).to_string();
        assert_eq!(prompt, format!("(main subject: {CHARACTER_REFERENCE_CLAUSE})"));
        assert!(!prompt.contains("warrior"));
    }

    #[test]
    fn empty_character_upload_keeps_subject_and_gender() {
        let mut settings = Settings::default()
            .with_style(CategoryId::Subject, "warrior")
            .with_gender(Gender::Man);
        settings.reference_images.character = Some(String::new());

        let prompt = compile(&settings, &sample_catalog()).to_string();
        assert_eq!(prompt, "(main subject: a battle-worn warrior, man)");
        assert!(!prompt.contains(CHARACTER_REFERENCE_CLAUSE));
    }

    #[test]
    fn subject_style_replaces_the_fallback() {
        let settings = Settings::default()
            .with_style(CategoryId::Subject, "warrior")
            .with_gender(Gender::Man);
        let prompt = compile(&settings, &sample_catalog());
        assert_eq!(prompt.to_string(), "(main subject: a battle-worn warrior, man)");
    }

    #[test]
    fn none_selection_matches_an_untouched_category() {
        let catalog = sample_catalog();
        let base = Settings::default().with_style(CategoryId::HairColor, "blonde");
        let expected = compile(&base, &catalog);
        for category in CategoryId::ALL {
            if category == CategoryId::HairColor {
                continue;
            }
            let with_none = base.clone().with_style(category, "none");
            assert_eq!(compile(&with_none, &catalog), expected, "category {category}");
        }
    }

    #[test]
    fn unknown_option_ids_contribute_nothing() {
        let settings = Settings::default().with_style(CategoryId::Clothing, "space suit");
        assert_eq!(
            compile(&settings, &sample_catalog()).to_string(),
            "(main subject: a person)"
        );
    }

    #[test]
    fn duplicate_values_collapse_within_a_group() {
        let settings = Settings::default()
            .with_style(CategoryId::LightSettings, "golden")
            .with_style(CategoryId::LightSources, "sunset");
        let prompt = compile(&settings, &sample_catalog());
        assert_eq!(
            prompt.clause(ClauseGroup::Lighting).map(ToString::to_string),
            Some("(lighting: golden hour light)".to_string())
        );
    }

    #[test]
    fn groups_follow_general_to_specific_order() {
        let mut settings = Settings::default()
            .with_style(CategoryId::EffectsFx, "grain")
            .with_style(CategoryId::FiltersColors, "teal")
            .with_style(CategoryId::LightSources, "neon")
            .with_style(CategoryId::LightSettings, "golden")
            .with_style(CategoryId::CameraPosition, "low")
            .with_style(CategoryId::CameraFocus, "bokeh")
            .with_style(CategoryId::CameraDistance, "close_up")
            .with_style(CategoryId::Painters, "monet")
            .with_style(CategoryId::Headwear, "beret")
            .with_style(CategoryId::Clothing, "leather jacket")
            .with_style(CategoryId::Hairstyle, "braids")
            .with_style(CategoryId::HairColor, "blonde")
            .with_style(CategoryId::HairLength, "long");
        settings.reference_images.background = Some(IMAGE.to_string());
        settings
            .reference_images
            .push_additional(IMAGE.to_string())
            .unwrap();

        let prompt = compile(&settings, &sample_catalog()).to_string();
        let expected = [
            "(main subject: a person)".to_string(),
            format!(
                "(attributes: long hair, blonde, braided hair, leather jacket, red beret, {ADDITIONAL_REFERENCE_CLAUSE})"
            ),
            "(style: impressionist painting in the style of Claude Monet)".to_string(),
            "(composition: close-up portrait, shallow depth of field, low angle shot)".to_string(),
            format!("(setting: {BACKGROUND_REFERENCE_CLAUSE})"),
            "(lighting: golden hour light, neon signs)".to_string(),
            "(render: teal and orange grade, film grain)".to_string(),
        ]
        .join("\n");
        assert_eq!(prompt, expected);
    }

    #[test]
    fn empty_groups_never_render() {
        let mut settings = Settings::default().with_style(CategoryId::EffectsFx, "grain");
        settings.reference_images.background = Some(IMAGE.to_string());
        let prompt = compile(&settings, &sample_catalog()).to_string();
        assert!(!prompt.contains("()"));
        assert!(!prompt.contains(": )"));
        assert!(!prompt.starts_with('\n') && !prompt.ends_with('\n'));
        assert!(!prompt.contains("\n\n"));
        assert_eq!(prompt.lines().count(), 3);
    }

    #[test]
    fn compile_is_pure_and_ignores_transport_fields() {
        let catalog = sample_catalog();
        let settings = Settings::default()
            .with_style(CategoryId::HairColor, "blonde")
            .with_gender(Gender::Woman);
        let first = compile(&settings, &catalog);
        assert_eq!(compile(&settings, &catalog), first);

        let mut changed = settings.clone();
        changed.aspect_ratio = AspectRatio::Landscape16x9;
        changed.model = ModelType::Pro;
        assert_eq!(compile(&changed, &catalog), first);
    }
}
