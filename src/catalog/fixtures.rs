use crate::catalog::{Catalog, CategoryId, StyleCategory, StyleOption};

fn category(id: CategoryId, options: Vec<StyleOption>) -> StyleCategory {
    let mut all = vec![StyleOption::new("none", "None")];
    all.extend(options);
    StyleCategory::new(id, id.as_str(), all)
}

pub(crate) fn sample_catalog() -> Catalog {
    Catalog::from_categories(vec![
        category(
            CategoryId::Subject,
            vec![StyleOption::new("warrior", "Warrior").with_prompt_value("a battle-worn warrior")],
        ),
        category(CategoryId::HairLength, vec![StyleOption::new("long", "long hair")]),
        category(CategoryId::HairColor, vec![StyleOption::new("blonde", "blonde")]),
        category(CategoryId::Hairstyle, vec![StyleOption::new("braids", "braided hair")]),
        category(
            CategoryId::Clothing,
            vec![StyleOption::new("leather jacket", "leather jacket")],
        ),
        category(CategoryId::Headwear, vec![StyleOption::new("beret", "red beret")]),
        category(
            CategoryId::Painters,
            vec![StyleOption::new("monet", "Claude Monet")
                .with_prompt_value("impressionist painting in the style of Claude Monet")],
        ),
        category(
            CategoryId::CameraDistance,
            vec![StyleOption::new("close_up", "Close-up").with_prompt_value("close-up portrait")],
        ),
        category(CategoryId::CameraFocus, vec![StyleOption::new("bokeh", "shallow depth of field")]),
        category(CategoryId::CameraPosition, vec![StyleOption::new("low", "low angle shot")]),
        category(
            CategoryId::LightSettings,
            vec![StyleOption::new("golden", "Golden hour").with_prompt_value("golden hour light")],
        ),
        category(
            CategoryId::LightSources,
            vec![
                StyleOption::new("sunset", "Sunset").with_prompt_value("golden hour light"),
                StyleOption::new("neon", "neon signs"),
            ],
        ),
        category(CategoryId::FiltersColors, vec![StyleOption::new("teal", "teal and orange grade")]),
        category(CategoryId::EffectsFx, vec![StyleOption::new("grain", "film grain")]),
    ])
}
