use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::types::{Catalog, CategoryId, StyleCategory, StyleOption};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Wrapped { categories: Vec<CategoryEntry> },
    Bare(Vec<CategoryEntry>),
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    options: Vec<StyleOption>,
}

pub fn parse_catalog(raw: &str) -> Result<Catalog> {
    let parsed: CatalogFile =
        serde_json::from_str(raw).context("style catalog is not valid JSON")?;
    let entries = match parsed {
        CatalogFile::Wrapped { categories } => categories,
        CatalogFile::Bare(categories) => categories,
    };

    let mut categories = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(id) = CategoryId::parse(&entry.id) else {
            warn!(
                "Skipping catalog category '{}': not used by the prompt compiler",
                entry.id
            );
            continue;
        };

        let options = entry
            .options
            .into_iter()
            .filter(|option| {
                let keep = !option.id.trim().is_empty();
                if !keep {
                    warn!("Skipping option without id in category '{}'", id);
                }
                keep
            })
            .collect::<Vec<_>>();

        categories.push(StyleCategory {
            id,
            name: entry.name.trim().to_string(),
            description: entry.description,
            options,
        });
    }

    Ok(Catalog::from_categories(categories))
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read style catalog at {}", path.display()))?;
    let catalog = parse_catalog(&raw)
        .with_context(|| format!("failed to parse style catalog at {}", path.display()))?;
    info!(
        "Loaded {} style categor{} from {}",
        catalog.len(),
        if catalog.len() == 1 { "y" } else { "ies" },
        path.display()
    );
    Ok(catalog)
}
