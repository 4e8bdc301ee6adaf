pub mod loader;
pub mod types;

pub use loader::{load_catalog, parse_catalog};
pub use types::{Catalog, CategoryId, StyleCategory, StyleOption, NONE_OPTION_ID};

#[cfg(test)]
pub(crate) mod fixtures;
