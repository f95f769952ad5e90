//! TOML catalog loading

use std::path::Path;

use cart_core::Catalog;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Cannot read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Cannot parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid catalog entries: {}", .0.join(", "))]
    Invalid(Vec<String>),
}

pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = parse_catalog(&raw)?;
    info!(
        "Loaded catalog from {} ({} products)",
        path.display(),
        catalog.products.len()
    );
    Ok(catalog)
}

pub fn parse_catalog(raw: &str) -> Result<Catalog, CatalogError> {
    let catalog: Catalog = toml::from_str(raw)?;
    let invalid = catalog.invalid_entries();
    if !invalid.is_empty() {
        return Err(CatalogError::Invalid(invalid));
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
greens = ["Lettuce", "Tomato"]
sauces = ["BBQ"]

[[extras]]
name = "Cheese"
price = 10.0

[[drinks]]
name = "Coke"
price = 18.0

[products.classic-burger]
name = "Classic Burger"
description = "Flame-grilled beef"
price = 85.0
image = "images/classic-burger.jpg"

[products.chips]
name = "Chips"
price = 25.5
"#;

    #[test]
    fn test_parse_sample() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.products.len(), 2);
        assert_eq!(catalog.lookup("chips").unwrap().price, 25.5);
        assert!(catalog.lookup("pizza").is_none());
        assert_eq!(catalog.extra("Cheese").unwrap().price, 10.0);
        assert_eq!(catalog.greens, vec!["Lettuce", "Tomato"]);
    }

    #[test]
    fn test_negative_price_rejected() {
        let raw = "[products.free]\nname = \"Free\"\nprice = -1.0\n";
        let err = parse_catalog(raw).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(ref names) if names == &vec!["products.free".to_string()]));
    }

    #[test]
    fn test_missing_file_reported() {
        let err = load_catalog("no/such/catalog.toml").unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
