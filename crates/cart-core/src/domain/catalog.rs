//! Static product catalog

use std::collections::BTreeMap;

use cart_shared::constants::PLACEHOLDER_IMAGE;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    #[validate(length(min = 1))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    pub fn image_or_placeholder(&self) -> String {
        match self.image.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => PLACEHOLDER_IMAGE.to_string(),
        }
    }
}

/// An add-on the detail page offers, before a quantity is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AddonOption {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = 0.0))]
    pub price: f64,
}

/// Products keyed by id, plus the add-on menus shared by every product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub greens: Vec<String>,

    #[serde(default)]
    pub sauces: Vec<String>,

    #[serde(default)]
    pub extras: Vec<AddonOption>,

    #[serde(default)]
    pub drinks: Vec<AddonOption>,

    #[serde(default)]
    pub products: BTreeMap<String, Product>,
}

impl Catalog {
    pub fn lookup(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    pub fn extra(&self, name: &str) -> Option<&AddonOption> {
        self.extras.iter().find(|a| a.name == name)
    }

    pub fn drink(&self, name: &str) -> Option<&AddonOption> {
        self.drinks.iter().find(|a| a.name == name)
    }

    /// Names of entries that fail validation, formatted as `section.name`.
    pub fn invalid_entries(&self) -> Vec<String> {
        let mut invalid = Vec::new();
        for (id, product) in &self.products {
            if product.validate().is_err() {
                invalid.push(format!("products.{}", id));
            }
        }
        for extra in &self.extras {
            if extra.validate().is_err() {
                invalid.push(format!("extras.{}", extra.name));
            }
        }
        for drink in &self.drinks {
            if drink.validate().is_err() {
                invalid.push(format!("drinks.{}", drink.name));
            }
        }
        invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(image: Option<&str>) -> Product {
        Product {
            name: "Burger".to_string(),
            description: String::new(),
            price: 85.0,
            image: image.map(str::to_string),
        }
    }

    #[test]
    fn test_image_placeholder() {
        assert_eq!(product(None).image_or_placeholder(), PLACEHOLDER_IMAGE);
        assert_eq!(product(Some("  ")).image_or_placeholder(), PLACEHOLDER_IMAGE);
        assert_eq!(product(Some("img/b.jpg")).image_or_placeholder(), "img/b.jpg");
    }

    #[test]
    fn test_invalid_entries_reported() {
        let mut catalog = Catalog::default();
        catalog.products.insert("ok".to_string(), product(None));
        let mut bad = product(None);
        bad.price = -1.0;
        catalog.products.insert("bad".to_string(), bad);
        catalog.extras.push(AddonOption { name: String::new(), price: 5.0 });

        let invalid = catalog.invalid_entries();
        assert_eq!(invalid, vec!["products.bad".to_string(), "extras.".to_string()]);
    }
}
