//! Cart entry domain entity

use cart_shared::constants::{MAX_QUANTITY, MIN_QUANTITY, PLACEHOLDER_IMAGE};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// A priced add-on (extra or drink) attached to a cart entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LineAddon {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[validate(range(min = 1, max = 10))]
    pub quantity: u32,
}

impl LineAddon {
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// Drop zero-quantity selections; stored entries never carry them.
    pub fn prune(addons: &[LineAddon]) -> Vec<LineAddon> {
        addons.iter().filter(|a| a.quantity > 0).cloned().collect()
    }
}

/// One configured, quantity-bearing product line awaiting order submission.
///
/// Field names are persisted in camelCase to keep the stored document
/// compatible with the browser layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    #[validate(length(min = 1))]
    pub id: String,
    pub product_id: String,
    pub name: String,

    /// Unit price including the extras and drinks chosen at add time.
    #[validate(range(min = 0.0))]
    pub base_price: f64,
    pub base_product_price: f64,

    #[validate(range(min = 1, max = 10))]
    pub quantity: u32,

    /// `" | "`-joined `Key: value` pairs (`Greens:`, `Sauces:`).
    #[serde(default)]
    pub options: String,

    #[serde(default)]
    #[validate(nested)]
    pub extras: Vec<LineAddon>,

    #[serde(default)]
    #[validate(nested)]
    pub drinks: Vec<LineAddon>,

    /// Missing, `null` or blank images read back as the placeholder.
    #[serde(default = "default_image", deserialize_with = "image_or_placeholder")]
    pub image: String,

    #[serde(default)]
    pub timestamp: i64,
}

fn default_image() -> String {
    PLACEHOLDER_IMAGE.to_string()
}

fn image_or_placeholder<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let image = Option::<String>::deserialize(deserializer)?;
    Ok(match image {
        Some(path) if !path.trim().is_empty() => path,
        _ => default_image(),
    })
}

impl CartEntry {
    pub fn line_total(&self) -> f64 {
        self.base_price * self.quantity as f64
    }

    pub fn has_customizations(&self) -> bool {
        !self.options.trim().is_empty() || !self.extras.is_empty() || !self.drinks.is_empty()
    }

    pub fn quantity_in_range(quantity: u32) -> bool {
        (MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity)
    }

    /// `<product id>-<timestamp ms>-<random suffix>`
    pub fn generate_id(product_id: &str, timestamp_ms: i64) -> String {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        format!("{}-{}-{}", product_id, timestamp_ms, suffix)
    }
}
