//! Per-page selection state of the detail page

use cart_shared::constants::{MAX_QUANTITY, MIN_QUANTITY};

use super::cart_entry::LineAddon;

/// Quantity, add-ons and radio choices made before "add to cart".
/// Never persisted; reset on product load and after a successful add.
#[derive(Debug, Clone, PartialEq)]
pub struct TransientUIState {
    pub quantity: u32,
    pub extras: Vec<LineAddon>,
    pub drinks: Vec<LineAddon>,
    pub greens: Option<String>,
    pub sauce: Option<String>,
}

impl Default for TransientUIState {
    fn default() -> Self {
        Self {
            quantity: MIN_QUANTITY,
            extras: Vec::new(),
            drinks: Vec::new(),
            greens: None,
            sauce: None,
        }
    }
}

impl TransientUIState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn increment_quantity(&mut self) -> u32 {
        self.quantity = (self.quantity + 1).min(MAX_QUANTITY);
        self.quantity
    }

    pub fn decrement_quantity(&mut self) -> u32 {
        self.quantity = self.quantity.saturating_sub(1).max(MIN_QUANTITY);
        self.quantity
    }

    /// Sum of selected add-on prices for one unit.
    pub fn addons_subtotal(&self) -> f64 {
        self.extras
            .iter()
            .chain(self.drinks.iter())
            .map(LineAddon::subtotal)
            .sum()
    }

    /// Apply `delta` to the named add-on in `list`, clamped to `0..=MAX_QUANTITY`.
    pub fn adjust_addon(list: &mut Vec<LineAddon>, name: &str, price: f64, delta: i32) -> u32 {
        let position = match list.iter().position(|a| a.name == name) {
            Some(position) => position,
            None => {
                list.push(LineAddon::new(name, price, 0));
                list.len() - 1
            }
        };
        let addon = &mut list[position];
        let next = (addon.quantity as i64 + delta as i64).clamp(0, MAX_QUANTITY as i64);
        addon.quantity = next as u32;
        addon.quantity
    }
}
