//! Rendering and form surfaces driven by the page controllers

use crate::domain::TransientUIState;

/// One rendered line of the cart list.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
    pub options_html: String,
    pub options_text: String,
    pub image: String,
}

pub trait CartView: Send + Sync {
    fn render_items(&self, lines: &[CartLineView], total: &str);
    fn render_empty(&self);
}

pub trait BadgeView: Send + Sync {
    fn set_count(&self, count: u32);
}

/// Customer name, phone and instruction inputs of the listing page.
pub trait OrderForm: Send + Sync {
    fn name(&self) -> String;
    fn phone(&self) -> String;
    fn instructions(&self) -> String;
    fn clear(&self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
}

pub trait DetailView: Send + Sync {
    fn render_product(&self, card: &ProductCard);
    fn render_not_found(&self, product_id: &str);
    fn render_selection(&self, state: &TransientUIState, unit_price: &str, total: &str);
}
