//! Listing page: cart list, removal, and order sending

use std::sync::Arc;

use crate::domain::{CartEntry, SentOrder};
use crate::error::OrderError;
use crate::ports::{CartLineView, CartView, OrderForm};
use crate::services::formatter::{format_options_html, format_options_text, format_price};
use crate::services::{CartManager, OrderComposer};

/// Re-renders the whole list and total after every cart change.
pub struct ListingController {
    cart: CartManager,
    composer: Arc<OrderComposer>,
    view: Arc<dyn CartView>,
}

impl ListingController {
    pub fn new(cart: CartManager, composer: Arc<OrderComposer>, view: Arc<dyn CartView>) -> Self {
        Self {
            cart,
            composer,
            view,
        }
    }

    pub fn render(&self) {
        let entries = self.cart.entries();
        if entries.is_empty() {
            self.view.render_empty();
            return;
        }

        let lines: Vec<CartLineView> = entries.iter().map(line_view).collect();
        let total: f64 = entries.iter().map(CartEntry::line_total).sum();
        self.view.render_items(&lines, &format_price(total));
    }

    pub fn remove(&self, entry_id: &str) -> bool {
        let removed = self.cart.remove(entry_id);
        self.render();
        removed
    }

    pub async fn send(&self, form: &dyn OrderForm) -> Result<SentOrder, OrderError> {
        let result = self.composer.compose_and_send(form).await;
        if result.is_ok() {
            self.render();
            self.cart.badge().request_update();
        }
        result
    }
}

fn line_view(entry: &CartEntry) -> CartLineView {
    CartLineView {
        id: entry.id.clone(),
        name: entry.name.clone(),
        quantity: entry.quantity,
        line_total: format_price(entry.line_total()),
        options_html: format_options_html(entry),
        options_text: format_options_text(entry),
        image: entry.image.clone(),
    }
}
