//! Product detail page: selection state and "add to cart"

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{CartEntry, Catalog, LineAddon, Product, TransientUIState};
use crate::ports::{Clock, DetailView, ProductCard};
use crate::services::formatter::{encode_options, format_price};
use crate::services::CartManager;

struct LoadedProduct {
    id: String,
    product: Product,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddonKind {
    Extra,
    Drink,
}

pub struct DetailController {
    cart: CartManager,
    catalog: Arc<Catalog>,
    view: Arc<dyn DetailView>,
    clock: Arc<dyn Clock>,
    current: Option<LoadedProduct>,
    state: TransientUIState,
}

impl DetailController {
    pub fn new(
        cart: CartManager,
        catalog: Arc<Catalog>,
        view: Arc<dyn DetailView>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            cart,
            catalog,
            view,
            clock,
            current: None,
            state: TransientUIState::default(),
        }
    }

    /// Show `product_id`, or the not-found view. Selection state starts over.
    pub fn load(&mut self, product_id: &str) -> bool {
        self.state.reset();
        let Some(product) = self.catalog.lookup(product_id).cloned() else {
            warn!("Product {} not in catalog", product_id);
            self.current = None;
            self.view.render_not_found(product_id);
            return false;
        };

        self.view.render_product(&ProductCard {
            id: product_id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: format_price(product.price),
            image: product.image_or_placeholder(),
        });
        self.current = Some(LoadedProduct {
            id: product_id.to_string(),
            product,
        });
        self.render_selection();
        true
    }

    pub fn state(&self) -> &TransientUIState {
        &self.state
    }

    pub fn increment_quantity(&mut self) -> u32 {
        let quantity = self.state.increment_quantity();
        self.render_selection();
        quantity
    }

    pub fn decrement_quantity(&mut self) -> u32 {
        let quantity = self.state.decrement_quantity();
        self.render_selection();
        quantity
    }

    /// Change an extra's quantity by `delta`. `None` if the catalog has no such extra.
    pub fn adjust_extra(&mut self, name: &str, delta: i32) -> Option<u32> {
        self.adjust_addon(AddonKind::Extra, name, delta)
    }

    pub fn adjust_drink(&mut self, name: &str, delta: i32) -> Option<u32> {
        self.adjust_addon(AddonKind::Drink, name, delta)
    }

    fn adjust_addon(&mut self, kind: AddonKind, name: &str, delta: i32) -> Option<u32> {
        let option = match kind {
            AddonKind::Extra => self.catalog.extra(name),
            AddonKind::Drink => self.catalog.drink(name),
        };
        let Some(option) = option.cloned() else {
            warn!("Unknown {:?} add-on: {}", kind, name);
            return None;
        };

        let list = match kind {
            AddonKind::Extra => &mut self.state.extras,
            AddonKind::Drink => &mut self.state.drinks,
        };
        let quantity = TransientUIState::adjust_addon(list, &option.name, option.price, delta);
        self.render_selection();
        Some(quantity)
    }

    pub fn select_greens(&mut self, greens: Option<&str>) {
        self.state.greens = greens.map(str::to_string);
        self.render_selection();
    }

    pub fn select_sauce(&mut self, sauce: Option<&str>) {
        self.state.sauce = sauce.map(str::to_string);
        self.render_selection();
    }

    /// Product price plus every selected add-on, for one unit.
    pub fn unit_price(&self) -> f64 {
        match &self.current {
            Some(loaded) => loaded.product.price + self.state.addons_subtotal(),
            None => 0.0,
        }
    }

    /// Commit the current selection as one new cart entry.
    pub fn add_to_cart(&mut self) -> Option<CartEntry> {
        let Some(loaded) = &self.current else {
            warn!("Add to cart without a loaded product");
            return None;
        };

        let timestamp = self.clock.now_millis();
        let entry = CartEntry {
            id: CartEntry::generate_id(&loaded.id, timestamp),
            product_id: loaded.id.clone(),
            name: loaded.product.name.clone(),
            base_price: self.unit_price(),
            base_product_price: loaded.product.price,
            quantity: self.state.quantity,
            options: encode_options(self.state.greens.as_deref(), self.state.sauce.as_deref()),
            extras: LineAddon::prune(&self.state.extras),
            drinks: LineAddon::prune(&self.state.drinks),
            image: loaded.product.image_or_placeholder(),
            timestamp,
        };

        if !self.cart.add(entry.clone()) {
            return None;
        }

        debug!("Cart entry {} created", entry.id);
        self.cart.notifier().success(format!(
            "{} × {} added to cart",
            entry.quantity, entry.name
        ));
        self.state.reset();
        self.render_selection();
        Some(entry)
    }

    fn render_selection(&self) {
        let unit = self.unit_price();
        let total = unit * self.state.quantity as f64;
        self.view
            .render_selection(&self.state, &format_price(unit), &format_price(total));
    }
}
