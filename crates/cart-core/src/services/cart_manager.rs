//! Per-page cart service shared by the page controllers

use std::sync::Arc;

use tracing::{info, warn};

use super::badge::CartBadge;
use super::cart_store::CartStore;
use super::notification_queue::NotificationQueue;
use crate::domain::CartEntry;

/// Constructed once per page and handed to each controller. Every mutation
/// re-reads the store, applies the change and writes the whole list back.
#[derive(Clone)]
pub struct CartManager {
    store: Arc<CartStore>,
    notifier: NotificationQueue,
    badge: CartBadge,
}

impl CartManager {
    pub fn new(store: Arc<CartStore>, notifier: NotificationQueue, badge: CartBadge) -> Self {
        Self {
            store,
            notifier,
            badge,
        }
    }

    pub fn entries(&self) -> Vec<CartEntry> {
        self.store.read()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Sum of `basePrice × quantity`, unrounded.
    pub fn total(&self) -> f64 {
        self.entries().iter().map(CartEntry::line_total).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.store.item_count()
    }

    pub fn add(&self, entry: CartEntry) -> bool {
        let mut entries = self.store.read();
        if entries.iter().any(|e| e.id == entry.id) {
            warn!("Refusing to add duplicate cart entry id {}", entry.id);
            return false;
        }

        let name = entry.name.clone();
        entries.push(entry);
        if !self.store.write(&entries) {
            self.notifier.error("Could not add the item to your cart. Please try again.");
            return false;
        }

        info!("Added {} to cart ({} entries)", name, entries.len());
        self.badge.request_update();
        true
    }

    /// Remove the entry with `entry_id`; unknown ids leave the cart untouched.
    pub fn remove(&self, entry_id: &str) -> bool {
        let mut entries = self.store.read();
        let Some(position) = entries.iter().position(|e| e.id == entry_id) else {
            warn!("Cart entry {} not found, nothing removed", entry_id);
            return false;
        };

        let removed = entries.remove(position);
        if !self.store.write(&entries) {
            self.notifier.error("Could not update your cart. Please try again.");
            return false;
        }

        info!("Removed {} from cart", removed.name);
        self.notifier.info(format!("{} removed from cart", removed.name));
        self.badge.request_update();
        true
    }

    pub fn store(&self) -> &Arc<CartStore> {
        &self.store
    }

    pub fn notifier(&self) -> &NotificationQueue {
        &self.notifier
    }

    pub fn badge(&self) -> &CartBadge {
        &self.badge
    }
}
