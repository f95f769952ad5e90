//! Persistent cart store with a short read cache

use std::sync::Arc;

use cart_shared::constants::{CART_CACHE_TTL_MS, CART_STORAGE_KEY};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, error, warn};
use validator::Validate;

use crate::domain::CartEntry;
use crate::ports::{Clock, KeyValueStorage};

struct CachedCart {
    entries: Vec<CartEntry>,
    stamped_at_ms: i64,
}

/// The cart as one JSON array under a single storage key.
///
/// Reads are served from memory for `CART_CACHE_TTL_MS` after the last
/// storage read or write. Failures never escape: reads degrade to an empty
/// cart and writes report `false`.
pub struct CartStore {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    cache: Mutex<Option<CachedCart>>,
}

impl CartStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            cache: Mutex::new(None),
        }
    }

    pub fn read(&self) -> Vec<CartEntry> {
        let now = self.clock.now_millis();

        if let Some(cached) = self.cache.lock().as_ref() {
            if now - cached.stamped_at_ms < CART_CACHE_TTL_MS {
                return cached.entries.clone();
            }
        }

        let entries = match self.storage.get(CART_STORAGE_KEY) {
            Ok(Some(raw)) => decode_cart(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Failed to read cart from storage: {}", e);
                return Vec::new();
            }
        };

        *self.cache.lock() = Some(CachedCart {
            entries: entries.clone(),
            stamped_at_ms: now,
        });
        debug!("Loaded {} cart entries from storage", entries.len());
        entries
    }

    pub fn write(&self, entries: &[CartEntry]) -> bool {
        if let Some((entry, err)) = entries
            .iter()
            .find_map(|e| e.validate().err().map(|err| (e, err)))
        {
            warn!("Rejected cart write: entry {} is invalid: {}", entry.id, err);
            return false;
        }

        let raw = match serde_json::to_string(entries) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Failed to serialize cart: {}", e);
                return false;
            }
        };

        if let Err(e) = self.storage.set(CART_STORAGE_KEY, &raw) {
            error!("Failed to write cart to storage: {}", e);
            self.invalidate();
            return false;
        }

        *self.cache.lock() = Some(CachedCart {
            entries: entries.to_vec(),
            stamped_at_ms: self.clock.now_millis(),
        });
        debug!("Saved {} cart entries", entries.len());
        true
    }

    pub fn clear(&self) -> bool {
        self.write(&[])
    }

    pub fn invalidate(&self) {
        *self.cache.lock() = None;
    }

    /// Sum of entry quantities, as shown on the cart badge.
    pub fn item_count(&self) -> u32 {
        self.read().iter().map(|e| e.quantity).sum()
    }
}

fn decode_cart(raw: &str) -> Vec<CartEntry> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Stored cart is not valid JSON, treating as empty: {}", e);
            return Vec::new();
        }
    };

    if !value.is_array() {
        warn!("Stored cart is not a list, treating as empty");
        return Vec::new();
    }

    let entries: Vec<CartEntry> = match serde_json::from_value(value) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Stored cart has malformed entries, treating as empty: {}", e);
            return Vec::new();
        }
    };

    // Out-of-range entries would make every later write fail; drop them.
    entries
        .into_iter()
        .filter(|entry| match entry.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Dropping invalid stored cart entry {}: {}", entry.id, e);
                false
            }
        })
        .collect()
}
