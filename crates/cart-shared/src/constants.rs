//! Application-wide constants

/// Storage key holding the JSON array of cart entries.
pub const CART_STORAGE_KEY: &str = "cart";
pub const SCROLL_POSITION_KEY: &str = "scrollPosition";
pub const SCROLL_TIMESTAMP_KEY: &str = "scrollTimestamp";

pub const CART_CACHE_TTL_MS: i64 = 1_000;
pub const SCROLL_EXPIRY_MS: i64 = 300_000;

pub const NOTIFICATION_VISIBLE_MS: u64 = 3_000;
pub const NOTIFICATION_EXIT_MS: u64 = 300;
pub const BADGE_DEBOUNCE_MS: u64 = 50;
pub const SCROLL_SAVE_DEBOUNCE_MS: u64 = 250;
pub const SCROLL_THROTTLE_MS: i64 = 100;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 10;

pub const ORDER_NUMBER_MIN: u16 = 1000;
pub const ORDER_NUMBER_MAX: u16 = 9999;

pub const CURRENCY_SYMBOL: &str = "R";
pub const PLACEHOLDER_IMAGE: &str = "images/placeholder.jpg";
pub const OPTIONS_SEPARATOR: &str = " | ";
pub const GREENS_PREFIX: &str = "Greens:";
pub const SAUCES_PREFIX: &str = "Sauces:";
