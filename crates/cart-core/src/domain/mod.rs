//! # Cart Core - Domain Module
//!
//! Cart entries, catalog records, notifications, and order outcomes.

pub mod cart_entry;
pub mod catalog;
pub mod notification;
pub mod order;
pub mod selection;

pub use cart_entry::{CartEntry, LineAddon};
pub use catalog::{AddonOption, Catalog, Product};
pub use notification::{NotificationKind, NotificationRequest};
pub use order::{CustomerContact, SentOrder};
pub use selection::TransientUIState;
