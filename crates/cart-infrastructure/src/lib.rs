//! # Cart Infrastructure
//!
//! Adapters for the cart-core ports: file-backed storage, link openers,
//! the TOML catalog, and terminal views.

pub mod catalog_loader;
pub mod opener;
pub mod storage;
pub mod terminal;

pub use catalog_loader::{load_catalog, CatalogError};
pub use opener::{PrintLinkOpener, SystemLinkOpener};
pub use storage::JsonFileStorage;
pub use terminal::{TerminalCartView, TerminalDetailView, TerminalForm, TerminalNotifications};
