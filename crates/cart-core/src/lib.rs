//! # Cart Core
//!
//! Cart entries, the persistent cart store, the notification queue, the
//! formatter and the order composer, plus the page controllers that drive them.

pub mod domain;
pub mod ports;
pub mod services;
pub mod controllers;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{OpenError, OrderError, StorageError};
