//! # Cart Shared
//!
//! Configuration, constants, telemetry, and small helpers shared by the cart crates.

pub mod constants;
pub mod utils;
pub mod telemetry;
pub mod config;
pub mod error;

pub use config::Settings;
pub use error::AppError;
