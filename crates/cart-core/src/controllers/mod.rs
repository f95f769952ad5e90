//! Page controllers: wire user actions to the cart services

pub mod detail;
pub mod listing;

pub use detail::DetailController;
pub use listing::ListingController;
