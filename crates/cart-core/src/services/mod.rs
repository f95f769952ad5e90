//! Cart services (business logic)

pub mod badge;
pub mod cart_manager;
pub mod cart_store;
pub mod formatter;
pub mod notification_queue;
pub mod order_composer;
pub mod order_number;
pub mod scroll;

pub use badge::CartBadge;
pub use cart_manager::CartManager;
pub use cart_store::CartStore;
pub use notification_queue::{NotificationQueue, NotificationTimings};
pub use order_composer::OrderComposer;
pub use order_number::{FixedOrderNumber, OrderNumberSource, RandomOrderNumber};
pub use scroll::ScrollMemory;
