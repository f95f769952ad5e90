//! Port traits for everything outside the cart logic

pub mod clock;
pub mod link_opener;
pub mod notification_sink;
pub mod storage;
pub mod views;

pub use clock::{Clock, ManualClock, SystemClock};
pub use link_opener::LinkOpener;
pub use notification_sink::NotificationSink;
pub use storage::{KeyValueStorage, MemoryStorage};
pub use views::{BadgeView, CartLineView, CartView, DetailView, OrderForm, ProductCard};
