//! Domain errors

use thiserror::Error;

/// Failure reported by a key-value storage adapter.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage content corrupt: {0}")]
    Corrupt(String),
}

/// Failure reported when handing a link to the messaging application.
#[derive(Error, Debug)]
pub enum OpenError {
    #[error("Opening the link was blocked")]
    Blocked,

    #[error("Opening the link failed: {0}")]
    Failed(String),
}

/// Why an order was not sent. `Display` is the text shown to the customer.
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Your cart is empty. Add some items before placing an order.")]
    EmptyCart,

    #[error("Please enter your name and phone number.")]
    MissingContact,

    #[error("Please enter a valid South African phone number (e.g. 0821234567).")]
    InvalidPhone,

    #[error("Pop-up blocked. Please allow pop-ups to send your order via WhatsApp.")]
    LinkBlocked,

    #[error("Could not open WhatsApp. Please try again.")]
    LinkFailed(String),
}

impl From<OpenError> for OrderError {
    fn from(err: OpenError) -> Self {
        match err {
            OpenError::Blocked => OrderError::LinkBlocked,
            OpenError::Failed(reason) => OrderError::LinkFailed(reason),
        }
    }
}
