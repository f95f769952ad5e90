//! Order outcomes

/// Validated customer details, phone already in local `0XXXXXXXXX` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
}

/// Result of a successful hand-off to the messaging application.
#[derive(Debug, Clone)]
pub struct SentOrder {
    pub order_number: u16,
    pub total: f64,
    pub message: String,
    pub link: String,
}
