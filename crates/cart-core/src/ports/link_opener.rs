//! Hand-off to the external messaging application

use async_trait::async_trait;

use crate::error::OpenError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkOpener: Send + Sync {
    /// Open `url` in a new browsing context. `Ok` means the open was confirmed.
    async fn open(&self, url: &str) -> Result<(), OpenError>;
}
