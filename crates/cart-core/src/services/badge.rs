//! Debounced cart-count badge

use std::sync::Arc;
use std::time::Duration;

use cart_shared::constants::BADGE_DEBOUNCE_MS;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use super::cart_store::CartStore;
use crate::ports::BadgeView;

#[derive(Default)]
struct BadgeState {
    pending: bool,
    timer: Option<JoinHandle<()>>,
}

struct Inner {
    store: Arc<CartStore>,
    view: Arc<dyn BadgeView>,
    delay: Duration,
    state: Mutex<BadgeState>,
}

/// Batches bursts of update requests into one badge write per window.
/// The count is re-read from the store when the timer fires.
#[derive(Clone)]
pub struct CartBadge {
    inner: Arc<Inner>,
}

impl CartBadge {
    pub fn new(store: Arc<CartStore>, view: Arc<dyn BadgeView>) -> Self {
        Self::with_delay(store, view, Duration::from_millis(BADGE_DEBOUNCE_MS))
    }

    pub fn with_delay(store: Arc<CartStore>, view: Arc<dyn BadgeView>, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                view,
                delay,
                state: Mutex::new(BadgeState::default()),
            }),
        }
    }

    /// Mark the badge stale; the write happens once the window closes.
    pub fn request_update(&self) {
        let mut state = self.inner.state.lock();
        state.pending = true;
        if state.timer.is_some() {
            return;
        }

        let inner = self.inner.clone();
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            let fire = {
                let mut state = inner.state.lock();
                state.timer = None;
                std::mem::take(&mut state.pending)
            };
            if fire {
                write_count(&inner);
            }
        }));
    }

    /// Write the current count right away.
    pub fn refresh_now(&self) {
        self.inner.state.lock().pending = false;
        write_count(&self.inner);
    }

    pub fn is_pending(&self) -> bool {
        self.inner.state.lock().pending
    }

    /// Wait for a scheduled write, if any, to land.
    pub async fn settle(&self) {
        let timer = self.inner.state.lock().timer.take();
        if let Some(timer) = timer {
            let _ = timer.await;
        }
        if self.is_pending() {
            self.refresh_now();
        }
    }
}

fn write_count(inner: &Inner) {
    let count = inner.store.item_count();
    debug!("Cart badge count: {}", count);
    inner.view.set_count(count);
}
