//! Scroll-position memory for returning to the listing page

use std::sync::Arc;
use std::time::Duration;

use cart_shared::constants::{
    SCROLL_EXPIRY_MS, SCROLL_POSITION_KEY, SCROLL_SAVE_DEBOUNCE_MS, SCROLL_THROTTLE_MS,
    SCROLL_TIMESTAMP_KEY,
};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::ports::{Clock, KeyValueStorage};

#[derive(Default)]
struct ScrollState {
    last_accepted_ms: Option<i64>,
    pending_offset: Option<f64>,
    timer: Option<JoinHandle<()>>,
}

struct Inner {
    storage: Arc<dyn KeyValueStorage>,
    clock: Arc<dyn Clock>,
    state: Mutex<ScrollState>,
}

/// Throttled scroll handler feeding a debounced save of the offset and
/// its timestamp. Saved offsets older than `SCROLL_EXPIRY_MS` are ignored.
#[derive(Clone)]
pub struct ScrollMemory {
    inner: Arc<Inner>,
}

impl ScrollMemory {
    pub fn new(storage: Arc<dyn KeyValueStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                storage,
                clock,
                state: Mutex::new(ScrollState::default()),
            }),
        }
    }

    /// Scroll event. Returns `false` when dropped by the throttle.
    pub fn on_scroll(&self, offset: f64) -> bool {
        let now = self.inner.clock.now_millis();
        {
            let mut state = self.inner.state.lock();
            if let Some(last) = state.last_accepted_ms {
                if now - last < SCROLL_THROTTLE_MS {
                    return false;
                }
            }
            state.last_accepted_ms = Some(now);
        }
        self.schedule_save(offset);
        true
    }

    /// Save `offset` once the debounce window closes; later calls in the
    /// same window replace the offset that gets written.
    pub fn schedule_save(&self, offset: f64) {
        let mut state = self.inner.state.lock();
        state.pending_offset = Some(offset);
        if state.timer.is_some() {
            return;
        }

        let inner = self.inner.clone();
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(SCROLL_SAVE_DEBOUNCE_MS)).await;
            let offset = {
                let mut state = inner.state.lock();
                state.timer = None;
                state.pending_offset.take()
            };
            if let Some(offset) = offset {
                save(&inner, offset);
            }
        }));
    }

    pub fn save_now(&self, offset: f64) -> bool {
        self.inner.state.lock().pending_offset = None;
        save(&self.inner, offset)
    }

    /// Saved offset, if present and still fresh. Stale entries are removed.
    pub fn restore(&self) -> Option<f64> {
        let storage = &self.inner.storage;
        let offset = storage.get(SCROLL_POSITION_KEY).ok().flatten()?;
        let saved_at = storage.get(SCROLL_TIMESTAMP_KEY).ok().flatten()?;

        let (Ok(offset), Ok(saved_at)) = (offset.parse::<f64>(), saved_at.parse::<i64>()) else {
            warn!("Discarding unreadable scroll position");
            self.forget();
            return None;
        };

        if self.inner.clock.now_millis() - saved_at > SCROLL_EXPIRY_MS {
            debug!("Saved scroll position expired");
            self.forget();
            return None;
        }
        Some(offset)
    }

    pub fn forget(&self) {
        let storage = &self.inner.storage;
        if let Err(e) = storage
            .remove(SCROLL_POSITION_KEY)
            .and_then(|_| storage.remove(SCROLL_TIMESTAMP_KEY))
        {
            warn!("Failed to clear scroll position: {}", e);
        }
    }

    /// Wait for a scheduled save, if any, to land.
    pub async fn settle(&self) {
        let timer = self.inner.state.lock().timer.take();
        if let Some(timer) = timer {
            let _ = timer.await;
        }
        let leftover = self.inner.state.lock().pending_offset.take();
        if let Some(offset) = leftover {
            save(&self.inner, offset);
        }
    }
}

fn save(inner: &Inner, offset: f64) -> bool {
    let now = inner.clock.now_millis();
    let result = inner
        .storage
        .set(SCROLL_POSITION_KEY, &offset.to_string())
        .and_then(|_| inner.storage.set(SCROLL_TIMESTAMP_KEY, &now.to_string()));
    match result {
        Ok(()) => {
            debug!("Saved scroll position {}", offset);
            true
        }
        Err(e) => {
            warn!("Failed to save scroll position: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ManualClock, MemoryStorage};

    fn memory() -> (ScrollMemory, Arc<MemoryStorage>, Arc<ManualClock>) {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(10_000));
        (ScrollMemory::new(storage.clone(), clock.clone()), storage, clock)
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_drops_rapid_events() {
        let (scroll, _, clock) = memory();
        assert!(scroll.on_scroll(10.0));
        clock.advance(50);
        assert!(!scroll.on_scroll(20.0));
        clock.advance(50);
        assert!(scroll.on_scroll(30.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounced_save_writes_latest_offset() {
        let (scroll, storage, clock) = memory();
        scroll.on_scroll(100.0);
        clock.advance(150);
        scroll.on_scroll(240.0);

        assert!(storage.get(SCROLL_POSITION_KEY).unwrap().is_none());
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(storage.get(SCROLL_POSITION_KEY).unwrap().as_deref(), Some("240"));
        assert_eq!(scroll.restore(), Some(240.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_position_ignored_and_removed() {
        let (scroll, storage, clock) = memory();
        assert!(scroll.save_now(512.0));

        clock.advance(SCROLL_EXPIRY_MS);
        assert_eq!(scroll.restore(), Some(512.0));

        clock.advance(1);
        assert_eq!(scroll.restore(), None);
        assert!(storage.get(SCROLL_POSITION_KEY).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_garbage_position_discarded() {
        let (scroll, storage, _) = memory();
        storage.set(SCROLL_POSITION_KEY, "abc").unwrap();
        storage.set(SCROLL_TIMESTAMP_KEY, "10000").unwrap();
        assert_eq!(scroll.restore(), None);
        assert!(storage.get(SCROLL_TIMESTAMP_KEY).unwrap().is_none());
    }
}
