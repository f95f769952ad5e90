//! FIFO of transient notifications, displayed one at a time

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use cart_shared::config::NotificationSettings;
use cart_shared::constants::{NOTIFICATION_EXIT_MS, NOTIFICATION_VISIBLE_MS};
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::debug;

use super::formatter::strip_angle_brackets;
use crate::domain::{NotificationKind, NotificationRequest};
use crate::ports::NotificationSink;

#[derive(Debug, Clone, Copy)]
pub struct NotificationTimings {
    pub visible: Duration,
    pub exit: Duration,
}

impl Default for NotificationTimings {
    fn default() -> Self {
        Self {
            visible: Duration::from_millis(NOTIFICATION_VISIBLE_MS),
            exit: Duration::from_millis(NOTIFICATION_EXIT_MS),
        }
    }
}

impl From<&NotificationSettings> for NotificationTimings {
    fn from(settings: &NotificationSettings) -> Self {
        Self {
            visible: Duration::from_millis(settings.visible_ms),
            exit: Duration::from_millis(settings.exit_ms),
        }
    }
}

#[derive(Default)]
struct QueueState {
    pending: VecDeque<NotificationRequest>,
    visible: bool,
    worker: Option<JoinHandle<()>>,
}

struct Inner {
    sink: Arc<dyn NotificationSink>,
    timings: NotificationTimings,
    state: Mutex<QueueState>,
    idle: Notify,
}

/// Cloneable handle; all clones share one queue and at most one display loop.
#[derive(Clone)]
pub struct NotificationQueue {
    inner: Arc<Inner>,
}

impl NotificationQueue {
    pub fn new(sink: Arc<dyn NotificationSink>, timings: NotificationTimings) -> Self {
        Self {
            inner: Arc::new(Inner {
                sink,
                timings,
                state: Mutex::new(QueueState::default()),
                idle: Notify::new(),
            }),
        }
    }

    /// Queue a message; starts the display loop when idle.
    /// Must be called from within a tokio runtime.
    pub fn enqueue(&self, message: impl AsRef<str>, kind: NotificationKind) {
        let request = NotificationRequest::new(strip_angle_brackets(message.as_ref()), kind);
        let mut state = self.inner.state.lock();
        state.pending.push_back(request);

        if state.worker.is_none() {
            let inner = self.inner.clone();
            state.worker = Some(tokio::spawn(display_loop(inner)));
        }
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.enqueue(message, NotificationKind::Success);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.enqueue(message, NotificationKind::Error);
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.enqueue(message, NotificationKind::Info);
    }

    pub fn is_idle(&self) -> bool {
        self.inner.state.lock().worker.is_none()
    }

    /// Messages waiting behind the visible one.
    pub fn pending(&self) -> usize {
        self.inner.state.lock().pending.len()
    }

    /// Resolve once every queued message has been shown and removed.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }
}

async fn display_loop(inner: Arc<Inner>) {
    loop {
        let (next, replace_visible) = {
            let mut state = inner.state.lock();
            match state.pending.pop_front() {
                Some(next) => {
                    let replace = state.visible;
                    state.visible = true;
                    (next, replace)
                }
                None => {
                    state.visible = false;
                    state.worker = None;
                    drop(state);
                    inner.idle.notify_waiters();
                    return;
                }
            }
        };

        if replace_visible {
            inner.sink.remove();
        }
        debug!("Showing {} notification", next.kind.as_str());
        inner.sink.show(&next);

        tokio::time::sleep(inner.timings.visible).await;
        inner.sink.begin_exit();
        tokio::time::sleep(inner.timings.exit).await;
        inner.sink.remove();
        inner.state.lock().visible = false;
    }
}
