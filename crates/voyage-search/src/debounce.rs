//! Trailing debounce on tokio timers.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::AbortHandle;

/// Runs an action once `delay` has passed without another `schedule` call.
///
/// Only one timer is outstanding; scheduling aborts the pending one.
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<AbortHandle>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the timer with `action` as the new trailing action.
    pub fn schedule<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // Deadline is fixed now, not when the task is first polled
        let deadline = tokio::time::Instant::now() + self.delay;
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            action();
        });
        *pending = Some(handle.abort_handle());
    }

    /// Drop the pending action, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
