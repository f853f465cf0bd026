//! Fixed-delay debouncing, last call wins.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Delay between the last keystroke and the search it triggers.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

type Action<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Delays `action` until calls stop arriving for `delay`.
///
/// Every [`call`](Self::call) aborts the previously scheduled timer and bumps a
/// generation counter; a timer only runs the action if its generation is still
/// the latest when it wakes, so an abort that loses the race still cannot fire.
/// Must be called from within a tokio runtime.
pub struct Debouncer<T> {
    delay: Duration,
    action: Action<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
    generation: Arc<AtomicU64>,
}

impl<T> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            action: Arc::new(action),
            pending: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Schedule `value`, replacing whatever was pending.
    pub fn call(&self, value: T) {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let action = Arc::clone(&self.action);
        let delay = self.delay;

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) == ticket {
                action(value);
            } else {
                trace!(ticket, "Debounced call superseded.");
            }
        });

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Drop the pending call, if any, without running it.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.abort_pending();
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl<T> Debouncer<T> {
    fn abort_pending(&self) {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = pending {
            task.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.abort_pending();
    }
}
