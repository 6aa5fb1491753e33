//! Per-key call coalescing.
//!
//! [`Debouncer::schedule`] delays a call until no newer call for the same key
//! arrived within the delay. Only the most recent call for a key runs.
//! Earlier callers resolve to [`DebounceError::Superseded`] instead of
//! hanging, and callers whose timer was cancelled resolve to
//! [`DebounceError::Cancelled`].

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Default settle time before a debounced call fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Why a debounced call produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DebounceError {
    #[error("superseded by a newer call for the same key")]
    Superseded,

    #[error("cancelled before it ran")]
    Cancelled,
}

struct PendingCall<T> {
    generation: u64,
    timer: JoinHandle<()>,
    done: oneshot::Sender<Result<T, DebounceError>>,
}

type PendingMap<T> = Arc<Mutex<HashMap<String, PendingCall<T>>>>;

/// Coalesces calls per key.
pub struct Debouncer<T> {
    pending: PendingMap<T>,
    next_generation: AtomicU64,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` after `delay`, unless another call for `key` arrives first.
    ///
    /// A newer call for the same key restarts the delay and settles this
    /// call with [`DebounceError::Superseded`]. Once `f` has started it is
    /// no longer affected by newer calls.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(
        &self,
        key: &str,
        delay: Duration,
        f: F,
    ) -> impl Future<Output = Result<T, DebounceError>> + Send + use<T, F, Fut>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let (done, rx) = oneshot::channel();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        // Held across spawn + insert so the timer can never fire before its
        // own entry is registered.
        let mut pending = self.pending.lock();

        let timer = {
            let pending = Arc::clone(&self.pending);
            let key = key.to_string();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;

                let call = {
                    let mut pending = pending.lock();
                    match pending.get(&key) {
                        Some(call) if call.generation == generation => pending.remove(&key),
                        _ => None,
                    }
                };

                if let Some(call) = call {
                    let value = f().await;
                    let _ = call.done.send(Ok(value));
                }
            })
        };

        let call = PendingCall {
            generation,
            timer,
            done,
        };
        if let Some(previous) = pending.insert(key.to_string(), call) {
            tracing::debug!(key, "Debounced call superseded");
            Self::settle(previous, DebounceError::Superseded);
        }
        drop(pending);

        async move { rx.await.unwrap_or(Err(DebounceError::Cancelled)) }
    }

    /// Cancels the pending call for `key`. Returns whether one was pending.
    pub fn cancel(&self, key: &str) -> bool {
        let call = self.pending.lock().remove(key);
        let Some(call) = call else {
            return false;
        };
        Self::settle(call, DebounceError::Cancelled);
        true
    }

    /// Cancels every pending call. Returns how many were pending.
    pub fn cancel_all(&self) -> usize {
        let calls: Vec<_> = self.pending.lock().drain().map(|(_, call)| call).collect();
        let count = calls.len();
        for call in calls {
            Self::settle(call, DebounceError::Cancelled);
        }
        count
    }

    /// Number of calls still waiting for their timer.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    fn settle(call: PendingCall<T>, outcome: DebounceError) {
        call.timer.abort();
        let _ = call.done.send(Err(outcome));
    }
}
