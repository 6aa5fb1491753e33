use parking_lot::Mutex;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

use super::Priority;
use crate::clock::Clock;
use crate::translation::{RemoteError, TranslationBackend};

/// Pause between two consecutive remote calls.
pub const DEFAULT_ITEM_DELAY: Duration = Duration::from_millis(200);

/// Upper bound on a single remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Number of leading characters of the text that go into a request id.
const ID_TEXT_PREFIX: usize = 50;

type Completion = oneshot::Sender<Result<String, RemoteError>>;

struct QueueItem {
    id: String,
    text: String,
    from: String,
    to: String,
    priority: Priority,
    seq: u64,
    done: Completion,
}

#[derive(Default)]
struct QueueState {
    items: Vec<QueueItem>,
    in_flight: HashSet<String>,
    processing: bool,
    next_seq: u64,
}

struct QueueInner {
    state: Mutex<QueueState>,
    backend: Arc<dyn TranslationBackend>,
    clock: Arc<dyn Clock>,
    item_delay: Duration,
    timeout: Duration,
}

/// A single-consumer queue in front of the translation backend.
///
/// At most one remote call is outstanding at any time. Waiting items are
/// served highest priority first, then in submission order, with
/// `item_delay` between consecutive calls.
#[derive(Clone)]
pub struct TranslationQueue {
    inner: Arc<QueueInner>,
}

/// The caller's handle on a submitted translation.
#[derive(Debug)]
pub enum QueueTicket {
    /// Duplicate of a request already in flight; carries the untranslated text.
    Ready(String),
    Waiting(oneshot::Receiver<Result<String, RemoteError>>),
}

impl QueueTicket {
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub async fn wait(self) -> Result<String, RemoteError> {
        match self {
            Self::Ready(text) => Ok(text),
            Self::Waiting(rx) => rx.await.unwrap_or(Err(RemoteError::Cancelled)),
        }
    }
}

impl TranslationQueue {
    pub fn new(
        backend: Arc<dyn TranslationBackend>,
        clock: Arc<dyn Clock>,
        item_delay: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState::default()),
                backend,
                clock,
                item_delay,
                timeout,
            }),
        }
    }

    /// Submits a translation and starts the consumer if it is idle.
    ///
    /// A request whose id is already in flight is not queued again: the
    /// returned ticket resolves to `text` unchanged. That answer is
    /// provisional and must not be cached.
    ///
    /// Must be called from within a tokio runtime.
    pub fn enqueue(&self, text: &str, from: &str, to: &str, priority: Priority) -> QueueTicket {
        let id = request_id(from, to, text, self.inner.clock.now_ms());
        let (done, rx) = oneshot::channel();

        let start_consumer = {
            let mut state = self.inner.state.lock();

            if !state.in_flight.insert(id.clone()) {
                tracing::debug!(%id, "Request already in flight, returning original text");
                return QueueTicket::Ready(text.to_string());
            }

            let seq = state.next_seq;
            state.next_seq += 1;
            state.items.push(QueueItem {
                id,
                text: text.to_string(),
                from: from.to_string(),
                to: to.to_string(),
                priority,
                seq,
                done,
            });

            !std::mem::replace(&mut state.processing, true)
        };

        if start_consumer {
            tokio::spawn(Arc::clone(&self.inner).run());
        }

        QueueTicket::Waiting(rx)
    }

    /// Drops every waiting item. Their callers observe [`RemoteError::Cancelled`].
    ///
    /// The call currently being made, if any, is not affected.
    pub fn clear(&self) -> usize {
        let mut state = self.inner.state.lock();
        let dropped: Vec<QueueItem> = state.items.drain(..).collect();
        for item in &dropped {
            state.in_flight.remove(&item.id);
        }

        tracing::debug!(dropped = dropped.len(), "Cleared translation queue");
        dropped.len()
    }

    /// Number of items waiting to be sent.
    pub fn len(&self) -> usize {
        self.inner.state.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_processing(&self) -> bool {
        self.inner.state.lock().processing
    }
}

impl QueueInner {
    async fn run(self: Arc<Self>) {
        while let Some(item) = self.next_item() {
            tracing::debug!(id = %item.id, priority = %item.priority, "Sending translation request");

            let call = self.backend.translate(&item.text, &item.from, &item.to);
            let result = tokio::time::timeout(self.timeout, call)
                .await
                .unwrap_or(Err(RemoteError::Timeout(self.timeout)));

            if let Err(e) = &result {
                tracing::warn!(id = %item.id, error = %e, "Queued translation failed");
            }

            let more = {
                let mut state = self.state.lock();
                state.in_flight.remove(&item.id);
                !state.items.is_empty()
            };

            // The caller may have gone away; nothing to do then.
            let _ = item.done.send(result);

            if more {
                tokio::time::sleep(self.item_delay).await;
            }
        }
    }

    /// Pops the most urgent item, or marks the consumer idle.
    fn next_item(&self) -> Option<QueueItem> {
        let mut state = self.state.lock();

        if state.items.is_empty() {
            state.processing = false;
            return None;
        }

        state
            .items
            .sort_by_key(|item| (Reverse(item.priority), item.seq));
        Some(state.items.remove(0))
    }
}

fn request_id(from: &str, to: &str, text: &str, submitted_ms: u64) -> String {
    let prefix: String = text.chars().take(ID_TEXT_PREFIX).collect();
    format!("{from}-{to}-{prefix}-{submitted_ms}")
}
