use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use super::CACHE_STORAGE_KEY;
use crate::clock::Clock;
use crate::storage::KeyValueStore;

/// How long a cached translation stays valid.
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Writes to the durable store are coalesced into at most one per window.
pub const FLUSH_DELAY: Duration = Duration::from_secs(1);

/// A cached translation.
///
/// `expires_at` is always `created_at + CACHE_TTL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub value: String,
    pub created_at: u64,
    pub expires_at: u64,
}

impl CacheEntry {
    fn new(value: String, now_ms: u64) -> Self {
        Self {
            value,
            created_at: now_ms,
            expires_at: now_ms + CACHE_TTL.as_millis() as u64,
        }
    }

    pub const fn is_valid_at(&self, now_ms: u64) -> bool {
        self.expires_at > now_ms
    }
}

/// Entry counts split by validity at the time of the call.
///
/// Expired entries that were skipped on load but are still in the durable
/// record count as expired until the next write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryCounts {
    pub valid: usize,
    pub expired: usize,
    pub total: usize,
}

/// In-memory translation cache mirrored to a durable store.
///
/// Reads never touch the store. Writes land in memory immediately and are
/// flushed to the store once per [`FLUSH_DELAY`] window, so a crash inside
/// the window loses the most recent entries. Clones share state.
#[derive(Clone)]
pub struct TranslationCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    entries: Mutex<HashMap<String, CacheEntry>>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    flush_scheduled: AtomicBool,
    /// Expired entries left in the durable record by the last load.
    stale_on_disk: AtomicUsize,
}

impl TranslationCache {
    /// Loads the persisted entries, dropping everything already expired.
    ///
    /// A missing or unreadable record yields an empty cache. Dropped entries
    /// stay in the durable record until the next write and are reported by
    /// [`counts`](Self::counts) and [`cleanup_expired`](Self::cleanup_expired).
    pub fn load(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now_ms();
        let mut stale = 0;
        let entries = match store.get(CACHE_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<HashMap<String, CacheEntry>>(&raw) {
                Ok(stored) => {
                    let total = stored.len();
                    let valid: HashMap<_, _> = stored
                        .into_iter()
                        .filter(|(_, entry)| entry.is_valid_at(now))
                        .collect();
                    stale = total - valid.len();
                    valid
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable translation cache");
                    HashMap::new()
                }
            },
            Ok(None) => HashMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load translation cache");
                HashMap::new()
            }
        };

        tracing::debug!(entries = entries.len(), stale, "Loaded translation cache");

        Self {
            inner: Arc::new(CacheInner {
                entries: Mutex::new(entries),
                store,
                clock,
                flush_scheduled: AtomicBool::new(false),
                stale_on_disk: AtomicUsize::new(stale),
            }),
        }
    }

    /// Returns the cached value if the entry exists and has not expired.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = self.inner.clock.now_ms();
        self.inner
            .entries
            .lock()
            .get(key)
            .filter(|entry| entry.is_valid_at(now))
            .map(|entry| entry.value.clone())
    }

    pub fn is_valid(&self, key: &str) -> bool {
        let now = self.inner.clock.now_ms();
        self.inner
            .entries
            .lock()
            .get(key)
            .is_some_and(|entry| entry.is_valid_at(now))
    }

    /// Stores `value` with a fresh TTL window starting now.
    pub fn set(&self, key: &str, value: &str) {
        let entry = CacheEntry::new(value.to_string(), self.inner.clock.now_ms());
        self.inner.entries.lock().insert(key.to_string(), entry);
        self.schedule_flush();
    }

    /// Physically removes expired entries, including those skipped on load.
    /// Returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.inner.clock.now_ms();
        let removed = {
            let mut entries = self.inner.entries.lock();
            let before = entries.len();
            entries.retain(|_, entry| entry.is_valid_at(now));
            before - entries.len()
        } + self.inner.stale_on_disk.swap(0, Ordering::AcqRel);

        if removed > 0 {
            tracing::debug!(removed, "Cleaned up expired cache entries");
            self.schedule_flush();
        }

        removed
    }

    /// Drops every entry and the durable record.
    pub fn clear(&self) {
        self.inner.entries.lock().clear();
        self.inner.stale_on_disk.store(0, Ordering::Release);
        if let Err(e) = self.inner.store.remove(CACHE_STORAGE_KEY) {
            tracing::warn!(error = %e, "Failed to remove persisted translation cache");
        }
    }

    pub fn counts(&self) -> EntryCounts {
        let now = self.inner.clock.now_ms();
        let stale = self.inner.stale_on_disk.load(Ordering::Acquire);
        let entries = self.inner.entries.lock();
        let valid = entries.values().filter(|e| e.is_valid_at(now)).count();

        EntryCounts {
            valid,
            expired: entries.len() - valid + stale,
            total: entries.len() + stale,
        }
    }

    /// Writes the current entries to the store right away.
    pub fn flush(&self) {
        self.inner.flush();
    }

    fn schedule_flush(&self) {
        if self.inner.flush_scheduled.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let inner = Arc::clone(&self.inner);
            handle.spawn(async move {
                tokio::time::sleep(FLUSH_DELAY).await;
                inner.flush_scheduled.store(false, Ordering::Release);
                inner.flush();
            });
        } else {
            self.inner.flush_scheduled.store(false, Ordering::Release);
            self.inner.flush();
        }
    }
}

impl CacheInner {
    fn flush(&self) {
        let snapshot = self.entries.lock().clone();

        let serialized = match serde_json::to_string(&snapshot) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize translation cache");
                return;
            }
        };

        match self.store.set(CACHE_STORAGE_KEY, &serialized) {
            Ok(()) => {
                self.stale_on_disk.store(0, Ordering::Release);
                tracing::debug!(entries = snapshot.len(), "Flushed translation cache");
            }
            Err(e) => tracing::warn!(error = %e, "Failed to persist translation cache"),
        }
    }
}
