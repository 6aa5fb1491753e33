use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::STATS_STORAGE_KEY;
use super::persistent::EntryCounts;
use crate::clock::Clock;
use crate::storage::KeyValueStore;

/// Persisted usage counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsRecord {
    pub total_translations: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub last_used: u64,
}

impl StatsRecord {
    /// Hit rate as a percentage string, `"0%"` before any translation ran.
    pub fn hit_rate(&self) -> String {
        let lookups = self.cache_hits + self.cache_misses;
        if self.total_translations == 0 || lookups == 0 {
            return "0%".to_string();
        }
        format!("{:.2}%", self.cache_hits as f64 / lookups as f64 * 100.0)
    }
}

/// Statistics as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheReport {
    pub total_translations: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub last_used: u64,
    pub valid_cache_entries: usize,
    pub expired_cache_entries: usize,
    pub total_cache_entries: usize,
    pub cache_hit_rate: String,
}

/// Hit/miss counters shared by every translation path.
///
/// Counters only grow. A miss is written through to the store immediately;
/// hits are persisted with the next miss or [`flush`](Self::flush).
pub struct UsageStats {
    record: Mutex<StatsRecord>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl UsageStats {
    pub fn load(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let record = match store.get(STATS_STORAGE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable translation stats");
                StatsRecord::default()
            }),
            Ok(None) => StatsRecord::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load translation stats");
                StatsRecord::default()
            }
        };

        Self {
            record: Mutex::new(record),
            store,
            clock,
        }
    }

    pub fn record_hit(&self) {
        let mut record = self.record.lock();
        record.cache_hits += 1;
        record.last_used = self.clock.now_ms();
    }

    /// Counts a miss (which is also a translation request) and persists.
    pub fn record_miss(&self) {
        let snapshot = {
            let mut record = self.record.lock();
            record.cache_misses += 1;
            record.total_translations += 1;
            record.last_used = self.clock.now_ms();
            record.clone()
        };
        self.persist(&snapshot);
    }

    /// Writes the current counters, including unsaved hits, to the store.
    pub fn flush(&self) {
        let snapshot = self.snapshot();
        self.persist(&snapshot);
    }

    pub fn snapshot(&self) -> StatsRecord {
        self.record.lock().clone()
    }

    pub fn report(&self, counts: EntryCounts) -> CacheReport {
        let record = self.snapshot();

        CacheReport {
            total_translations: record.total_translations,
            cache_hits: record.cache_hits,
            cache_misses: record.cache_misses,
            last_used: record.last_used,
            valid_cache_entries: counts.valid,
            expired_cache_entries: counts.expired,
            total_cache_entries: counts.total,
            cache_hit_rate: record.hit_rate(),
        }
    }

    fn persist(&self, record: &StatsRecord) {
        let result = serde_json::to_string(record)
            .map_err(anyhow::Error::from)
            .and_then(|raw| self.store.set(STATS_STORAGE_KEY, &raw));

        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist translation stats");
        }
    }
}
