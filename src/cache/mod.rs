//! Translation cache and usage counters, both persisted through a
//! [`KeyValueStore`](crate::storage::KeyValueStore).

mod persistent;
mod stats;

pub use persistent::{CACHE_TTL, CacheEntry, EntryCounts, FLUSH_DELAY, TranslationCache};
pub use stats::{CacheReport, StatsRecord, UsageStats};

/// Storage key holding the serialized cache entries.
pub const CACHE_STORAGE_KEY: &str = "translation_cache";

/// Storage key holding the serialized usage counters.
pub const STATS_STORAGE_KEY: &str = "translation_stats";
