use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;

use super::detect::looks_german;
use super::language::{DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE};
use super::remote::{RemoteError, TranslationBackend};
use crate::cache::{CacheReport, TranslationCache, UsageStats};
use crate::clock::Clock;
use crate::debounce::{DEFAULT_DEBOUNCE, DebounceError, Debouncer};
use crate::queue::{DEFAULT_ITEM_DELAY, DEFAULT_TIMEOUT, Priority, TranslationQueue};
use crate::storage::KeyValueStore;

/// Timing knobs for a [`TranslationClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    /// Pause between two queued remote calls.
    pub item_delay: Duration,
    /// Upper bound on a single remote call.
    pub timeout: Duration,
    /// Settle time for debounced calls.
    pub debounce: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            item_delay: DEFAULT_ITEM_DELAY,
            timeout: DEFAULT_TIMEOUT,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Cache key of a translation: `from|to|text`.
pub fn cache_key(from: &str, to: &str, text: &str) -> String {
    format!("{from}|{to}|{text}")
}

/// Cached, queued access to the translation backend.
///
/// Translation never fails from the caller's point of view: when no
/// translation can be obtained the original text is returned. Clones share
/// the cache, counters, queue and debounce timers.
#[derive(Clone)]
pub struct TranslationClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    backend: Arc<dyn TranslationBackend>,
    cache: TranslationCache,
    stats: UsageStats,
    queue: TranslationQueue,
    debouncer: Debouncer<String>,
    settings: ClientSettings,
}

impl TranslationClient {
    /// Builds a client, loading cache and counters from `store`.
    pub fn new(
        backend: Arc<dyn TranslationBackend>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        settings: ClientSettings,
    ) -> Self {
        let cache = TranslationCache::load(Arc::clone(&store), Arc::clone(&clock));
        let stats = UsageStats::load(store, Arc::clone(&clock));
        let queue = TranslationQueue::new(
            Arc::clone(&backend),
            clock,
            settings.item_delay,
            settings.timeout,
        );

        Self {
            inner: Arc::new(ClientInner {
                backend,
                cache,
                stats,
                queue,
                debouncer: Debouncer::new(),
                settings,
            }),
        }
    }

    /// Translates `text`, serving from cache when possible.
    ///
    /// Blank text is returned untouched without touching cache or backend.
    pub async fn translate(&self, text: &str, from: &str, to: &str, priority: Priority) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        let key = cache_key(from, to, text);
        if let Some(cached) = self.cache_hit(&key) {
            return cached;
        }
        self.inner.stats.record_miss();

        let ticket = self.inner.queue.enqueue(text, from, to, priority);
        let result = ticket.wait().await;
        self.settle(text, &key, result)
    }

    /// Translates every text concurrently, preserving input order.
    ///
    /// All misses share the single queue, so this takes at least
    /// `misses × item_delay`.
    pub async fn translate_many<S: AsRef<str>>(
        &self,
        texts: &[S],
        from: &str,
        to: &str,
        priority: Priority,
    ) -> Vec<String> {
        join_all(
            texts
                .iter()
                .map(|text| self.translate(text.as_ref(), from, to, priority)),
        )
        .await
    }

    /// Like [`translate`](Self::translate), but coalesces rapid calls sharing
    /// `debounce_key`. Only the last call within the settle time reaches the
    /// queue; earlier ones resolve to [`DebounceError::Superseded`].
    ///
    /// Cache hits are answered immediately without debouncing.
    pub async fn translate_debounced(
        &self,
        text: &str,
        from: &str,
        to: &str,
        priority: Priority,
        debounce_key: &str,
    ) -> Result<String, DebounceError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }
        if let Some(cached) = self.cache_hit(&cache_key(from, to, text)) {
            return Ok(cached);
        }

        let client = self.clone();
        let (text, from, to) = (text.to_string(), from.to_string(), to.to_string());
        self.inner
            .debouncer
            .schedule(debounce_key, self.inner.settings.debounce, move || async move {
                client.translate(&text, &from, &to, priority).await
            })
            .await
    }

    /// Translates German text to English; anything else is returned as is.
    pub async fn auto_translate(&self, text: &str, priority: Priority) -> String {
        if self.is_german(text).await {
            self.translate(text, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE, priority)
                .await
        } else {
            text.to_string()
        }
    }

    /// Debounced [`auto_translate`](Self::auto_translate).
    pub async fn auto_translate_debounced(
        &self,
        text: &str,
        priority: Priority,
        debounce_key: &str,
    ) -> Result<String, DebounceError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        let client = self.clone();
        let text = text.to_string();
        self.inner
            .debouncer
            .schedule(debounce_key, self.inner.settings.debounce, move || async move {
                client.auto_translate(&text, priority).await
            })
            .await
    }

    /// Asks the backend whether `text` is German, falling back to
    /// [`looks_german`] when the backend cannot answer.
    pub async fn is_german(&self, text: &str) -> bool {
        let timeout = self.inner.settings.timeout;
        let detection = tokio::time::timeout(timeout, self.inner.backend.is_german(text))
            .await
            .unwrap_or(Err(RemoteError::Timeout(timeout)));

        match detection {
            Ok(is_german) => is_german,
            Err(e) => {
                tracing::warn!(error = %e, "Language detection failed, using local heuristic");
                looks_german(text)
            }
        }
    }

    /// Warms the cache at low priority.
    pub async fn preload<S: AsRef<str>>(&self, texts: &[S], from: &str, to: &str) {
        tracing::info!(count = texts.len(), "Preloading translations");
        self.translate_many(texts, from, to, Priority::Low).await;
    }

    /// Returns a valid cached translation without counting it as a hit.
    pub fn cached(&self, text: &str, from: &str, to: &str) -> Option<String> {
        self.inner.cache.get(&cache_key(from, to, text))
    }

    pub fn get_cache_stats(&self) -> CacheReport {
        self.inner.stats.report(self.inner.cache.counts())
    }

    /// Drops every cached translation. Counters are kept.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
        tracing::info!("Translation cache cleared");
    }

    /// Drops every queued translation; their callers get the original text.
    pub fn clear_queue(&self) -> usize {
        self.inner.queue.clear()
    }

    pub fn cleanup_expired(&self) -> usize {
        self.inner.cache.cleanup_expired()
    }

    /// Persists the cache and counters now instead of waiting for the
    /// coalesced write or the next miss.
    pub fn flush(&self) {
        self.inner.cache.flush();
        self.inner.stats.flush();
    }

    pub fn cancel_debounced(&self, debounce_key: &str) -> bool {
        self.inner.debouncer.cancel(debounce_key)
    }

    pub fn cancel_all_debounced(&self) -> usize {
        self.inner.debouncer.cancel_all()
    }

    pub fn is_processing_queue(&self) -> bool {
        self.inner.queue.is_processing()
    }

    fn cache_hit(&self, key: &str) -> Option<String> {
        let cached = self.inner.cache.get(key)?;
        self.inner.stats.record_hit();
        Some(cached)
    }

    /// Turns a queue result into what the caller sees, caching real translations.
    fn settle(&self, text: &str, key: &str, result: Result<String, RemoteError>) -> String {
        match result {
            Ok(translated) if !translated.trim().is_empty() && translated != text => {
                self.inner.cache.set(key, &translated);
                translated
            }
            Ok(_) => {
                tracing::debug!(key, "No translation available, keeping original text");
                text.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Translation failed, keeping original text");
                text.to_string()
            }
        }
    }
}
