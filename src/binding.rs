//! Ties one displayed text field of an entity to the translation lifecycle.
//!
//! A [`FieldBinding`] owns the source text of, say, a partner description,
//! knows whether translation is currently wanted, and exposes the text to
//! display. Refreshing shows a cached translation right away and then waits
//! for the debounced translation. Results arriving after [`FieldBinding::teardown`]
//! or for a superseded refresh are ignored.

use crate::debounce::DebounceError;
use crate::queue::Priority;
use crate::translation::{DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE, TranslationClient};

/// Where the field is rendered, which decides how it is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingContext {
    /// Detail page: always translated from German to English.
    Detail,
    /// Listing card: translated only when the text looks German.
    Card,
}

impl BindingContext {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Detail => "show",
            Self::Card => "card",
        }
    }
}

pub struct FieldBinding {
    client: TranslationClient,
    context: BindingContext,
    priority: Priority,
    debounce_key: String,
    source: String,
    translated: Option<String>,
    enabled: bool,
    torn_down: bool,
}

impl FieldBinding {
    pub fn new(
        client: TranslationClient,
        context: BindingContext,
        entity_id: &str,
        field: &str,
        source: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            client,
            context,
            priority,
            debounce_key: format!("{}-{entity_id}-{field}", context.prefix()),
            source: source.into(),
            translated: None,
            enabled: false,
            torn_down: false,
        }
    }

    pub fn debounce_key(&self) -> &str {
        &self.debounce_key
    }

    /// Text to render: the translation when enabled and available, else the source.
    pub fn display(&self) -> &str {
        match &self.translated {
            Some(translated) if self.enabled => translated,
            _ => &self.source,
        }
    }

    pub const fn is_translated(&self) -> bool {
        self.enabled && self.translated.is_some()
    }

    /// Turns translation on or off. Turning it off forgets the translation.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.translated = None;
        }
    }

    /// Replaces the source text. The old translation no longer applies.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.translated = None;
    }

    /// Brings the displayed translation up to date.
    pub async fn refresh(&mut self) {
        if !self.enabled || self.torn_down || self.source.trim().is_empty() {
            self.translated = None;
            return;
        }

        if let Some(cached) =
            self.client
                .cached(&self.source, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE)
        {
            self.translated = Some(cached);
        }

        let outcome = match self.context {
            BindingContext::Detail => {
                self.client
                    .translate_debounced(
                        &self.source,
                        DEFAULT_SOURCE_LANGUAGE,
                        DEFAULT_TARGET_LANGUAGE,
                        self.priority,
                        &self.debounce_key,
                    )
                    .await
            }
            BindingContext::Card => {
                self.client
                    .auto_translate_debounced(&self.source, self.priority, &self.debounce_key)
                    .await
            }
        };

        match outcome {
            Ok(result) if result != self.source => {
                self.translated = Some(result);
            }
            Ok(_) => {}
            Err(DebounceError::Superseded | DebounceError::Cancelled) => {
                tracing::debug!(key = %self.debounce_key, "Translation refresh dropped");
            }
        }
    }

    /// Cancels this binding's pending debounced call. Later results are ignored.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.client.cancel_debounced(&self.debounce_key);
    }
}

impl Drop for FieldBinding {
    fn drop(&mut self) {
        if !self.torn_down {
            self.client.cancel_debounced(&self.debounce_key);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;
    use crate::translation::{ClientSettings, RemoteError, TranslationBackend};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Default)]
    struct DictionaryBackend {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TranslationBackend for DictionaryBackend {
        async fn translate(&self, text: &str, _from: &str, _to: &str) -> Result<String, RemoteError> {
            self.calls.lock().push(text.to_string());
            Ok(match text {
                "Schöne Aussicht" => "Beautiful view".to_string(),
                "Frische Brötchen" => "Fresh rolls".to_string(),
                other => other.to_string(),
            })
        }

        async fn is_german(&self, _text: &str) -> Result<bool, RemoteError> {
            Err(RemoteError::Transport("offline".to_string()))
        }
    }

    fn client() -> (Arc<DictionaryBackend>, TranslationClient) {
        let backend = Arc::new(DictionaryBackend::default());
        let client = TranslationClient::new(
            Arc::clone(&backend) as Arc<dyn TranslationBackend>,
            Arc::new(MemoryStore::new()),
            Arc::new(ManualClock::new(1_700_000_000_000)),
            ClientSettings::default(),
        );
        (backend, client)
    }

    #[test]
    fn test_debounce_key_includes_context_entity_and_field() {
        let (_, client) = client();
        let binding = FieldBinding::new(
            client,
            BindingContext::Detail,
            "17",
            "description",
            "Schöne Aussicht",
            Priority::High,
        );
        assert_eq!(binding.debounce_key(), "show-17-description");
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_binding_shows_source() {
        let (backend, client) = client();
        let mut binding = FieldBinding::new(
            client,
            BindingContext::Detail,
            "1",
            "description",
            "Schöne Aussicht",
            Priority::Normal,
        );

        binding.refresh().await;

        assert_eq!(binding.display(), "Schöne Aussicht");
        assert!(backend.calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_binding_translates() {
        let (_, client) = client();
        let mut binding = FieldBinding::new(
            client,
            BindingContext::Detail,
            "1",
            "description",
            "Schöne Aussicht",
            Priority::High,
        );

        binding.set_enabled(true);
        binding.refresh().await;

        assert!(binding.is_translated());
        assert_eq!(binding.display(), "Beautiful view");

        binding.set_enabled(false);
        assert_eq!(binding.display(), "Schöne Aussicht");
    }

    #[tokio::test(start_paused = true)]
    async fn test_card_binding_uses_heuristic_when_detection_offline() {
        let (backend, client) = client();
        let mut german = FieldBinding::new(
            client.clone(),
            BindingContext::Card,
            "1",
            "description",
            "Frische Brötchen",
            Priority::Low,
        );
        let mut english = FieldBinding::new(
            client,
            BindingContext::Card,
            "2",
            "description",
            "Fresh coffee",
            Priority::Low,
        );
        german.set_enabled(true);
        english.set_enabled(true);

        german.refresh().await;
        english.refresh().await;

        assert_eq!(german.display(), "Fresh rolls");
        assert_eq!(english.display(), "Fresh coffee");
        assert_eq!(*backend.calls.lock(), vec!["Frische Brötchen"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_translation_is_reused() {
        let (backend, client) = client();
        client
            .translate("Schöne Aussicht", "de", "en", Priority::Normal)
            .await;

        let mut binding = FieldBinding::new(
            client,
            BindingContext::Detail,
            "1",
            "description",
            "Schöne Aussicht",
            Priority::Normal,
        );
        binding.set_enabled(true);
        binding.refresh().await;

        assert_eq!(binding.display(), "Beautiful view");
        assert_eq!(backend.calls.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_ignores_refresh() {
        let (backend, client) = client();
        let mut binding = FieldBinding::new(
            client,
            BindingContext::Detail,
            "1",
            "description",
            "Schöne Aussicht",
            Priority::Normal,
        );
        binding.set_enabled(true);
        binding.teardown();
        binding.refresh().await;

        assert_eq!(binding.display(), "Schöne Aussicht");
        assert!(backend.calls.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_after_abandoned_refresh_cancels_pending_call() {
        let (backend, client) = client();
        let mut binding = FieldBinding::new(
            client.clone(),
            BindingContext::Detail,
            "1",
            "description",
            "Schöne Aussicht",
            Priority::Normal,
        );
        binding.set_enabled(true);

        let abandoned = tokio::time::timeout(Duration::from_millis(10), binding.refresh()).await;
        assert!(abandoned.is_err());

        binding.teardown();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(binding.display(), "Schöne Aussicht");
        assert!(backend.calls.lock().is_empty());
        assert!(client.cached("Schöne Aussicht", "de", "en").is_none());
    }
}
