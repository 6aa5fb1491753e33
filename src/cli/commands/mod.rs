//! Subcommand implementations.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::clock::SystemClock;
use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::paths;
use crate::storage::{KeyValueStore, MemoryStore, SqliteStore};
use crate::translation::{HttpBackend, TranslationClient};

/// Cache maintenance and statistics.
pub mod cache;

/// Language detection command handler.
pub mod detect;

/// Translation command handler.
pub mod translate;

fn resolve(options: &ResolveOptions) -> Result<ResolvedConfig> {
    let file_config = ConfigManager::new()?.load_or_default()?;
    resolve_config(options, &file_config)
}

/// Opens the persistent store, or an in-memory one when caching is disabled.
fn open_store(no_cache: bool) -> Result<Arc<dyn KeyValueStore>> {
    if no_cache {
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(SqliteStore::open(paths::store_path()?)?))
}

fn build_client(config: &ResolvedConfig, no_cache: bool) -> Result<TranslationClient> {
    let backend = HttpBackend::new(&config.endpoint, config.settings.timeout)
        .context("Failed to set up HTTP client")?;

    Ok(TranslationClient::new(
        Arc::new(backend),
        open_store(no_cache)?,
        Arc::new(SystemClock),
        config.settings,
    ))
}
