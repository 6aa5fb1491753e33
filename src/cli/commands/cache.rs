use anyhow::{Context, Result};
use std::sync::Arc;

use super::open_store;
use crate::cache::{CacheReport, TranslationCache, UsageStats};
use crate::clock::{Clock, SystemClock};
use crate::ui::Style;

fn load_cache() -> Result<(TranslationCache, UsageStats)> {
    let store = open_store(false)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    Ok((
        TranslationCache::load(Arc::clone(&store), Arc::clone(&clock)),
        UsageStats::load(store, clock),
    ))
}

/// Prints the cache statistics report.
pub fn print_stats(json: bool) -> Result<()> {
    let (cache, stats) = load_cache()?;
    let report = stats.report(cache.counts());

    if json {
        let rendered =
            serde_json::to_string_pretty(&report).context("Failed to serialize statistics")?;
        println!("{rendered}");
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &CacheReport) {
    let rows = [
        ("translations", report.total_translations.to_string()),
        ("cache hits", report.cache_hits.to_string()),
        ("cache misses", report.cache_misses.to_string()),
        ("hit rate", report.cache_hit_rate.clone()),
        ("valid entries", report.valid_cache_entries.to_string()),
        ("expired entries", report.expired_cache_entries.to_string()),
        ("total entries", report.total_cache_entries.to_string()),
    ];

    println!("{}", Style::header("Translation cache"));
    for (label, value) in rows {
        println!("  {:16} {}", Style::label(label), Style::value(value));
    }
}

/// Removes every cached translation.
pub fn clear_cache() -> Result<()> {
    let (cache, _) = load_cache()?;
    let removed = cache.counts().total;
    cache.clear();

    println!(
        "{} Removed {removed} cached translations",
        Style::success("✓")
    );
    Ok(())
}

/// Removes expired cached translations.
pub fn cleanup() -> Result<()> {
    let (cache, _) = load_cache()?;
    let removed = cache.cleanup_expired();
    cache.flush();

    println!(
        "{} Removed {removed} expired translations",
        Style::success("✓")
    );
    Ok(())
}
