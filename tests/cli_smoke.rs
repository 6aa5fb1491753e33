#![allow(clippy::unwrap_used)]
//! CLI smoke tests to verify basic command functionality.
//!
//! Every invocation points the XDG directories at a temporary location so
//! the user's own configuration and cache are never touched.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use tq_cli::storage::{KeyValueStore, SqliteStore};

#[allow(deprecated)]
fn tq(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tq").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_CACHE_HOME", home.path().join("cache"))
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help_displays_usage() {
    let home = TempDir::new().unwrap();
    tq(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Cached, queued translation client for directory listings",
        ))
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--priority"));
}

#[test]
fn test_version_displays_version() {
    let home = TempDir::new().unwrap();
    tq(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_languages_list() {
    let home = TempDir::new().unwrap();
    tq(&home)
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("de"))
        .stdout(predicate::str::contains("en"));
}

#[test]
fn test_stats_on_fresh_cache() {
    let home = TempDir::new().unwrap();
    tq(&home)
        .args(["stats", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"totalTranslations\": 0"))
        .stdout(predicate::str::contains("\"cacheHitRate\": \"0%\""));
}

#[test]
fn test_clear_cache_on_fresh_cache() {
    let home = TempDir::new().unwrap();
    tq(&home)
        .arg("clear-cache")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 0 cached translations"));
}

#[test]
fn test_cleanup_on_fresh_cache() {
    let home = TempDir::new().unwrap();
    tq(&home)
        .arg("cleanup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 0 expired translations"));
}

/// Writes one expired and one valid cache entry into the store the CLI opens.
fn seed_cache_with_expired_entry(home: &TempDir) {
    let store = SqliteStore::open(home.path().join("cache").join("tq").join("store.db")).unwrap();
    store
        .set(
            "translation_cache",
            r#"{
                "de|en|Altes Brot": {"value": "Old bread", "created_at": 0, "expires_at": 1},
                "de|en|Frisches Brot": {"value": "Fresh bread", "created_at": 0, "expires_at": 4102444800000}
            }"#,
        )
        .unwrap();
}

#[test]
fn test_stats_reports_expired_entries_on_disk() {
    let home = TempDir::new().unwrap();
    seed_cache_with_expired_entry(&home);

    tq(&home)
        .args(["stats", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"validCacheEntries\": 1"))
        .stdout(predicate::str::contains("\"expiredCacheEntries\": 1"))
        .stdout(predicate::str::contains("\"totalCacheEntries\": 2"));
}

#[test]
fn test_cleanup_removes_expired_entries() {
    let home = TempDir::new().unwrap();
    seed_cache_with_expired_entry(&home);

    tq(&home)
        .arg("cleanup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 expired translations"));

    tq(&home)
        .args(["stats", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"expiredCacheEntries\": 0"))
        .stdout(predicate::str::contains("\"totalCacheEntries\": 1"));
}

#[test]
fn test_missing_endpoint() {
    let home = TempDir::new().unwrap();
    tq(&home)
        .write_stdin("Hallo Welt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("endpoint"));
}

#[test]
fn test_invalid_language_code() {
    let home = TempDir::new().unwrap();
    tq(&home)
        .args(["--endpoint", "http://127.0.0.1:9", "--to", "invalid_lang_xyz"])
        .write_stdin("Hallo Welt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid language code"));
}

#[test]
fn test_invalid_priority() {
    let home = TempDir::new().unwrap();
    tq(&home)
        .args(["--endpoint", "http://127.0.0.1:9", "--priority", "urgent"])
        .write_stdin("Hallo Welt")
        .assert()
        .failure();
}

#[test]
fn test_detect_falls_back_when_backend_unreachable() {
    let home = TempDir::new().unwrap();
    tq(&home)
        .args(["detect", "--endpoint", "http://127.0.0.1:9"])
        .write_stdin("Der Hund läuft über die Straße")
        .assert()
        .success()
        .stdout(predicate::str::diff("german\n"));
}

#[test]
fn test_detect_english_when_backend_unreachable() {
    let home = TempDir::new().unwrap();
    tq(&home)
        .args(["detect", "--endpoint", "http://127.0.0.1:9"])
        .write_stdin("The dog runs across the street")
        .assert()
        .success()
        .stdout(predicate::str::diff("not german\n"));
}

#[test]
fn test_unreachable_backend_prints_original_text() {
    let home = TempDir::new().unwrap();
    tq(&home)
        .args(["--endpoint", "http://127.0.0.1:9", "--quiet"])
        .write_stdin("Hallo Welt")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hallo Welt"));
}
