//! XDG-style path utilities for configuration and cache.
//!
//! XDG Base Directory variables win over OS-specific locations so that the
//! same layout is used on every platform.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "tq";

/// File name of the persistent translation store inside [`cache_dir`].
pub const STORE_FILE: &str = "store.db";

/// `$XDG_CONFIG_HOME/tq`, or `~/.config/tq`.
pub fn config_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

/// `$XDG_CACHE_HOME/tq`, or `~/.cache/tq`.
pub fn cache_dir() -> Result<PathBuf> {
    xdg_dir("XDG_CACHE_HOME", ".cache")
}

/// Location of the `SQLite` store holding cached translations and counters.
pub fn store_path() -> Result<PathBuf> {
    Ok(cache_dir()?.join(STORE_FILE))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Result<PathBuf> {
    match std::env::var(var) {
        Ok(base) if !base.is_empty() => Ok(PathBuf::from(base).join(APP_DIR)),
        _ => Ok(dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(home_fallback)
            .join(APP_DIR)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_var<F: FnOnce()>(var: &str, value: Option<&str>, f: F) {
        let original = std::env::var(var).ok();
        match value {
            Some(v) => unsafe { std::env::set_var(var, v) },
            None => unsafe { std::env::remove_var(var) },
        }

        f();

        match original {
            Some(v) => unsafe { std::env::set_var(var, v) },
            None => unsafe { std::env::remove_var(var) },
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_default() {
        with_var("XDG_CONFIG_HOME", None, || {
            assert!(config_dir().unwrap().ends_with(".config/tq"));
        });
    }

    #[test]
    #[serial]
    fn test_config_dir_xdg_override() {
        with_var("XDG_CONFIG_HOME", Some("/custom/config"), || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/config/tq"));
        });
    }

    #[test]
    #[serial]
    fn test_empty_xdg_var_is_ignored() {
        with_var("XDG_CACHE_HOME", Some(""), || {
            assert!(cache_dir().unwrap().ends_with(".cache/tq"));
        });
    }

    #[test]
    #[serial]
    fn test_store_path_under_cache_dir() {
        with_var("XDG_CACHE_HOME", Some("/custom/cache"), || {
            assert_eq!(
                store_path().unwrap(),
                PathBuf::from("/custom/cache/tq/store.db")
            );
        });
    }
}
