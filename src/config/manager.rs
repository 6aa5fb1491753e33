use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::paths;
use crate::queue::Priority;
use crate::translation::{
    ClientSettings, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE, validate_language,
};

/// Settings in the `[tq]` section of config.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TqConfig {
    /// Base URL of the translation backend.
    pub endpoint: Option<String>,
    /// Default source language (ISO 639-1 code).
    pub from: Option<String>,
    /// Default target language (ISO 639-1 code).
    pub to: Option<String>,
    /// Default queue priority.
    pub priority: Option<Priority>,
    /// Upper bound on a single remote call, in seconds.
    pub timeout_secs: Option<u64>,
    /// Pause between queued remote calls, in milliseconds.
    pub queue_delay_ms: Option<u64>,
    /// Settle time for debounced translations, in milliseconds.
    pub debounce_ms: Option<u64>,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/tq/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub tq: TqConfig,
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub from: String,
    pub to: String,
    pub priority: Priority,
    pub settings: ClientSettings,
}

/// CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub endpoint: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub priority: Option<Priority>,
}

/// Resolves configuration: CLI options, then config file, then built-in defaults.
///
/// # Errors
///
/// Returns an error if no endpoint is configured, a language code is not
/// supported, source and target coincide, or the timeout is zero.
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<ResolvedConfig> {
    let file = &config_file.tq;

    let endpoint = options
        .endpoint
        .as_ref()
        .or(file.endpoint.as_ref())
        .cloned()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Missing required configuration: 'endpoint'\n\n\
                 Please provide it via:\n  \
                 - CLI option: tq --endpoint <url>\n  \
                 - Config file: ~/.config/tq/config.toml"
            )
        })?;

    let from = options
        .from
        .as_deref()
        .or(file.from.as_deref())
        .unwrap_or(DEFAULT_SOURCE_LANGUAGE)
        .to_string();
    let to = options
        .to
        .as_deref()
        .or(file.to.as_deref())
        .unwrap_or(DEFAULT_TARGET_LANGUAGE)
        .to_string();

    validate_language(&from)?;
    validate_language(&to)?;
    if from == to {
        bail!("Source and target language are both '{from}'; nothing to translate");
    }

    let priority = options.priority.or(file.priority).unwrap_or_default();

    let defaults = ClientSettings::default();
    let settings = ClientSettings {
        item_delay: file
            .queue_delay_ms
            .map_or(defaults.item_delay, Duration::from_millis),
        timeout: file
            .timeout_secs
            .map_or(defaults.timeout, Duration::from_secs),
        debounce: file
            .debounce_ms
            .map_or(defaults.debounce, Duration::from_millis),
    };

    if settings.timeout.is_zero() {
        bail!("Invalid configuration: 'timeout_secs' must be greater than 0");
    }

    Ok(ResolvedConfig {
        endpoint,
        from,
        to,
        priority,
        settings,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/tq/config.toml`
    /// or `~/.config/tq/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the config file; a missing file means defaults, a broken one is an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    fn create_test_config() -> ConfigFile {
        ConfigFile {
            tq: TqConfig {
                endpoint: Some("http://localhost:8000".to_string()),
                from: Some("de".to_string()),
                to: Some("en".to_string()),
                priority: Some(Priority::Low),
                timeout_secs: Some(5),
                queue_delay_ms: Some(500),
                debounce_ms: None,
            },
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        let config = create_test_config();

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert_eq!(manager.load_or_default().unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_load_or_default_reports_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[tq\nendpoint = ").unwrap();

        let err = manager.load_or_default().unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_priority_parses_lowercase() {
        let config: ConfigFile = toml::from_str("[tq]\npriority = \"high\"\n").unwrap();
        assert_eq!(config.tq.priority, Some(Priority::High));
    }

    #[test]
    fn test_resolve_uses_file_values() {
        let resolved = resolve_config(&ResolveOptions::default(), &create_test_config()).unwrap();

        assert_eq!(resolved.endpoint, "http://localhost:8000");
        assert_eq!(resolved.priority, Priority::Low);
        assert_eq!(resolved.settings.timeout, Duration::from_secs(5));
        assert_eq!(resolved.settings.item_delay, Duration::from_millis(500));
        assert_eq!(
            resolved.settings.debounce,
            ClientSettings::default().debounce
        );
    }

    #[test]
    fn test_resolve_defaults_languages() {
        let options = ResolveOptions {
            endpoint: Some("http://localhost:8000".to_string()),
            ..ResolveOptions::default()
        };

        let resolved = resolve_config(&options, &ConfigFile::default()).unwrap();

        assert_eq!(resolved.from, "de");
        assert_eq!(resolved.to, "en");
        assert_eq!(resolved.priority, Priority::Normal);
        assert_eq!(resolved.settings, ClientSettings::default());
    }

    #[test]
    fn test_resolve_missing_endpoint() {
        let result = resolve_config(&ResolveOptions::default(), &ConfigFile::default());

        assert!(result.unwrap_err().to_string().contains("endpoint"));
    }

    #[test]
    fn test_resolve_rejects_same_languages() {
        let options = ResolveOptions {
            from: Some("en".to_string()),
            ..ResolveOptions::default()
        };

        let result = resolve_config(&options, &create_test_config());

        assert!(result.unwrap_err().to_string().contains("both 'en'"));
    }

    #[test]
    fn test_resolve_rejects_unknown_language() {
        let options = ResolveOptions {
            to: Some("klingon".to_string()),
            ..ResolveOptions::default()
        };

        let result = resolve_config(&options, &create_test_config());

        assert!(result.unwrap_err().to_string().contains("Invalid language code"));
    }

    #[test]
    fn test_resolve_rejects_zero_timeout() {
        let mut config = create_test_config();
        config.tq.timeout_secs = Some(0);

        let result = resolve_config(&ResolveOptions::default(), &config);

        assert!(result.unwrap_err().to_string().contains("timeout_secs"));
    }
}
