//! Configuration file management.

mod manager;

pub use manager::{
    ConfigFile, ConfigManager, ResolveOptions, ResolvedConfig, TqConfig, resolve_config,
};
