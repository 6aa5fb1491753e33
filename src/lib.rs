//! # tq - cached, queued translation client
//!
//! `tq` translates directory content (business listings, descriptions)
//! between German and English through a rate-limited remote translation
//! backend. Every call goes through a single-consumer priority queue so that
//! at most one request is outstanding, results are cached for 24 hours in a
//! persistent store, and failures degrade to the original text.
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate stdin from German to English
//! echo "Frische Brötchen jeden Morgen" | tq --endpoint http://localhost:8000
//!
//! # Translate a file line by line, only where the text looks German
//! tq --lines --auto listings.txt
//!
//! # Inspect the cache
//! tq stats
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/tq/config.toml`:
//!
//! ```toml
//! [tq]
//! endpoint = "http://localhost:8000"
//! from = "de"
//! to = "en"
//! queue_delay_ms = 200
//! timeout_secs = 15
//! ```

/// Ties displayed entity fields to the translation lifecycle.
pub mod binding;

/// Translation cache and usage statistics.
pub mod cache;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Injectable wall clock.
pub mod clock;

/// Configuration file management.
pub mod config;

/// Per-key call coalescing.
pub mod debounce;

/// Input reading from files and stdin.
pub mod input;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration and cache.
pub mod paths;

/// Prioritized, serialized access to the translation backend.
pub mod queue;

/// Durable key-value storage.
pub mod storage;

/// Translation client, remote backend and language detection.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;
