use clap::{Parser, Subcommand};

use crate::queue::Priority;

#[derive(Parser, Debug)]
#[command(name = "tq")]
#[command(about = "Cached, queued translation client for directory listings")]
#[command(version)]
pub struct Args {
    /// File to translate (reads from stdin if not provided)
    pub file: Option<String>,

    /// Source language code (ISO 639-1, default: de)
    #[arg(short = 'f', long = "from")]
    pub from: Option<String>,

    /// Target language code (ISO 639-1, default: en)
    #[arg(short = 't', long = "to")]
    pub to: Option<String>,

    /// Translation backend base URL
    #[arg(short = 'e', long, global = true)]
    pub endpoint: Option<String>,

    /// Queue priority of the request
    #[arg(short = 'p', long, value_enum)]
    pub priority: Option<Priority>,

    /// Do not read or write the persistent cache
    #[arg(short = 'n', long)]
    pub no_cache: bool,

    /// Only translate input that looks German
    #[arg(short = 'a', long)]
    pub auto: bool,

    /// Translate each non-empty line separately
    #[arg(short = 'l', long)]
    pub lines: bool,

    /// Suppress status output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log queue and cache activity to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check whether text is German
    Detect {
        /// File to check (reads from stdin if not provided)
        file: Option<String>,
    },
    /// Show translation cache statistics
    Stats {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove every cached translation
    ClearCache,
    /// Remove expired cached translations
    Cleanup,
    /// List supported language codes
    Languages,
}
