use anyhow::Result;
use clap::Parser;
use tracing::Level;

use tq_cli::cli::commands::{cache, detect, translate};
use tq_cli::cli::{Args, Command};
use tq_cli::output::{self, OutputConfig};
use tq_cli::translation::print_languages;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || OutputConfig::default().no_color,
    });

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .with_ansi(!output::is_no_color())
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Some(Command::Languages) => {
            print_languages();
        }
        Some(Command::Stats { json }) => {
            cache::print_stats(json)?;
        }
        Some(Command::ClearCache) => {
            cache::clear_cache()?;
        }
        Some(Command::Cleanup) => {
            cache::cleanup()?;
        }
        Some(Command::Detect { file }) => {
            detect::run_detect(file.as_deref(), args.endpoint).await?;
        }
        None => {
            let options = translate::TranslateOptions {
                file: args.file,
                from: args.from,
                to: args.to,
                endpoint: args.endpoint,
                priority: args.priority,
                no_cache: args.no_cache,
                auto: args.auto,
                lines: args.lines,
            };
            translate::run_translate(options).await?;
        }
    }

    Ok(())
}
