use anyhow::{Result, bail};
use futures_util::future::join_all;

use super::{build_client, resolve};
use crate::config::ResolveOptions;
use crate::input::InputReader;
use crate::queue::Priority;
use crate::translation::TranslationClient;
use crate::ui::Spinner;
use crate::{status, warning};

pub struct TranslateOptions {
    pub file: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub endpoint: Option<String>,
    pub priority: Option<Priority>,
    pub no_cache: bool,
    pub auto: bool,
    pub lines: bool,
}

pub async fn run_translate(options: TranslateOptions) -> Result<()> {
    let config = resolve(&ResolveOptions {
        endpoint: options.endpoint.clone(),
        from: options.from.clone(),
        to: options.to.clone(),
        priority: options.priority,
    })?;
    let client = build_client(&config, options.no_cache)?;
    let job = Job {
        client: &client,
        from: &config.from,
        to: &config.to,
        priority: config.priority,
        auto: options.auto,
    };

    if options.lines {
        let texts = InputReader::read_lines(options.file.as_deref())?;
        if texts.is_empty() {
            bail!("Error: Input is empty");
        }

        let spinner = Spinner::new(&format!("Translating {} lines...", texts.len()));
        let results = job.run_many(&texts).await;
        spinner.stop();

        let untranslated = texts.iter().zip(&results).filter(|(a, b)| a == b).count();
        for line in &results {
            println!("{line}");
        }
        if untranslated > 0 && !options.auto {
            warning!("{untranslated} of {} lines were left untranslated", texts.len());
        }
    } else {
        let text = InputReader::read_text(options.file.as_deref())?;
        if text.trim().is_empty() {
            bail!("Error: Input is empty");
        }

        let spinner = Spinner::new("Translating...");
        let result = job.run(&text).await;
        spinner.stop();

        if result.ends_with('\n') {
            print!("{result}");
        } else {
            println!("{result}");
        }
        if result == text && !options.auto {
            warning!("No translation available, printed the original text");
        }
    }

    let stats = client.get_cache_stats();
    status!(
        "{} cached, hit rate {}",
        stats.valid_cache_entries,
        stats.cache_hit_rate
    );
    client.flush();

    Ok(())
}

struct Job<'a> {
    client: &'a TranslationClient,
    from: &'a str,
    to: &'a str,
    priority: Priority,
    auto: bool,
}

impl Job<'_> {
    async fn run(&self, text: &str) -> String {
        if self.auto {
            self.client.auto_translate(text, self.priority).await
        } else {
            self.client
                .translate(text, self.from, self.to, self.priority)
                .await
        }
    }

    async fn run_many(&self, texts: &[String]) -> Vec<String> {
        if self.auto {
            join_all(texts.iter().map(|text| self.run(text))).await
        } else {
            self.client
                .translate_many(texts, self.from, self.to, self.priority)
                .await
        }
    }
}
