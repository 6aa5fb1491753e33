use anyhow::{Result, bail};

use super::{build_client, resolve};
use crate::config::ResolveOptions;
use crate::input::InputReader;

/// Prints `german` or `not german` for the input.
pub async fn run_detect(file: Option<&str>, endpoint: Option<String>) -> Result<()> {
    let config = resolve(&ResolveOptions {
        endpoint,
        ..ResolveOptions::default()
    })?;
    let client = build_client(&config, true)?;

    let text = InputReader::read_text(file)?;
    if text.trim().is_empty() {
        bail!("Error: Input is empty");
    }

    if client.is_german(&text).await {
        println!("german");
    } else {
        println!("not german");
    }

    Ok(())
}
