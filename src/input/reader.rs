use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};

const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

/// The translation backend rejects texts longer than this.
pub const MAX_TEXT_CHARS: usize = 5000;

pub struct InputReader;

impl InputReader {
    /// Reads the whole input from `file_path`, or stdin when `None`.
    pub fn read(file_path: Option<&str>) -> Result<String> {
        file_path.map_or_else(Self::read_stdin, Self::read_file)
    }

    /// Reads the input and checks it fits in a single translation request.
    pub fn read_text(file_path: Option<&str>) -> Result<String> {
        let text = Self::read(file_path)?;
        Self::check_length(&text)?;
        Ok(text)
    }

    /// Reads the input as one text per non-blank line.
    pub fn read_lines(file_path: Option<&str>) -> Result<Vec<String>> {
        let texts: Vec<String> = Self::read(file_path)?
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        for (index, text) in texts.iter().enumerate() {
            Self::check_length(text).with_context(|| format!("Line {} is too long", index + 1))?;
        }

        Ok(texts)
    }

    fn check_length(text: &str) -> Result<()> {
        let chars = text.chars().count();
        if chars > MAX_TEXT_CHARS {
            bail!(
                "Error: Text has {chars} characters; the translation backend accepts at most {MAX_TEXT_CHARS}.\n\n\
                 Use --lines to translate line by line."
            );
        }
        Ok(())
    }

    fn read_file(path: &str) -> Result<String> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to access file: {path}"))?;

        if metadata.len() as usize > MAX_INPUT_SIZE {
            bail!(
                "Error: Input size ({:.1} MB) exceeds maximum allowed size (1 MB).",
                metadata.len() as f64 / 1024.0 / 1024.0
            );
        }

        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
    }

    fn read_stdin() -> Result<String> {
        let mut buffer = Vec::new();
        io::stdin()
            .lock()
            .take(MAX_INPUT_SIZE as u64 + 1)
            .read_to_end(&mut buffer)
            .context("Failed to read from stdin")?;

        if buffer.len() > MAX_INPUT_SIZE {
            bail!("Error: Input exceeds maximum allowed size (1 MB).");
        }

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }
}
