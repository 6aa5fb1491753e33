//! Language code validation and supported languages.

use anyhow::Result;

use crate::ui::Style;

/// Language of the directory's source content.
pub const DEFAULT_SOURCE_LANGUAGE: &str = "de";

/// Language content is translated into by default.
pub const DEFAULT_TARGET_LANGUAGE: &str = "en";

/// Language codes (ISO 639-1) the translation backend accepts.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("hu", "Hungarian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sk", "Slovak"),
    ("sv", "Swedish"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("zh", "Chinese"),
];

/// Prints all supported language codes to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Supported language codes (ISO 639-1)"));
    for (code, name) in SUPPORTED_LANGUAGES {
        let marker = match *code {
            DEFAULT_SOURCE_LANGUAGE => " (default source)",
            DEFAULT_TARGET_LANGUAGE => " (default target)",
            _ => "",
        };
        println!(
            "  {:3} {}{}",
            Style::code(code),
            Style::secondary(name),
            Style::secondary(marker)
        );
    }
}

/// Validates that the given language code is supported.
pub fn validate_language(lang: &str) -> Result<()> {
    if SUPPORTED_LANGUAGES.iter().any(|(code, _)| *code == lang) {
        Ok(())
    } else {
        anyhow::bail!(
            "Invalid language code: '{lang}'\n\n\
             Valid language codes (ISO 639-1): de, en, fr, es, it, nl, ...\n\
             Run 'tq languages' to see all supported codes."
        )
    }
}
