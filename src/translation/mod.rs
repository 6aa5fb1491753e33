mod client;
mod detect;
mod language;
mod remote;

pub use client::{ClientSettings, TranslationClient, cache_key};
pub use detect::looks_german;
pub use language::{
    DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE, SUPPORTED_LANGUAGES, print_languages,
    validate_language,
};
pub use remote::{HttpBackend, RemoteError, TranslationBackend};
