//! Offline German detection.

/// Common German function words.
const GERMAN_WORDS: &[&str] = &[
    "der", "die", "das", "und", "ist", "mit", "für", "auf", "zu", "von", "bei", "auch", "eine",
    "einen", "einer",
];

const GERMAN_CHARS: &[char] = &['ä', 'ö', 'ü', 'ß'];

/// Returns `true` when the text contains a common German function word or
/// one of `ä`, `ö`, `ü`, `ß`.
///
/// Deliberately permissive: a false positive costs one cached API call, a
/// false negative leaves German text untranslated.
pub fn looks_german(text: &str) -> bool {
    let lowered = text.to_lowercase();

    lowered
        .split_whitespace()
        .any(|word| GERMAN_WORDS.contains(&word))
        || lowered.contains(GERMAN_CHARS)
}
