use anyhow::{anyhow, Result};
use isolang::Language;

// @module: ISO language code helpers

/// Resolve a two- or three-letter ISO 639 code to a `Language`.
fn resolve(code: &str) -> Option<Language> {
    let normalized = code.trim().to_lowercase();
    match normalized.chars().count() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    }
}

/// English name for a language code, used in backend instruction payloads.
pub fn get_language_name(code: &str) -> Result<String> {
    if code.trim().is_empty() {
        return Err(anyhow!("Language code cannot be empty"));
    }

    resolve(code)
        .map(|lang| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", code))
}

/// Whether two language codes denote the same language.
///
/// Handles mixed 639-1 and 639-3 codes; unknown codes fall back to a
/// case-insensitive comparison.
pub fn language_codes_match(a: &str, b: &str) -> bool {
    match (resolve(a), resolve(b)) {
        (Some(lang_a), Some(lang_b)) => lang_a == lang_b,
        _ => a.trim().eq_ignore_ascii_case(b.trim()),
    }
}
