use anyhow::{anyhow, Result};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Folder names in subtitle libraries are usually ISO 639 codes, sometimes
/// carrying a script or region subtag ("zh_hans", "pt-BR"). These helpers
/// reduce such names to their base language for validation and comparison
/// while the verbatim folder name stays the on-disk convention.
/// Strip script/region subtags and normalize case: "zh_hans" -> "zh"
pub fn base_code(code: &str) -> String {
    let trimmed = code.trim().to_lowercase();
    trimmed
        .split(['_', '-'])
        .next()
        .unwrap_or(&trimmed)
        .to_string()
}

/// Resolve a language code (with or without subtags) to a language
fn resolve(code: &str) -> Option<Language> {
    let base = base_code(code);
    match base.len() {
        2 => Language::from_639_1(&base),
        3 => Language::from_639_3(&base),
        _ => None,
    }
}

/// Validate that a code names a known ISO 639-1 or 639-3 language
pub fn validate_language_code(code: &str) -> Result<()> {
    resolve(code)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Check if two language codes refer to the same language.
///
/// Subtag differences are ignored: "zh" matches "zh_hans", and a 2-letter
/// code matches its 3-letter equivalent.
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (resolve(code1), resolve(code2)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name for a code, for log and error messages
pub fn get_language_name(code: &str) -> Result<String> {
    let lang = resolve(code)
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    Ok(lang.to_name().to_string())
}
