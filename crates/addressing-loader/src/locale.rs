//! Locale matching for local subdivision names.

/// Canonicalizes a locale: lowercase, `-` as the subtag separator.
pub fn canonicalize(locale: &str) -> String {
    locale.trim().replace('_', "-").to_ascii_lowercase()
}

/// Returns the fallback candidates of a locale, most specific first.
///
/// `sr-Latn-RS` yields `sr-latn-rs`, `sr-latn`, `sr`.
pub fn candidates(locale: &str) -> Vec<String> {
    let locale = canonicalize(locale);
    let parts: Vec<&str> = locale.split('-').filter(|p| !p.is_empty()).collect();
    (1..=parts.len()).rev().map(|n| parts[..n].join("-")).collect()
}

/// Returns true if the two locales share a candidate.
///
/// `pt-BR` matches `pt`, and `pt` matches `pt-BR`.
pub fn matches_candidates(requested: &str, defined: &str) -> bool {
    let defined = candidates(defined);
    candidates(requested)
        .iter()
        .any(|candidate| defined.contains(candidate))
}
