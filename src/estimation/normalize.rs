use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical form used for keyword matching: lowercase, NFD-decomposed,
/// with every combining mark removed.
///
/// "Crème Brûlée" and "creme brulee" both become "creme brulee".
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Same as [`normalize`] for an optional input; `None` is the empty string.
pub fn normalize_opt(text: Option<&str>) -> String {
    text.map(normalize).unwrap_or_default()
}
