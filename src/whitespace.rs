//! Whitespace cleanup for canonical bodies

use regex::Regex;

static INVISIBLE_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"[\u{00A0}\u{200B}\u{202F}]+").unwrap());

static SPACES_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r" {2,}").unwrap());

static NEWLINES_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Normalize line endings, turn invisible spacing into plain spaces,
/// collapse repeated spaces and newlines, and trim.
///
/// The result never contains two consecutive spaces or newlines, and
/// applying the function again leaves it unchanged.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = INVISIBLE_REGEX.replace_all(&text, " ");
    let text = SPACES_REGEX.replace_all(&text, " ");
    let text = NEWLINES_REGEX.replace_all(&text, "\n");
    text.trim().to_string()
}
