//! URL canonicalization inside serialized text

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::Range;

// (1) scheme or `www.` prefix, (2) host ending in a TLD-like label,
// then the remaining path/query/fragment run.
static URL_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(
        r"(https?://|www\.)([-a-zA-Z0-9@:%._\-+~#=]{1,256}\.[a-zA-Z0-9()]{1,6})\b[-a-zA-Z0-9()@:%_+.~#?&/=\-]*",
    )
    .unwrap()
});

/// How URL occurrences in text are rewritten
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlMode {
    /// Replace each occurrence with its scheme (or `www.`) and host
    #[default]
    Truncate,
    /// Wrap each full occurrence in `[URL]...[/URL]`
    Annotate,
}

/// Rewrite URL occurrences in `text` according to `mode`.
///
/// Returns the rewritten text and, in annotate mode, the annotated
/// occurrences in order of appearance.
#[must_use]
pub fn canonicalize(text: &str, mode: UrlMode) -> (String, Vec<String>) {
    match mode {
        UrlMode::Truncate => (truncate_urls(text).into_owned(), Vec::new()),
        UrlMode::Annotate => annotate_urls(text),
    }
}

/// Truncate every URL occurrence to scheme/prefix plus host
#[must_use]
pub fn truncate_urls(text: &str) -> Cow<'_, str> {
    URL_REGEX.replace_all(text, "${1}${2}")
}

/// Truncate URL occurrences except those starting inside one of the
/// `protected` byte ranges, which are copied through unchanged.
pub(crate) fn truncate_urls_outside<'a>(text: &'a str, protected: &[Range<usize>]) -> Cow<'a, str> {
    if protected.is_empty() {
        return truncate_urls(text);
    }
    URL_REGEX.replace_all(text, |caps: &Captures| {
        let whole = &caps[0];
        let start = caps.get(0).map_or(0, |m| m.start());
        if protected.iter().any(|range| range.contains(&start)) {
            whole.to_string()
        } else {
            format!("{}{}", &caps[1], &caps[2])
        }
    })
}

fn annotate_urls(text: &str) -> (String, Vec<String>) {
    let found = URL_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    let annotated = URL_REGEX.replace_all(text, "[URL]${0}[/URL]").into_owned();
    (annotated, found)
}
