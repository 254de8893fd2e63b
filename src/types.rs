//! Core types for normalized emails

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// The canonical, classifier-ready form of a message.
///
/// `body` is plain text with bracket markers (`[URL HREF="..."] ... [/URL]`,
/// `[IMG SRC="..."]`, `[SCRIPT]`, ...) and URLs truncated to scheme and host.
/// `urls` keeps every referenced href/src exactly as it appeared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEmail {
    /// Top-level message headers
    pub headers: Headers,

    /// Decoded subject, or the configured placeholder
    pub subject: String,

    /// Canonicalized body text
    pub body: String,

    /// Raw, untruncated URLs referenced by the body
    pub urls: HashSet<String>,
}

/// Output of the body-only entry point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedBody {
    pub body: String,
    pub urls: HashSet<String>,
}

/// Ordered header map.
///
/// Names compare case-insensitively. When a name repeats, the last value
/// wins but the entry keeps the position and spelling of the first
/// occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a header, replacing the value of an existing entry with the
    /// same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Look up a header value by case-insensitive name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

/// Kind of body selected from the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    Html,
    PlainText,
}

impl ContentKind {
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::PlainText => "text/plain",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// A decoded candidate body together with the charset it was decoded with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyPart {
    pub text: String,
    pub charset: String,
}

/// Intermediate result of MIME unwrapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    pub headers: Headers,
    pub subject: String,
    pub html: Option<BodyPart>,
    pub plain: Option<BodyPart>,
}

impl ParsedMessage {
    /// The preferred body: HTML when available, else plain text, else empty
    /// plain text.
    #[must_use]
    pub fn best_body(&self) -> (&str, ContentKind) {
        if let Some(html) = &self.html {
            (html.text.as_str(), ContentKind::Html)
        } else if let Some(plain) = &self.plain {
            (plain.text.as_str(), ContentKind::PlainText)
        } else {
            ("", ContentKind::PlainText)
        }
    }
}
