//! Contract with the downstream classification service
//!
//! This crate does not talk to any service. It defines what a classifier
//! receives ([`ClassificationRequest`]), what it must answer ([`Verdict`]),
//! and the [`Classifier`] trait a client implements. Clients are passed by
//! handle; nothing here holds global state.

use crate::error::{NormalizeError, Result};
use crate::types::{CanonicalEmail, Headers};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Classification label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Phishing,
    Legit,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phishing => write!(f, "phishing"),
            Self::Legit => write!(f, "legit"),
        }
    }
}

/// A classifier's answer: a label and the probability, in percent, that
/// the message is phishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: Label,
    pub probability: u8,
}

impl Verdict {
    /// Parse a JSON verdict of the form
    /// `{"label": "phishing", "phishing_probability": "85%"}`.
    ///
    /// The probability may be a number or a string with an optional `%`
    /// suffix and must lie in `0..=100`.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| NormalizeError::InvalidVerdict(e.to_string()))?;

        let label = match value.get("label").and_then(Value::as_str) {
            Some(label) if label.eq_ignore_ascii_case("phishing") => Label::Phishing,
            Some(label) if label.eq_ignore_ascii_case("legit") => Label::Legit,
            Some(other) => {
                return Err(NormalizeError::InvalidVerdict(format!(
                    "unknown label {other:?}"
                )));
            }
            None => return Err(NormalizeError::InvalidVerdict("missing label".into())),
        };

        let probability = value
            .get("phishing_probability")
            .and_then(parse_probability)
            .ok_or_else(|| {
                NormalizeError::InvalidVerdict("missing or invalid phishing_probability".into())
            })?;

        Ok(Self { label, probability })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_probability(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok()?,
        _ => return None,
    };
    if (0.0..=100.0).contains(&number) {
        Some(number.round() as u8)
    } else {
        None
    }
}

/// The fields of a normalized email a classifier is given, plus an
/// optional enrichment record this crate never inspects.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRequest<'a> {
    pub headers: &'a Headers,
    pub subject: &'a str,
    pub body: &'a str,
    pub enrichment: Option<&'a Value>,
}

impl<'a> ClassificationRequest<'a> {
    #[must_use]
    pub fn new(email: &'a CanonicalEmail) -> Self {
        Self {
            headers: &email.headers,
            subject: email.subject.as_str(),
            body: email.body.as_str(),
            enrichment: None,
        }
    }

    #[must_use]
    pub const fn with_enrichment(mut self, enrichment: &'a Value) -> Self {
        self.enrichment = Some(enrichment);
        self
    }

    /// Lay the request out as the tagged text block classifiers expect
    #[must_use]
    pub fn render_prompt(&self) -> String {
        let mut prompt = format!(
            "Email:\n\"\"\"\n[HEADERS]\n{}\n[\\HEADERS]\n[SUBJECT] {} [\\SUBJECT]\n[BODY]\n{}\n[\\BODY]\n\"\"\"",
            self.headers, self.subject, self.body
        );
        if let Some(enrichment) = self.enrichment {
            prompt.push_str("\n\n######\n\nURL Information:\n");
            prompt.push_str(&enrichment.to_string());
        }
        prompt
    }
}

/// A classification service client
pub trait Classifier {
    fn classify(&self, request: &ClassificationRequest<'_>) -> Result<Verdict>;
}
