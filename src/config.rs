//! Pipeline configuration

use crate::error::{NormalizeError, Result};
use crate::urls::UrlMode;
use serde::{Deserialize, Serialize};

/// Charset assumed for body parts that do not declare one
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Subject used when the message has no `Subject` header
pub const SUBJECT_PLACEHOLDER: &str = "NO SUBJECT";

/// Tunables for the normalization pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Charset label used when a part declares none
    pub default_charset: String,

    /// Subject reported for messages without a subject header
    pub subject_placeholder: String,

    /// How URLs inside plain-text bodies are rewritten
    pub plain_text_urls: UrlMode,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            default_charset: DEFAULT_CHARSET.to_string(),
            subject_placeholder: SUBJECT_PLACEHOLDER.to_string(),
            plain_text_urls: UrlMode::Truncate,
        }
    }
}

impl NormalizerConfig {
    /// Load a configuration from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| NormalizeError::Config(e.to_string()))
    }
}
