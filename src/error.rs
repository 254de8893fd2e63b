//! Error types for email normalization

use thiserror::Error;

/// Errors that abort normalization of a single message.
///
/// Per-part charset failures and quoted-printable repair failures are not
/// represented here: they are recovered inside the pipeline and only logged.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// The MIME structure could not be parsed
    #[error("Malformed MIME structure: {0}")]
    MalformedMime(String),

    /// A base64url payload could not be decoded
    #[error("Invalid base64url payload: {0}")]
    Base64(String),

    /// A classifier response did not carry a usable verdict
    #[error("Invalid classifier verdict: {0}")]
    InvalidVerdict(String),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for normalization operations
pub type Result<T> = std::result::Result<T, NormalizeError>;
