// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Email Normalizer
//!
//! Turns raw email messages into a canonical plain-text form for
//! classifiers: the best body part is unwrapped from its MIME envelope,
//! HTML is rewritten into bracket markers, URLs in the text are truncated to
//! scheme and host, and whitespace is collapsed. Every URL referenced by the
//! message is reported separately and untruncated.
//!
//! # Markers
//!
//! - `[SCRIPT]` for removed scripts
//! - `[IMG SRC="..."]` or `[IMG]`
//! - `[BTN HREF="..."] text [/BTN]` or `[BTN]`
//! - `[URL HREF="..."] text [/URL]`, `[EMAIL HREF="..."] ...`,
//!   `[PHONE HREF="..."] ...` for links
//!
//! # Example
//!
//! ```rust
//! use email_normalize::{NormalizerConfig, normalize_message};
//!
//! let raw = b"From: sender@example.com\r\n\
//!             Subject: Hello\r\n\
//!             Content-Type: text/html\r\n\
//!             \r\n\
//!             <p>Call <a href=\"tel:12345\">Call</a></p>";
//! let email = normalize_message(raw, &NormalizerConfig::default()).unwrap();
//!
//! assert_eq!(email.subject, "Hello");
//! assert!(email.body.contains("[PHONE HREF=\"12345\"] Call [/PHONE]"));
//! assert!(email.urls.contains("12345"));
//! ```

mod classify;
mod config;
mod error;
mod mime;
mod pipeline;
mod rewrite;
mod transfer;
mod types;
mod urls;
mod whitespace;

pub use classify::{ClassificationRequest, Classifier, Label, Verdict};
pub use config::{DEFAULT_CHARSET, NormalizerConfig, SUBJECT_PLACEHOLDER};
pub use error::{NormalizeError, Result};
pub use mime::{decode_charset, parse_message};
pub use pipeline::{
    normalize_base64url, normalize_batch, normalize_body, normalize_body_base64url,
    normalize_message,
};
pub use rewrite::{RewrittenHtml, rewrite_html};
pub use transfer::{QUOTED_PRINTABLE_MARKER, decode_quoted_printable, repair_quoted_printable};
pub use types::*;
pub use urls::{UrlMode, canonicalize, truncate_urls};
pub use whitespace::normalize_whitespace;
