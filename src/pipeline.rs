//! Normalization pipeline entry points

use crate::config::NormalizerConfig;
use crate::error::{NormalizeError, Result};
use crate::mime::parse_message;
use crate::rewrite::rewrite_html;
use crate::transfer::{decode_quoted_printable, repair_quoted_printable};
use crate::types::{CanonicalEmail, ContentKind, NormalizedBody};
use crate::urls::canonicalize;
use crate::whitespace::normalize_whitespace;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, warn};

// Web-mail APIs emit base64url both with and without padding.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Normalize raw message bytes into a [`CanonicalEmail`].
///
/// Fails only when the MIME structure cannot be parsed; undecodable parts
/// are skipped and a message without a usable body yields an empty body.
pub fn normalize_message(raw: &[u8], config: &NormalizerConfig) -> Result<CanonicalEmail> {
    let parsed = parse_message(raw, config)?;
    let (body, kind) = parsed.best_body();

    let body = repair_quoted_printable(body);
    let (body, urls) = normalize_body(&body, kind, config);

    debug!(
        "Normalized {kind} message {:?}: {} chars, {} urls",
        parsed.subject,
        body.len(),
        urls.len()
    );

    Ok(CanonicalEmail {
        headers: parsed.headers,
        subject: parsed.subject,
        body,
        urls,
    })
}

/// Normalize a message delivered as a base64url string.
pub fn normalize_base64url(encoded: &str, config: &NormalizerConfig) -> Result<CanonicalEmail> {
    let raw = decode_base64url(encoded)?;
    normalize_message(&raw, config)
}

/// Normalize a base64url-encoded HTML body that arrives without its MIME
/// envelope.
///
/// Quoted-printable encoding is reversed unconditionally; if that fails the
/// decoded text is used as is.
pub fn normalize_body_base64url(encoded: &str) -> Result<NormalizedBody> {
    let raw = decode_base64url(encoded)?;
    let text = String::from_utf8_lossy(&raw);
    let text = decode_quoted_printable(&text);

    let rewritten = rewrite_html(&text);
    Ok(NormalizedBody {
        body: normalize_whitespace(&rewritten.canonicalized_body),
        urls: rewritten.raw_urls,
    })
}

/// Normalize many messages in parallel.
///
/// Results come back in input order. A message that fails is reported in
/// its own slot and does not affect the others.
pub fn normalize_batch<M>(messages: &[M], config: &NormalizerConfig) -> Vec<Result<CanonicalEmail>>
where
    M: AsRef<[u8]> + Sync,
{
    messages
        .par_iter()
        .enumerate()
        .map(|(index, raw)| {
            normalize_message(raw.as_ref(), config).inspect_err(|e| {
                warn!("Message {index} failed to normalize: {e}");
            })
        })
        .collect()
}

/// Run the rewriting stages on an already-unwrapped body.
///
/// HTML goes through the tag rewriter; plain text only has its URLs
/// rewritten, in the mode chosen by `config`.
#[must_use]
pub fn normalize_body(
    body: &str,
    kind: ContentKind,
    config: &NormalizerConfig,
) -> (String, HashSet<String>) {
    let (text, urls) = match kind {
        ContentKind::Html => {
            let rewritten = rewrite_html(body);
            (rewritten.canonicalized_body, rewritten.raw_urls)
        }
        ContentKind::PlainText => {
            let (text, found) = canonicalize(body, config.plain_text_urls);
            (text, found.into_iter().collect())
        }
    };
    (normalize_whitespace(&text), urls)
}

fn decode_base64url(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    BASE64URL
        .decode(compact.as_bytes())
        .map_err(|e| NormalizeError::Base64(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64url_padding_is_optional() {
        assert_eq!(decode_base64url("aGk").unwrap(), b"hi");
        assert_eq!(decode_base64url("aGk=").unwrap(), b"hi");
        assert_eq!(decode_base64url("Pz8-\n").unwrap(), b"??>");
    }

    #[test]
    fn base64url_rejects_standard_alphabet() {
        assert!(matches!(
            decode_base64url("Pz8+"),
            Err(NormalizeError::Base64(_))
        ));
    }
}
