//! MIME unwrapping: headers, subject, and candidate bodies

use crate::config::NormalizerConfig;
use crate::error::{NormalizeError, Result};
use crate::types::{BodyPart, Headers, ParsedMessage};
use charset::Charset;
use mailparse::{MailHeader, ParsedMail};
use tracing::debug;

/// Parse raw message bytes into headers, subject, and the first decodable
/// HTML and plain-text parts.
pub fn parse_message(raw: &[u8], config: &NormalizerConfig) -> Result<ParsedMessage> {
    let parsed =
        mailparse::parse_mail(raw).map_err(|e| NormalizeError::MalformedMime(e.to_string()))?;

    let headers = collect_headers(&parsed.headers);
    let subject = extract_subject(&parsed.headers, &config.subject_placeholder);

    let mut html = None;
    let mut plain = None;
    collect_bodies(&parsed, config, &mut html, &mut plain);

    debug!(
        "Unwrapped message: {} headers, html={}, plain={}",
        headers.len(),
        html.is_some(),
        plain.is_some()
    );

    Ok(ParsedMessage {
        headers,
        subject,
        html,
        plain,
    })
}

fn collect_headers(headers: &[MailHeader]) -> Headers {
    headers.iter().map(|h| (h.get_key(), h.get_value())).collect()
}

fn extract_subject(headers: &[MailHeader], placeholder: &str) -> String {
    headers
        .iter()
        .rev()
        .find(|h| h.get_key().eq_ignore_ascii_case("subject"))
        .map_or_else(|| placeholder.to_string(), MailHeader::get_value)
}

// Depth-first, document order; the first decodable part of each kind wins.
fn collect_bodies(
    part: &ParsedMail,
    config: &NormalizerConfig,
    html: &mut Option<BodyPart>,
    plain: &mut Option<BodyPart>,
) {
    if !part.subparts.is_empty() {
        for sub in &part.subparts {
            collect_bodies(sub, config, html, plain);
        }
        return;
    }

    let slot = match part.ctype.mimetype.to_ascii_lowercase().as_str() {
        "text/html" => html,
        "text/plain" => plain,
        "message/rfc822" => {
            collect_attached_message(part, config, html, plain);
            return;
        }
        _ => return,
    };
    if slot.is_some() {
        return;
    }

    let payload = match part.get_body_raw() {
        Ok(payload) if !payload.is_empty() => payload,
        Ok(_) => return,
        Err(e) => {
            debug!("Skipping {} part: {e}", part.ctype.mimetype);
            return;
        }
    };

    let label = part
        .ctype
        .params
        .get("charset")
        .map_or(config.default_charset.as_str(), String::as_str);

    if let Some(text) = decode_charset(&payload, label) {
        *slot = Some(BodyPart {
            text,
            charset: label.to_ascii_lowercase(),
        });
    } else {
        debug!(
            "Skipping {} part with unsupported charset {label:?}",
            part.ctype.mimetype
        );
    }
}

// mailparse leaves an attached message as a single leaf part; its own
// parts are walked like the enclosing message's.
fn collect_attached_message(
    part: &ParsedMail,
    config: &NormalizerConfig,
    html: &mut Option<BodyPart>,
    plain: &mut Option<BodyPart>,
) {
    let raw = match part.get_body_raw() {
        Ok(raw) => raw,
        Err(e) => {
            debug!("Skipping attached message: {e}");
            return;
        }
    };
    match mailparse::parse_mail(&raw) {
        Ok(inner) => collect_bodies(&inner, config, html, plain),
        Err(e) => debug!("Skipping unparsable attached message: {e}"),
    }
}

/// Decode `bytes` with the charset named by `label`, replacing malformed
/// sequences. Returns `None` when the label is not a known charset.
#[must_use]
pub fn decode_charset(bytes: &[u8], label: &str) -> Option<String> {
    let charset = Charset::for_label(label.trim().trim_matches('"').as_bytes())?;
    let (text, _had_errors) = charset.decode_without_bom_handling(bytes);
    Some(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_latin1() {
        assert_eq!(decode_charset(b"caf\xe9", "iso-8859-1").unwrap(), "café");
    }

    #[test]
    fn replaces_invalid_utf8() {
        assert_eq!(decode_charset(b"a\xffb", "utf-8").unwrap(), "a\u{FFFD}b");
    }

    #[test]
    fn unknown_label() {
        assert!(decode_charset(b"abc", "x-no-such-charset").is_none());
    }
}
