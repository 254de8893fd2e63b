//! Repair of quoted-printable text that survived MIME decoding

use std::borrow::Cow;
use tracing::{debug, warn};

/// Literal left in a body when a nested part was decoded as plain text and
/// its quoted-printable content was never reversed.
pub const QUOTED_PRINTABLE_MARKER: &str = "Content-Transfer-Encoding: quoted-printable";

/// Reverse quoted-printable encoding when the body still carries the
/// transfer-encoding marker. Bodies without the marker are returned as is.
#[must_use]
pub fn repair_quoted_printable(body: &str) -> Cow<'_, str> {
    if body.contains(QUOTED_PRINTABLE_MARKER) {
        debug!("Body carries a quoted-printable marker, decoding");
        decode_quoted_printable(body)
    } else {
        Cow::Borrowed(body)
    }
}

/// Reverse quoted-printable encoding unconditionally, dropping byte
/// sequences that are not valid UTF-8. Falls back to the input when the
/// encoding cannot be reversed.
#[must_use]
pub fn decode_quoted_printable(body: &str) -> Cow<'_, str> {
    match quoted_printable::decode(body.as_bytes(), quoted_printable::ParseMode::Robust) {
        Ok(bytes) => Cow::Owned(utf8_ignoring_invalid(&bytes)),
        Err(e) => {
            warn!("Quoted-printable repair failed, keeping undecoded text: {e}");
            Cow::Borrowed(body)
        }
    }
}

fn utf8_ignoring_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}
