use email_normalize::*;

#[test]
fn test_declared_charset_is_used() {
    let raw = b"Subject: Caf\r\n\
                Content-Type: text/plain; charset=iso-8859-1\r\n\
                \r\n\
                caf\xe9";
    let parsed = parse_message(raw, &NormalizerConfig::default()).unwrap();

    let plain = parsed.plain.unwrap();
    assert_eq!(plain.text, "caf\u{e9}");
    assert_eq!(plain.charset, "iso-8859-1");
    assert!(parsed.html.is_none());
}

#[test]
fn test_undeclared_charset_uses_default() {
    let raw = "Subject: Utf\r\n\r\nna\u{ef}ve".as_bytes();
    let parsed = parse_message(raw, &NormalizerConfig::default()).unwrap();

    let plain = parsed.plain.unwrap();
    assert_eq!(plain.charset, "utf-8");
    assert_eq!(plain.text, "na\u{ef}ve");
}

#[test]
fn test_invalid_bytes_are_replaced() {
    let raw = b"Subject: Bad\r\n\
                Content-Type: text/plain; charset=utf-8\r\n\
                \r\n\
                ok\xff";
    let parsed = parse_message(raw, &NormalizerConfig::default()).unwrap();

    assert_eq!(parsed.plain.unwrap().text, "ok\u{FFFD}");
}

#[test]
fn test_unknown_charset_part_is_skipped() {
    let raw = b"Subject: Skip\r\n\
                Content-Type: multipart/alternative; boundary=\"sep\"\r\n\
                \r\n\
                --sep\r\n\
                Content-Type: text/html; charset=x-klingon\r\n\
                \r\n\
                <p>unreadable</p>\r\n\
                --sep\r\n\
                Content-Type: text/plain; charset=utf-8\r\n\
                \r\n\
                readable\r\n\
                --sep--\r\n";
    let parsed = parse_message(raw, &NormalizerConfig::default()).unwrap();

    assert!(parsed.html.is_none());
    let (body, kind) = parsed.best_body();
    assert_eq!(kind, ContentKind::PlainText);
    assert!(body.contains("readable"));
}

#[test]
fn test_nested_multipart_first_html_wins() {
    let raw = b"Subject: Nested\r\n\
                Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
                \r\n\
                --outer\r\n\
                Content-Type: multipart/alternative; boundary=\"inner\"\r\n\
                \r\n\
                --inner\r\n\
                Content-Type: text/plain\r\n\
                \r\n\
                first plain\r\n\
                --inner\r\n\
                Content-Type: text/html\r\n\
                Content-Transfer-Encoding: base64\r\n\
                \r\n\
                PHA+Zmlyc3QgaHRtbDwvcD4=\r\n\
                --inner--\r\n\
                --outer\r\n\
                Content-Type: text/html\r\n\
                \r\n\
                <p>second html</p>\r\n\
                --outer--\r\n";
    let parsed = parse_message(raw, &NormalizerConfig::default()).unwrap();

    assert_eq!(parsed.html.unwrap().text, "<p>first html</p>");
    assert!(parsed.plain.unwrap().text.contains("first plain"));
}

#[test]
fn test_encoded_subject_is_decoded() {
    let raw = b"Subject: =?UTF-8?B?w4dhIHZh?=\r\n\r\nbody";
    let parsed = parse_message(raw, &NormalizerConfig::default()).unwrap();

    assert_eq!(parsed.subject, "\u{c7}a va");
}

#[test]
fn test_headers_keep_order() {
    let raw = b"Received: from a\r\nFrom: x@example.com\r\nTo: y@example.com\r\n\r\nbody";
    let parsed = parse_message(raw, &NormalizerConfig::default()).unwrap();

    let names: Vec<&str> = parsed.headers.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["Received", "From", "To"]);
    assert_eq!(parsed.headers.get("to"), Some("y@example.com"));
}

#[test]
fn test_decode_charset_labels() {
    assert_eq!(decode_charset(b"\x82\xa0", "shift_jis").unwrap(), "\u{3042}");
    assert_eq!(decode_charset(b"abc", "\"UTF-8\"").unwrap(), "abc");
    assert!(decode_charset(b"abc", "no-such").is_none());
}

#[test]
fn test_attached_message_is_unwrapped() {
    let raw = b"Subject: Fwd: invoice\r\n\
                Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
                \r\n\
                --outer\r\n\
                Content-Type: message/rfc822\r\n\
                \r\n\
                Subject: invoice\r\n\
                Content-Type: text/html; charset=utf-8\r\n\
                \r\n\
                <a href=\"http://evil.example.com/x\">go</a>\r\n\
                --outer--\r\n";
    let parsed = parse_message(raw, &NormalizerConfig::default()).unwrap();

    assert_eq!(parsed.subject, "Fwd: invoice");
    let html = parsed.html.unwrap();
    assert!(html.text.contains(r#"<a href="http://evil.example.com/x">go</a>"#));
}

#[test]
fn test_attached_message_urls_reach_output() {
    let raw = b"Subject: Fwd\r\n\
                Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
                \r\n\
                --outer\r\n\
                Content-Type: message/rfc822\r\n\
                \r\n\
                Content-Type: text/html; charset=utf-8\r\n\
                \r\n\
                <a href=\"http://evil.example.com/x\">go</a>\r\n\
                --outer--\r\n";
    let email = normalize_message(raw, &NormalizerConfig::default()).unwrap();

    assert!(email.urls.contains("http://evil.example.com/x"));
    assert_eq!(
        email.body,
        r#"[URL HREF="http://evil.example.com"] go [/URL]"#
    );
}

#[test]
fn test_unparsable_attached_message_is_skipped() {
    let raw = b"Subject: Fwd\r\n\
                Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
                \r\n\
                --outer\r\n\
                Content-Type: text/plain\r\n\
                \r\n\
                cover note\r\n\
                --outer\r\n\
                Content-Type: message/rfc822\r\n\
                \r\n\
                \x20broken\r\n\
                --outer--\r\n";
    let parsed = parse_message(raw, &NormalizerConfig::default()).unwrap();

    assert!(parsed.html.is_none());
    assert!(parsed.plain.unwrap().text.contains("cover note"));
}
