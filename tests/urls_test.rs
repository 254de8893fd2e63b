use email_normalize::*;
use std::borrow::Cow;

#[test]
fn test_truncate_drops_path_query_fragment() {
    let out = truncate_urls("go to https://example.com/a?b=c#d now");
    assert_eq!(out, "go to https://example.com now");
}

#[test]
fn test_truncate_keeps_www_prefix() {
    let out = truncate_urls("www.deals.example.net/today only");
    assert_eq!(out, "www.deals.example.net only");
}

#[test]
fn test_truncate_stops_at_last_domain_label() {
    let out = truncate_urls("http://user@login.example.com:8080/reset");
    assert_eq!(out, "http://user@login.example.com");
}

#[test]
fn test_text_without_urls_is_borrowed() {
    let out = truncate_urls("nothing to see here");
    assert!(matches!(out, Cow::Borrowed("nothing to see here")));
}

#[test]
fn test_bare_host_needs_prefix() {
    let out = truncate_urls("example.com/path stays");
    assert_eq!(out, "example.com/path stays");
}

#[test]
fn test_canonicalize_truncate_reports_nothing() {
    let (text, found) = canonicalize("see https://x.example.org/p", UrlMode::Truncate);
    assert_eq!(text, "see https://x.example.org");
    assert!(found.is_empty());
}

#[test]
fn test_canonicalize_annotate() {
    let (text, found) = canonicalize(
        "see http://x.example.org/p and www.y.example.net/q?z=1",
        UrlMode::Annotate,
    );

    assert_eq!(
        text,
        "see [URL]http://x.example.org/p[/URL] and [URL]www.y.example.net/q?z=1[/URL]"
    );
    assert_eq!(
        found,
        vec!["http://x.example.org/p", "www.y.example.net/q?z=1"]
    );
}
