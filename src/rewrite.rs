//! HTML tag rewriting into bracket markers
//!
//! The document is parsed once into an immutable tree. A rewrite plan is
//! computed for every element in a single pass (which also collects raw
//! URLs), and the output text is materialized from the tree and the plan in
//! a second pass. Nothing is mutated in place.
//!
//! Parsing runs with scripting disabled so `noscript` content is markup.
//! Elements whose content the tokenizer still treats as raw text (`iframe`,
//! `textarea`, `xmp`, ...) have that text parsed and rewritten again.

use crate::urls::truncate_urls_outside;
use ego_tree::iter::Edge;
use ego_tree::{NodeId, NodeRef};
use html5ever::driver::ParseOpts;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use scraper::{Html, HtmlTreeSink};
use scraper::node::{Element, Node};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Range;
use tracing::debug;

/// Result of rewriting an HTML body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewrittenHtml {
    /// Serialized text with markers, URLs truncated to scheme and host
    pub canonicalized_body: String,

    /// Every href/src value referenced by the document, untruncated
    pub raw_urls: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Script,
    Img,
    Button,
    Url,
    Email,
    Phone,
}

impl MarkerKind {
    const fn label(self) -> &'static str {
        match self {
            Self::Script => "SCRIPT",
            Self::Img => "IMG",
            Self::Button => "BTN",
            Self::Url => "URL",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TagMarker {
    kind: MarkerKind,
    target: Option<String>,
    text: String,
}

impl TagMarker {
    const fn bare(kind: MarkerKind) -> Self {
        Self {
            kind,
            target: None,
            text: String::new(),
        }
    }

    /// Image markers keep their full source through URL truncation
    const fn protects_target(&self) -> bool {
        matches!(self.kind, MarkerKind::Img) && self.target.is_some()
    }
}

impl fmt::Display for TagMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.kind.label();
        match (&self.target, self.kind) {
            (None, _) => write!(f, "[{label}]"),
            (Some(src), MarkerKind::Img) => write!(f, "[IMG SRC=\"{src}\"]"),
            (Some(href), _) => write!(f, "[{label} HREF=\"{href}\"] {} [/{label}]", self.text),
        }
    }
}

// Raw-text content nested deeper than this is dropped.
const MAX_REPARSE_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rewrite {
    Keep,
    Replace(TagMarker),
    /// Raw-text content already rewritten on its own
    Inline(Materialized),
    Unwrap,
    Drop,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Materialized {
    text: String,
    protected: Vec<Range<usize>>,
}

/// Rewrite an HTML body into marker-annotated plain text and collect the
/// URLs it references.
#[must_use]
pub fn rewrite_html(html: &str) -> RewrittenHtml {
    let (materialized, raw_urls) = rewrite_tree(html, 0);
    let canonicalized_body =
        truncate_urls_outside(&materialized.text, &materialized.protected).into_owned();

    debug!(
        "Rewrote HTML body: {} bytes in, {} bytes out, {} urls",
        html.len(),
        canonicalized_body.len(),
        raw_urls.len()
    );

    RewrittenHtml {
        canonicalized_body,
        raw_urls,
    }
}

fn parse_lenient(html: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };
    html5ever::parse_document(HtmlTreeSink::new(Html::new_document()), opts).one(html)
}

fn rewrite_tree(html: &str, depth: usize) -> (Materialized, HashSet<String>) {
    let document = parse_lenient(html);
    let root = document.tree.root();

    let (plan, urls) = build_plan(root, depth);
    (materialize(root, &plan), urls)
}

// Every element is planned, including those nested under a replaced
// element, so that their URLs are still collected.
fn build_plan(
    root: NodeRef<'_, Node>,
    depth: usize,
) -> (HashMap<NodeId, Rewrite>, HashSet<String>) {
    let mut plan = HashMap::new();
    let mut urls = HashSet::new();

    for node in root.descendants() {
        let rewrite = match node.value() {
            Node::Text(_) => Rewrite::Keep,
            Node::Element(element) => plan_element(node, element, depth, &mut urls),
            Node::Document | Node::Fragment => Rewrite::Unwrap,
            // Doctype, comments, processing instructions
            _ => Rewrite::Drop,
        };
        plan.insert(node.id(), rewrite);
    }

    (plan, urls)
}

fn plan_element(
    node: NodeRef<'_, Node>,
    element: &Element,
    depth: usize,
    urls: &mut HashSet<String>,
) -> Rewrite {
    let attr = |name: &str| element.attr(name).filter(|value| !value.is_empty());

    match element.name() {
        "script" => Rewrite::Replace(TagMarker::bare(MarkerKind::Script)),
        "img" => Rewrite::Replace(attr("src").map_or_else(
            || TagMarker::bare(MarkerKind::Img),
            |src| {
                urls.insert(src.to_string());
                TagMarker {
                    kind: MarkerKind::Img,
                    target: Some(src.to_string()),
                    text: String::new(),
                }
            },
        )),
        "button" => Rewrite::Replace(attr("href").map_or_else(
            || TagMarker::bare(MarkerKind::Button),
            |href| {
                urls.insert(href.to_string());
                TagMarker {
                    kind: MarkerKind::Button,
                    target: Some(href.to_string()),
                    text: direct_text(node),
                }
            },
        )),
        "a" => attr("href").map_or(Rewrite::Unwrap, |href| {
            let (kind, value) = classify_href(href);
            urls.insert(value.to_string());
            Rewrite::Replace(TagMarker {
                kind,
                target: Some(value.to_string()),
                text: direct_text(node),
            })
        }),
        // Character content here is never visible text.
        "style" | "template" => Rewrite::Drop,
        "iframe" | "textarea" | "xmp" | "noembed" | "noframes" | "plaintext" | "title" => {
            reparse_raw_text(node, depth, urls)
        }
        _ => Rewrite::Unwrap,
    }
}

fn reparse_raw_text(node: NodeRef<'_, Node>, depth: usize, urls: &mut HashSet<String>) -> Rewrite {
    if depth >= MAX_REPARSE_DEPTH {
        return Rewrite::Drop;
    }
    let raw: String = node
        .descendants()
        .filter_map(|n| match n.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
        .collect();
    let (materialized, nested_urls) = rewrite_tree(&raw, depth + 1);
    urls.extend(nested_urls);
    Rewrite::Inline(materialized)
}

fn classify_href(href: &str) -> (MarkerKind, &str) {
    if let Some(number) = href
        .strip_prefix("tel:")
        .or_else(|| href.strip_prefix("sms:"))
    {
        (MarkerKind::Phone, number)
    } else if let Some(address) = href.strip_prefix("mailto:") {
        (MarkerKind::Email, address)
    } else {
        (MarkerKind::Url, href)
    }
}

/// The element's sole string: follows a chain of only-children down to a
/// single text node. Anything else yields an empty string.
fn direct_text(node: NodeRef<'_, Node>) -> String {
    let mut current = node;
    loop {
        let mut children = current.children();
        let (Some(only), None) = (children.next(), children.next()) else {
            return String::new();
        };
        match only.value() {
            Node::Text(text) => return String::from(&**text),
            Node::Element(_) => current = only,
            _ => return String::new(),
        }
    }
}

fn materialize(root: NodeRef<'_, Node>, plan: &HashMap<NodeId, Rewrite>) -> Materialized {
    let mut out = String::new();
    let mut protected = Vec::new();
    let mut skipping: Option<NodeId> = None;

    for edge in root.traverse() {
        match edge {
            Edge::Open(node) => {
                if skipping.is_some() {
                    continue;
                }
                match plan.get(&node.id()) {
                    Some(Rewrite::Keep) => {
                        if let Node::Text(text) = node.value() {
                            out.push_str(text);
                        }
                    }
                    Some(Rewrite::Replace(marker)) => {
                        let start = out.len();
                        out.push_str(&marker.to_string());
                        if marker.protects_target() {
                            protected.push(start..out.len());
                        }
                        skipping = Some(node.id());
                    }
                    Some(Rewrite::Inline(inner)) => {
                        let start = out.len();
                        out.push_str(&inner.text);
                        protected.extend(
                            inner
                                .protected
                                .iter()
                                .map(|range| range.start + start..range.end + start),
                        );
                        skipping = Some(node.id());
                    }
                    Some(Rewrite::Drop) => skipping = Some(node.id()),
                    Some(Rewrite::Unwrap) | None => {}
                }
            }
            Edge::Close(node) => {
                if skipping == Some(node.id()) {
                    skipping = None;
                }
            }
        }
    }

    Materialized {
        text: out,
        protected,
    }
}
