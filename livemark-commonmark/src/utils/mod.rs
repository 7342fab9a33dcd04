//! Small helpers shared by the processor and the renderer crate.

use kuchikikiki::{NodeRef, parse_html};
use log::warn;
use tendril::TendrilSink;

/// Create a regex that never matches anything.
///
/// Used as the fallback when a static pattern fails to compile, so a broken
/// pattern degrades to "no match" instead of matching empty strings.
///
/// # Panics
///
/// Panics if the fallback pattern `^\b$` fails to compile, which cannot
/// happen with a working `regex` crate.
#[must_use]
#[allow(clippy::expect_used, reason = "This pattern is guaranteed to be valid")]
pub fn never_matching_regex() -> regex::Regex {
  regex::Regex::new(r"[^\s\S]").unwrap_or_else(|_| {
    regex::Regex::new(r"^\b$").expect("trivial fallback regex compiles")
  })
}

/// Parse an HTML fragment into a full document tree.
///
/// The fragment ends up as the children of the `<body>` element.
#[must_use]
pub fn parse_fragment(html: &str) -> NodeRef {
  parse_html().one(html)
}

/// Find the `<body>` element of a parsed document.
#[must_use]
pub fn body_of(document: &NodeRef) -> Option<NodeRef> {
  document
    .select_first("body")
    .ok()
    .map(|body| body.as_node().clone())
}

/// Serialize the children of `node` without the node itself.
#[must_use]
pub fn serialize_children(node: &NodeRef) -> String {
  let mut buf = Vec::new();
  for child in node.children() {
    if let Err(e) = child.serialize(&mut buf) {
      warn!("Failed to serialize HTML node: {e}");
    }
  }
  String::from_utf8(buf).unwrap_or_default()
}

/// Serialize the body content of a parsed document.
///
/// Returns an empty string for a document without a body.
#[must_use]
pub fn serialize_body(document: &NodeRef) -> String {
  body_of(document)
    .map(|body| serialize_children(&body))
    .unwrap_or_default()
}
