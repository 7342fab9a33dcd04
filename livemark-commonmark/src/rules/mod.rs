//! Overridable render rules.
//!
//! The processor flattens the parsed document into a token stream holding
//! only the token kinds that can be overridden: link open, link close and
//! fenced code blocks. Each kind maps to at most one [`RenderRule`]. A rule
//! returns the markup for a token, or `None` to fall back to the default
//! rendering.
//!
//! - [`video`]: rewrites marked links into `<video>` elements
//! - [`playground`]: turns fenced blocks into playground placeholders

pub mod playground;
pub mod video;

use std::{collections::HashMap, fmt, sync::Arc};

pub use playground::PlaygroundFenceRule;
pub use video::VideoLinkRule;

use crate::templates::TemplateSet;

/// Token kinds that can carry a render rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  LinkOpen,
  LinkClose,
  Fence,
}

/// One element of the overridable token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind:    TokenKind,
  /// `1` for open tokens, `-1` for close tokens, `0` otherwise.
  pub nesting: i8,
  /// Link attributes (`href`, `title`).
  pub attrs:   Vec<(String, String)>,
  /// Fence info string.
  pub info:    String,
  /// Fence body, verbatim.
  pub content: String,
  /// For close tokens, the index of the matching open token.
  pub opener:  Option<usize>,
}

impl Token {
  /// Create a link open token.
  #[must_use]
  pub fn link_open(href: &str, title: &str) -> Self {
    let mut attrs = vec![("href".to_string(), href.to_string())];
    if !title.is_empty() {
      attrs.push(("title".to_string(), title.to_string()));
    }
    Self {
      kind: TokenKind::LinkOpen,
      nesting: 1,
      attrs,
      info: String::new(),
      content: String::new(),
      opener: None,
    }
  }

  /// Create a link close token paired with the open token at `opener`.
  #[must_use]
  pub const fn link_close(opener: usize) -> Self {
    Self {
      kind:    TokenKind::LinkClose,
      nesting: -1,
      attrs:   Vec::new(),
      info:    String::new(),
      content: String::new(),
      opener:  Some(opener),
    }
  }

  /// Create a fence token.
  #[must_use]
  pub fn fence(info: &str, content: &str) -> Self {
    Self {
      kind:    TokenKind::Fence,
      nesting: 0,
      attrs:   Vec::new(),
      info:    info.to_string(),
      content: content.to_string(),
      opener:  None,
    }
  }

  /// Look up an attribute value.
  #[must_use]
  pub fn attr(&self, name: &str) -> Option<&str> {
    self
      .attrs
      .iter()
      .find(|(key, _)| key == name)
      .map(|(_, value)| value.as_str())
  }
}

/// Per-render state handed to every rule.
#[derive(Debug, Clone, Copy)]
pub struct RenderEnv<'a> {
  /// Whether the document being rendered enables playgrounds.
  pub playgrounds: bool,
  /// Templates the widget side can mount.
  pub templates:   &'a TemplateSet,
}

/// A render override for one or more token kinds.
pub trait RenderRule: Send + Sync {
  /// Render `tokens[idx]`, or return `None` for the default rendering.
  fn render(
    &self,
    tokens: &[Token],
    idx: usize,
    env: &RenderEnv<'_>,
  ) -> Option<String>;
}

/// Mapping from token kind to its render rule.
///
/// Built once when the processor is constructed.
#[derive(Clone, Default)]
pub struct RuleSet {
  rules: HashMap<TokenKind, Arc<dyn RenderRule>>,
}

impl RuleSet {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Register `rule` for `kind`, replacing any previous rule.
  pub fn set(&mut self, kind: TokenKind, rule: Arc<dyn RenderRule>) {
    self.rules.insert(kind, rule);
  }

  /// Builder-style [`RuleSet::set`].
  #[must_use]
  pub fn with(mut self, kind: TokenKind, rule: Arc<dyn RenderRule>) -> Self {
    self.set(kind, rule);
    self
  }

  #[must_use]
  pub fn get(&self, kind: TokenKind) -> Option<&Arc<dyn RenderRule>> {
    self.rules.get(&kind)
  }

  #[must_use]
  pub fn contains(&self, kind: TokenKind) -> bool {
    self.rules.contains_key(&kind)
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  /// Run the rule registered for the token at `idx`, if any.
  #[must_use]
  pub fn render(
    &self,
    tokens: &[Token],
    idx: usize,
    env: &RenderEnv<'_>,
  ) -> Option<String> {
    let token = tokens.get(idx)?;
    self.get(token.kind)?.render(tokens, idx, env)
  }
}

impl fmt::Debug for RuleSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut kinds: Vec<_> = self.rules.keys().collect();
    kinds.sort_by_key(|kind| format!("{kind:?}"));
    f.debug_struct("RuleSet").field("kinds", &kinds).finish()
  }
}

/// Default markup for a link open token.
#[must_use]
pub fn default_link_open(token: &Token) -> String {
  let href = html_escape::encode_double_quoted_attribute(
    token.attr("href").unwrap_or_default(),
  );
  match token.attr("title") {
    Some(title) => {
      format!(
        r#"<a href="{href}" title="{}">"#,
        html_escape::encode_double_quoted_attribute(title)
      )
    },
    None => format!(r#"<a href="{href}">"#),
  }
}

/// Default markup for a link close token.
#[must_use]
pub const fn default_link_close() -> &'static str {
  "</a>"
}
