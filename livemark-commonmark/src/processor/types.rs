//! Type definitions for the Markdown processor.
//!
//! Contains the core types used by the processor:
//! - Configuration options (`MarkdownOptions`) and their builder
//! - The main processor struct (`MarkdownProcessor`)
//! - AST transformation traits and implementations
//!
//! # Examples
//!
//! ```
//! use livemark_commonmark::{MarkdownOptions, MarkdownProcessor};
//!
//! let options = MarkdownOptions {
//!   gfm: true,
//!   playgrounds: true,
//!   highlight_code: false,
//!   ..Default::default()
//! };
//!
//! let processor = MarkdownProcessor::new(options);
//! ```

use std::sync::LazyLock;

use comrak::nodes::{AstNode, NodeValue};
use log::{error, trace};
use regex::Regex;

use crate::{
  rules::{
    RuleSet,
    video::{DEFAULT_VIDEO_CLASS, DEFAULT_VIDEO_MARKER},
  },
  syntax::SyntaxManager,
  templates::TemplateSet,
  types::ATTR_PLAYGROUND,
  utils::never_matching_regex,
};

/// Matches a start tag, including quoted attribute values that contain `>`.
/// An unterminated tag runs to the end of the input.
static START_TAG: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"<[A-Za-z][^\s/>]*(?:[^>"']|"[^"]*"|'[^']*'|["'])*(?:>|$)"#)
    .unwrap_or_else(|e| {
      error!("Failed to compile START_TAG regex: {e}");
      never_matching_regex()
    })
});

/// Matches one attribute of a start tag with its leading separators, so a
/// quoted value is never read as an attribute name.
static TAG_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r#"(?:\s|/)*(?P<name>[^\s"'>/=]+)(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]*))?"#,
  )
  .unwrap_or_else(|e| {
    error!("Failed to compile TAG_ATTRIBUTE regex: {e}");
    never_matching_regex()
  })
});

/// Options for configuring the Markdown processor.
#[derive(Debug, Clone)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct MarkdownOptions {
  /// Enable GitHub Flavored Markdown (GFM) extensions.
  pub gfm: bool,

  /// Pass raw HTML written by the author through unescaped.
  pub raw_html: bool,

  /// Enable syntax highlighting for code blocks.
  pub highlight_code: bool,

  /// Optional: Custom syntax highlighting theme name.
  pub highlight_theme: Option<String>,

  /// Emit playground placeholders when rendering without an explicit
  /// per-document setting.
  pub playgrounds: bool,

  /// Playground templates a fenced block may name.
  pub templates: TemplateSet,

  /// URL marker that turns a link into a video. Empty disables the rewrite.
  pub video_marker: String,

  /// Class set on rewritten video elements.
  pub video_class: String,
}

impl MarkdownOptions {
  /// Enable all available features based on compile-time feature flags.
  #[must_use]
  pub fn with_all_features() -> Self {
    Self {
      gfm: true,
      highlight_code: cfg!(feature = "syntect"),
      playgrounds: true,
      ..Self::default()
    }
  }
}

impl Default for MarkdownOptions {
  fn default() -> Self {
    Self {
      gfm:             true,
      raw_html:        false,
      highlight_code:  cfg!(feature = "syntect"),
      highlight_theme: None,
      playgrounds:     false,
      templates:       TemplateSet::sandpack(),
      video_marker:    DEFAULT_VIDEO_MARKER.to_string(),
      video_class:     DEFAULT_VIDEO_CLASS.to_string(),
    }
  }
}

/// Main Markdown processor.
///
/// Can be cheaply cloned; the rules and the syntax backend are shared.
#[derive(Clone)]
pub struct MarkdownProcessor {
  pub(crate) options:        MarkdownOptions,
  pub(crate) rules:          RuleSet,
  pub(crate) syntax_manager: Option<SyntaxManager>,
}

impl std::fmt::Debug for MarkdownProcessor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MarkdownProcessor")
      .field("options", &self.options)
      .field("rules", &self.rules)
      .field(
        "highlighter",
        &self.syntax_manager.as_ref().map(|m| m.highlighter().name()),
      )
      .finish()
  }
}

/// Trait for AST transformations applied before rendering.
pub trait AstTransformer {
  fn transform<'a>(&self, node: &'a AstNode<'a>);
}

/// AST transformer that turns author-written raw HTML into literal text.
///
/// Block and inline HTML nodes keep their position but their contents are
/// escaped, so `<script>` shows up as text instead of markup.
pub struct RawHtmlTransformer;

impl AstTransformer for RawHtmlTransformer {
  fn transform<'a>(&self, node: &'a AstNode<'a>) {
    for child in node.children() {
      {
        let mut data = child.data.borrow_mut();
        match data.value {
          NodeValue::HtmlBlock(ref mut block) => {
            block.literal = html_escape::encode_text(&block.literal).into_owned();
          },
          NodeValue::HtmlInline(ref mut html) => {
            *html = html_escape::encode_text(html.as_str()).into_owned();
          },
          _ => {},
        }
      }
      self.transform(child);
    }
  }
}

/// AST transformer that removes `data-playground*` attributes from
/// author-written raw HTML.
///
/// Placeholder attributes are reserved for the playground rule, so markup
/// passed through with `raw_html` can never pose as a placeholder.
pub struct PlaygroundAttributeFilter;

impl PlaygroundAttributeFilter {
  /// Strip placeholder attributes from every start tag in `html`.
  #[must_use]
  pub fn filter(html: &str) -> String {
    START_TAG
      .replace_all(html, |tag: &regex::Captures<'_>| {
        TAG_ATTRIBUTE
          .replace_all(&tag[0], |attr: &regex::Captures<'_>| {
            if attr["name"]
              .to_ascii_lowercase()
              .starts_with(ATTR_PLAYGROUND)
            {
              String::new()
            } else {
              attr[0].to_string()
            }
          })
          .into_owned()
      })
      .into_owned()
  }
}

impl AstTransformer for PlaygroundAttributeFilter {
  fn transform<'a>(&self, node: &'a AstNode<'a>) {
    for child in node.children() {
      {
        let mut data = child.data.borrow_mut();
        let literal = match data.value {
          NodeValue::HtmlBlock(ref mut block) => Some(&mut block.literal),
          NodeValue::HtmlInline(ref mut html) => Some(html),
          _ => None,
        };
        if let Some(literal) = literal {
          let filtered = Self::filter(literal);
          if filtered != *literal {
            trace!("Removed placeholder attributes from raw HTML");
            *literal = filtered;
          }
        }
      }
      self.transform(child);
    }
  }
}

/// Builder for constructing `MarkdownOptions` with method chaining.
#[derive(Debug, Clone)]
pub struct MarkdownOptionsBuilder {
  options: MarkdownOptions,
}

impl MarkdownOptionsBuilder {
  /// Create a new builder with default options.
  #[must_use]
  pub fn new() -> Self {
    Self {
      options: MarkdownOptions::default(),
    }
  }

  /// Enable or disable GitHub Flavored Markdown.
  #[must_use]
  pub const fn gfm(mut self, enabled: bool) -> Self {
    self.options.gfm = enabled;
    self
  }

  /// Pass author raw HTML through unescaped.
  #[must_use]
  pub const fn raw_html(mut self, enabled: bool) -> Self {
    self.options.raw_html = enabled;
    self
  }

  /// Enable or disable syntax highlighting.
  #[must_use]
  pub const fn highlight_code(mut self, enabled: bool) -> Self {
    self.options.highlight_code = enabled;
    self
  }

  /// Set the syntax highlighting theme.
  #[must_use]
  pub fn highlight_theme<S: Into<String>>(mut self, theme: Option<S>) -> Self {
    self.options.highlight_theme = theme.map(Into::into);
    self
  }

  /// Enable or disable playground placeholders by default.
  #[must_use]
  pub const fn playgrounds(mut self, enabled: bool) -> Self {
    self.options.playgrounds = enabled;
    self
  }

  /// Set the known playground templates.
  #[must_use]
  pub fn templates(mut self, templates: TemplateSet) -> Self {
    self.options.templates = templates;
    self
  }

  /// Set the video link marker.
  #[must_use]
  pub fn video_marker<S: Into<String>>(mut self, marker: S) -> Self {
    self.options.video_marker = marker.into();
    self
  }

  /// Set the class of rewritten video elements.
  #[must_use]
  pub fn video_class<S: Into<String>>(mut self, class: S) -> Self {
    self.options.video_class = class.into();
    self
  }

  /// Build the final `MarkdownOptions`.
  #[must_use]
  pub fn build(self) -> MarkdownOptions {
    self.options
  }
}

impl Default for MarkdownOptionsBuilder {
  fn default() -> Self {
    Self::new()
  }
}
