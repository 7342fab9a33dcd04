//! Core implementation of the Markdown processor.
//!
//! Rendering runs in four steps:
//!
//! 1. Parse the document into a comrak AST.
//! 2. Flatten the overridable nodes (links and fenced code blocks) into a
//!    token stream and ask the [`RuleSet`] for overrides.
//! 3. Splice override markup back into the AST as raw HTML nodes and let
//!    comrak format the rest.
//! 4. Highlight the remaining code blocks in a DOM pass.
use std::sync::Arc;

use comrak::{
  Arena,
  nodes::{AstNode, NodeValue},
  options::Options,
  parse_document,
};
use kuchikikiki::NodeRef;
use log::{debug, error, trace};

use super::{
  process::process_safe,
  types::{
    AstTransformer,
    MarkdownOptions,
    MarkdownProcessor,
    PlaygroundAttributeFilter,
    RawHtmlTransformer,
  },
};
use crate::{
  rules::{
    PlaygroundFenceRule,
    RenderEnv,
    RenderRule,
    RuleSet,
    Token,
    TokenKind,
    VideoLinkRule,
    default_link_close,
    default_link_open,
  },
  syntax::create_manager_with_theme,
  types::{ATTR_PLAYGROUND, MarkdownResult},
  utils,
};

/// Where a token came from in the AST.
enum TokenSite<'a> {
  Link {
    node:  &'a AstNode<'a>,
    open:  usize,
    close: usize,
  },
  Fence {
    node: &'a AstNode<'a>,
    idx:  usize,
  },
}

impl MarkdownProcessor {
  /// Create a new `MarkdownProcessor` with the given options and the
  /// default rules.
  #[must_use]
  pub fn new(options: MarkdownOptions) -> Self {
    let rules = default_rules(&options);
    Self::with_rules(options, rules)
  }

  /// Create a processor with a custom rule set.
  #[must_use]
  pub fn with_rules(options: MarkdownOptions, rules: RuleSet) -> Self {
    let syntax_manager = if options.highlight_code {
      create_manager_with_theme(options.highlight_theme.clone())
        .inspect_err(|e| debug!("Syntax highlighting unavailable: {e}"))
        .ok()
    } else {
      None
    };

    Self {
      options,
      rules,
      syntax_manager,
    }
  }

  /// Replace the rule for one token kind.
  #[must_use]
  pub fn with_rule(mut self, kind: TokenKind, rule: Arc<dyn RenderRule>) -> Self {
    self.rules.set(kind, rule);
    self
  }

  /// Access processor options.
  #[must_use]
  pub const fn options(&self) -> &MarkdownOptions {
    &self.options
  }

  /// Access the rule set.
  #[must_use]
  pub const fn rules(&self) -> &RuleSet {
    &self.rules
  }

  /// Whether code blocks will be syntax highlighted.
  #[must_use]
  pub const fn highlights_code(&self) -> bool {
    self.options.highlight_code && self.syntax_manager.is_some()
  }

  /// Render Markdown to HTML with the default playground setting.
  #[must_use]
  pub fn render(&self, markdown: &str) -> MarkdownResult {
    self.render_with(markdown, self.options.playgrounds)
  }

  /// Render Markdown to HTML, emitting playground placeholders only when
  /// `playgrounds` is set.
  #[must_use]
  pub fn render_with(&self, markdown: &str, playgrounds: bool) -> MarkdownResult {
    if markdown.is_empty() {
      return MarkdownResult::default();
    }

    let arena = Arena::new();
    let options = self.comrak_options();
    let root = parse_document(&arena, markdown, &options);

    if self.options.raw_html {
      PlaygroundAttributeFilter.transform(root);
    } else {
      RawHtmlTransformer.transform(root);
    }

    let env = RenderEnv {
      playgrounds,
      templates: &self.options.templates,
    };
    let placeholders = self.apply_rules(root, &options, &env);

    let mut html = String::new();
    if let Err(e) = comrak::format_html(root, &options, &mut html) {
      error!("Failed to format markdown as HTML: {e}");
    }

    if self.highlights_code() {
      html = self.highlight_codeblocks(&html);
    }

    MarkdownResult { html, placeholders }
  }

  /// Build comrak options from `MarkdownOptions`.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.options.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
    }
    // Rule output is spliced in as raw HTML; author HTML is escaped by
    // `RawHtmlTransformer` unless `raw_html` is set, in which case
    // `PlaygroundAttributeFilter` strips placeholder attributes from it.
    options.render.r#unsafe = true;
    options
  }

  /// Run the rule set over the document and splice overrides into the AST.
  ///
  /// Returns the number of playground placeholders emitted.
  fn apply_rules<'a>(
    &self,
    root: &'a AstNode<'a>,
    options: &Options<'_>,
    env: &RenderEnv<'_>,
  ) -> usize {
    if self.rules.is_empty() {
      return 0;
    }

    let mut tokens = Vec::new();
    let mut sites = Vec::new();
    collect_tokens(root, &mut tokens, &mut sites);
    trace!("Collected {} overridable tokens", tokens.len());

    let mut placeholders = 0;
    for site in sites {
      match site {
        TokenSite::Fence { node, idx } => {
          let Some(html) = self.rules.render(&tokens, idx, env) else {
            continue;
          };
          if is_placeholder_markup(&html) {
            placeholders += 1;
          }
          node.data.borrow_mut().value = NodeValue::HtmlInline(html + "\n");
        },
        TokenSite::Link { node, open, close } => {
          let open_html = self.rules.render(&tokens, open, env);
          let close_html = self.rules.render(&tokens, close, env);
          if open_html.is_none() && close_html.is_none() {
            continue;
          }

          let mut html = open_html
            .unwrap_or_else(|| default_link_open(&tokens[open]));
          for child in node.children() {
            if let Err(e) = comrak::format_html(child, options, &mut html) {
              error!("Failed to format link content: {e}");
            }
          }
          html.push_str(
            close_html.as_deref().unwrap_or(default_link_close()),
          );

          let children: Vec<_> = node.children().collect();
          for child in children {
            child.detach();
          }
          node.data.borrow_mut().value = NodeValue::HtmlInline(html);
        },
      }
    }

    if placeholders > 0 {
      debug!("Emitted {placeholders} playground placeholder(s)");
    }
    placeholders
  }

  /// Highlight all code blocks in HTML using the configured syntax highlighter
  #[must_use]
  pub fn highlight_codeblocks(&self, html: &str) -> String {
    let Some(syntax_manager) = self.syntax_manager.as_ref() else {
      return html.to_string();
    };
    let theme = self.options.highlight_theme.as_deref();

    process_safe(
      html,
      |html| {
        let document = utils::parse_fragment(html);

        // Collect all code blocks first to avoid DOM modification during
        // iteration
        let code_blocks: Vec<(NodeRef, String, String)> = document
          .select("pre > code")
          .map(|codes| {
            codes
              .filter_map(|code| {
                let language = code
                  .attributes
                  .borrow()
                  .get("class")
                  .and_then(|class| {
                    class
                      .split_whitespace()
                      .find_map(|c| c.strip_prefix("language-"))
                  })
                  .map(str::to_string)?;
                let pre = code.as_node().parent()?;
                Some((pre, code.as_node().text_contents(), language))
              })
              .collect()
          })
          .unwrap_or_default();

        for (pre, code_text, language) in code_blocks {
          let highlighted =
            syntax_manager.highlight_or_escape(&code_text, &language, theme);
          let wrapped = format!(
            r#"<pre class="highlight"><code class="language-{}">{}</code></pre>"#,
            html_escape::encode_double_quoted_attribute(&language),
            strip_pre_wrapper(&highlighted),
          );
          let fragment = utils::parse_fragment(&wrapped);
          if let Some(body) = utils::body_of(&fragment) {
            let nodes: Vec<_> = body.children().collect();
            for node in nodes {
              pre.insert_before(node);
            }
            pre.detach();
          }
        }

        utils::serialize_body(&document)
      },
      html,
    )
  }
}

/// Build the default rule set: video links and playground fences.
#[must_use]
pub fn default_rules(options: &MarkdownOptions) -> RuleSet {
  let mut rules = RuleSet::new();
  if !options.video_marker.is_empty() {
    let video: Arc<dyn RenderRule> = Arc::new(VideoLinkRule::new(
      options.video_marker.clone(),
      options.video_class.clone(),
    ));
    rules.set(TokenKind::LinkOpen, Arc::clone(&video));
    rules.set(TokenKind::LinkClose, video);
  }
  rules.set(TokenKind::Fence, Arc::new(PlaygroundFenceRule));
  rules
}

/// Flatten links and fenced code blocks into a token stream, in document
/// order. A link's close token follows the tokens of its content.
fn collect_tokens<'a>(
  node: &'a AstNode<'a>,
  tokens: &mut Vec<Token>,
  sites: &mut Vec<TokenSite<'a>>,
) {
  for child in node.children() {
    let token = match &child.data.borrow().value {
      NodeValue::Link(link) => Some(Token::link_open(&link.url, &link.title)),
      NodeValue::CodeBlock(block) if block.fenced => {
        Some(Token::fence(&block.info, &block.literal))
      },
      _ => None,
    };

    match token {
      Some(token) if token.kind == TokenKind::LinkOpen => {
        let open = tokens.len();
        tokens.push(token);
        collect_tokens(child, tokens, sites);
        let close = tokens.len();
        tokens.push(Token::link_close(open));
        sites.push(TokenSite::Link {
          node: child,
          open,
          close,
        });
      },
      Some(token) => {
        sites.push(TokenSite::Fence {
          node: child,
          idx:  tokens.len(),
        });
        tokens.push(token);
      },
      None => collect_tokens(child, tokens, sites),
    }
  }
}

fn is_placeholder_markup(html: &str) -> bool {
  html.starts_with(&format!("<div {ATTR_PLAYGROUND}="))
}

/// Drop the `<pre ...>` wrapper some backends put around highlighted code.
fn strip_pre_wrapper(html: &str) -> &str {
  let trimmed = html.trim();
  if let Some(rest) = trimmed.strip_prefix("<pre")
    && let Some(start) = rest.find('>')
    && let Some(inner) = rest[start + 1..].strip_suffix("</pre>")
  {
    return inner.strip_prefix('\n').unwrap_or(inner);
  }
  html
}

#[cfg(test)]
mod tests {
  use super::*;

  fn plain_options() -> MarkdownOptions {
    MarkdownOptions {
      highlight_code: false,
      ..MarkdownOptions::default()
    }
  }

  #[test]
  fn test_collect_tokens_pairs_links() {
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(
      &arena,
      "[a](x) and [b](y)\n\n```js\n1\n```\n",
      &options,
    );
    let mut tokens = Vec::new();
    let mut sites = Vec::new();
    collect_tokens(root, &mut tokens, &mut sites);

    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![
      TokenKind::LinkOpen,
      TokenKind::LinkClose,
      TokenKind::LinkOpen,
      TokenKind::LinkClose,
      TokenKind::Fence,
    ]);
    assert_eq!(tokens[1].opener, Some(0));
    assert_eq!(tokens[3].opener, Some(2));
    assert_eq!(tokens[4].content, "1\n");
    assert_eq!(sites.len(), 3);
  }

  #[test]
  fn test_indented_code_is_not_a_fence() {
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(&arena, "    indented\n", &options);
    let mut tokens = Vec::new();
    let mut sites = Vec::new();
    collect_tokens(root, &mut tokens, &mut sites);
    assert!(tokens.is_empty());
  }

  #[test]
  fn test_empty_markdown_renders_empty() {
    let processor = MarkdownProcessor::new(plain_options());
    assert_eq!(processor.render(""), MarkdownResult::default());
  }

  #[test]
  fn test_no_rules_renders_plain_commonmark() {
    let processor =
      MarkdownProcessor::with_rules(plain_options(), RuleSet::new());
    let result = processor.render("[v](a.mp4?type=video)");
    assert!(result.html.contains(r#"<a href="a.mp4?type=video">v</a>"#));
  }

  #[test]
  fn test_strip_pre_wrapper() {
    assert_eq!(
      strip_pre_wrapper("<pre style=\"x\">\n<span>a</span></pre>\n"),
      "<span>a</span>"
    );
    assert_eq!(strip_pre_wrapper("a &lt; b"), "a &lt; b");
  }

  #[test]
  fn test_custom_fence_rule_overrides_default() {
    struct Upper;
    impl RenderRule for Upper {
      fn render(
        &self,
        tokens: &[Token],
        idx: usize,
        _env: &RenderEnv<'_>,
      ) -> Option<String> {
        Some(format!("<p>{}</p>", tokens[idx].content.trim().to_uppercase()))
      }
    }

    let processor = MarkdownProcessor::new(plain_options())
      .with_rule(TokenKind::Fence, Arc::new(Upper));
    let result = processor.render("```\nshout\n```\n");
    assert_eq!(result.html, "<p>SHOUT</p>\n");
    assert_eq!(result.placeholders, 0);
  }
}
