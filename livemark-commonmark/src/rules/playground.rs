//! Playground placeholder emission for fenced code blocks.

use log::debug;

use super::{RenderEnv, RenderRule, Token, TokenKind};
use crate::{directive::DirectiveAttributes, types::PlaceholderRecord};

/// Fence rule that replaces known-template code blocks with an inert
/// placeholder element for the widget mount side to pick up.
///
/// The template attribute must be a member of the render's template set;
/// everything else keeps the default code block rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaygroundFenceRule;

impl PlaygroundFenceRule {
  /// Build the placeholder record for a fence token, if it qualifies.
  #[must_use]
  pub fn placeholder(
    token: &Token,
    env: &RenderEnv<'_>,
  ) -> Option<PlaceholderRecord> {
    if !env.playgrounds || token.kind != TokenKind::Fence {
      return None;
    }

    let attrs = DirectiveAttributes::parse(&token.info);
    let template = attrs.template()?;
    if !env.templates.contains(template) {
      debug!("Unknown playground template '{template}', keeping code block");
      return None;
    }

    Some(PlaceholderRecord {
      code:     token.content.clone(),
      template: template.to_string(),
      autorun:  attrs.autorun(),
    })
  }
}

impl RenderRule for PlaygroundFenceRule {
  fn render(
    &self,
    tokens: &[Token],
    idx: usize,
    env: &RenderEnv<'_>,
  ) -> Option<String> {
    Self::placeholder(tokens.get(idx)?, env).map(|record| record.to_html())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::templates::TemplateSet;

  #[test]
  fn test_known_template_emits_placeholder() {
    let templates = TemplateSet::sandpack();
    let env = RenderEnv {
      playgrounds: true,
      templates:   &templates,
    };
    let tokens = vec![Token::fence(
      r#"jsx template="react-ts" autorun="false""#,
      "export default () => <p/>;\n",
    )];
    let record = PlaygroundFenceRule::placeholder(&tokens[0], &env)
      .expect("placeholder");
    assert_eq!(record.template, "react-ts");
    assert!(!record.autorun);
    assert_eq!(record.code, "export default () => <p/>;\n");

    let html = PlaygroundFenceRule.render(&tokens, 0, &env).expect("html");
    assert!(html.contains(r#"data-template="react-ts""#));
  }

  #[test]
  fn test_disabled_playgrounds_fall_back() {
    let templates = TemplateSet::sandpack();
    let env = RenderEnv {
      playgrounds: false,
      templates:   &templates,
    };
    let tokens = vec![Token::fence(r#"js template="vanilla""#, "1\n")];
    assert_eq!(PlaygroundFenceRule.render(&tokens, 0, &env), None);
  }

  #[test]
  fn test_unknown_or_missing_template_falls_back() {
    let templates = TemplateSet::sandpack();
    let env = RenderEnv {
      playgrounds: true,
      templates:   &templates,
    };
    let tokens = vec![
      Token::fence(r#"js template="nope""#, "1\n"),
      Token::fence("js", "1\n"),
      Token::fence("", "1\n"),
    ];
    for idx in 0..tokens.len() {
      assert_eq!(PlaygroundFenceRule.render(&tokens, idx, &env), None);
    }
  }

  #[test]
  fn test_autorun_defaults_to_true() {
    let templates = TemplateSet::sandpack();
    let env = RenderEnv {
      playgrounds: true,
      templates:   &templates,
    };
    let token = Token::fence(r#"vue template="vue""#, "<template/>\n");
    assert!(
      PlaygroundFenceRule::placeholder(&token, &env)
        .expect("placeholder")
        .autorun
    );
  }
}
