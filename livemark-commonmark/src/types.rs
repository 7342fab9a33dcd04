//! Types for livemark-commonmark public API and internal use.
use kuchikikiki::Attributes;
use serde::{Deserialize, Serialize};

/// Attribute marking an element as a playground placeholder.
pub const ATTR_PLAYGROUND: &str = "data-playground";
/// Attribute carrying the verbatim fenced code.
pub const ATTR_CODE: &str = "data-code";
/// Attribute carrying the playground template name.
pub const ATTR_TEMPLATE: &str = "data-template";
/// Attribute carrying `"true"` or `"false"`.
pub const ATTR_AUTORUN: &str = "data-autorun";

/// CSS selector matching every playground placeholder.
pub const PLACEHOLDER_SELECTOR: &str = "[data-playground]";

/// Result of Markdown processing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MarkdownResult {
  /// Rendered HTML output.
  pub html: String,

  /// Number of playground placeholders emitted into `html`.
  pub placeholders: usize,
}

/// Data carried by a playground placeholder element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlaceholderRecord {
  /// Fenced block body, verbatim, including its trailing newline.
  pub code:     String,
  /// Template name, always a member of the known template set when emitted.
  pub template: String,
  /// Run the playground on load.
  pub autorun:  bool,
}

impl PlaceholderRecord {
  /// Render the inert placeholder element.
  ///
  /// Attribute values are escaped for a double-quoted attribute context.
  #[must_use]
  pub fn to_html(&self) -> String {
    format!(
      r#"<div {ATTR_PLAYGROUND}="true" {ATTR_CODE}="{}" {ATTR_TEMPLATE}="{}" {ATTR_AUTORUN}="{}"></div>"#,
      html_escape::encode_double_quoted_attribute(&self.code),
      html_escape::encode_double_quoted_attribute(&self.template),
      self.autorun,
    )
  }

  /// Read a record back from a placeholder element's attributes.
  ///
  /// Returns `None` when the element has no `data-template`. A missing
  /// `data-code` reads as empty code.
  #[must_use]
  pub fn from_attributes(attributes: &Attributes) -> Option<Self> {
    let template = attributes.get(ATTR_TEMPLATE)?.to_string();
    Some(Self {
      code: attributes.get(ATTR_CODE).unwrap_or_default().to_string(),
      template,
      autorun: attributes.get(ATTR_AUTORUN) != Some("false"),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::utils::parse_fragment;

  #[test]
  fn test_placeholder_html_escapes_code() {
    let record = PlaceholderRecord {
      code:     "<b title=\"x\">&</b>\n".to_string(),
      template: "react".to_string(),
      autorun:  false,
    };
    let html = record.to_html();
    assert!(html.starts_with(r#"<div data-playground="true" data-code=""#));
    assert!(html.contains("&quot;x&quot;"));
    assert!(html.contains("&amp;"));
    assert!(html.contains(r#"data-autorun="false""#));
    assert!(html.ends_with("></div>"));
  }

  #[test]
  fn test_placeholder_reads_back_from_dom() {
    let record = PlaceholderRecord {
      code:     "const a = \"<x>\";\nconsole.log(a & 1);\n".to_string(),
      template: "vanilla".to_string(),
      autorun:  true,
    };
    let document = parse_fragment(&record.to_html());
    let node = document
      .select_first(PLACEHOLDER_SELECTOR)
      .expect("placeholder element");
    let attributes = node.attributes.borrow();
    assert_eq!(PlaceholderRecord::from_attributes(&attributes), Some(record));
  }

  #[test]
  fn test_missing_template_reads_as_none() {
    let document = parse_fragment(r#"<div data-playground="true"></div>"#);
    let node = document
      .select_first(PLACEHOLDER_SELECTOR)
      .expect("placeholder element");
    assert_eq!(PlaceholderRecord::from_attributes(&node.attributes.borrow()), None);
  }
}
