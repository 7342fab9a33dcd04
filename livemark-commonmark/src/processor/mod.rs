//! Markdown processing module.
//!
//! - [`core`]: Main processor implementation and rendering pipeline
//! - [`process`]: High-level processing functions with error recovery
//! - [`types`]: Configuration, the processor struct and AST transformers
pub mod core;
pub mod process;
pub mod types;

pub use self::core::default_rules;

pub use process::{
  ProcessorPreset,
  create_processor,
  process_markdown_file,
  process_safe,
  process_with_recovery,
};
pub use types::{
  AstTransformer,
  MarkdownOptions,
  MarkdownOptionsBuilder,
  MarkdownProcessor,
  PlaygroundAttributeFilter,
  RawHtmlTransformer,
};

#[cfg(test)]
mod tests {
  use super::{
    MarkdownOptions,
    MarkdownOptionsBuilder,
    MarkdownProcessor,
    PlaygroundAttributeFilter,
  };

  fn processor(raw_html: bool) -> MarkdownProcessor {
    MarkdownProcessor::new(
      MarkdownOptionsBuilder::new()
        .highlight_code(false)
        .raw_html(raw_html)
        .build(),
    )
  }

  #[test]
  fn test_raw_html_is_escaped_by_default() {
    let result = processor(false).render("<script>alert(1)</script>\n\nhi <b>x</b>");
    assert!(!result.html.contains("<script>"));
    assert!(result.html.contains("&lt;script&gt;"));
    assert!(result.html.contains("&lt;b&gt;x&lt;/b&gt;"));
  }

  #[test]
  fn test_raw_html_passes_through_when_enabled() {
    let result = processor(true).render("hi <b>x</b>");
    assert!(result.html.contains("<b>x</b>"));
  }

  #[test]
  fn test_raw_html_cannot_forge_placeholders() {
    let processor = MarkdownProcessor::new(
      MarkdownOptionsBuilder::new()
        .highlight_code(false)
        .raw_html(true)
        .build(),
    );
    let markdown = "<div data-playground=\"true\" data-template=\"react\" \
                    data-code=\"x\"></div>\n\nand <span \
                    DATA-PLAYGROUND-ID=\"pg-1-0\">inline</span>\n\n```jsx \
                    template=\"react\"\nnull\n```\n";
    let result = processor.render_with(markdown, true);

    assert_eq!(result.placeholders, 1);
    assert_eq!(result.html.matches("data-playground").count(), 1);
    assert!(result.html.contains(r#"<div data-template="react" data-code="x"></div>"#));
    assert!(result.html.contains("<span>inline</span>"));
  }

  #[test]
  fn test_attribute_filter_reads_whole_attributes() {
    assert_eq!(
      PlaygroundAttributeFilter::filter(
        r#"<div title="a > data-playground=1" data-playground>x</div>"#
      ),
      r#"<div title="a > data-playground=1">x</div>"#
    );
    assert_eq!(
      PlaygroundAttributeFilter::filter("<div/data-playground=true class=a>"),
      "<div class=a>"
    );
    assert_eq!(
      PlaygroundAttributeFilter::filter("<p class=don't data-playground>"),
      "<p class=don't>"
    );
    assert_eq!(
      PlaygroundAttributeFilter::filter("data-playground outside a tag"),
      "data-playground outside a tag"
    );
  }

  #[test]
  fn test_builder_sets_fields() {
    let options = MarkdownOptionsBuilder::new()
      .gfm(false)
      .playgrounds(true)
      .video_marker("#v")
      .video_class("clip")
      .highlight_theme(Some("Nord"))
      .build();
    assert!(!options.gfm);
    assert!(options.playgrounds);
    assert_eq!(options.video_marker, "#v");
    assert_eq!(options.video_class, "clip");
    assert_eq!(options.highlight_theme.as_deref(), Some("Nord"));
  }

  #[test]
  fn test_gfm_extensions() {
    let options = MarkdownOptions {
      highlight_code: false,
      ..MarkdownOptions::default()
    };
    let result = MarkdownProcessor::new(options).render("~~gone~~\n\n- [x] done\n");
    assert!(result.html.contains("<del>gone</del>"));
    assert!(result.html.contains("checkbox"));
  }
}
