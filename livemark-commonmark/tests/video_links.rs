use livemark_commonmark::{MarkdownOptions, MarkdownProcessor};

fn processor() -> MarkdownProcessor {
  MarkdownProcessor::new(MarkdownOptions {
    highlight_code: false,
    ..MarkdownOptions::default()
  })
}

#[test]
fn test_video_link_becomes_video_element() {
  let result = processor().render("[demo](movie.mp4?type=video)");
  assert_eq!(
    result.html,
    "<p><video class=\"centered-video\" src=\"movie.mp4\" \
     controls>demo</video></p>\n"
  );
  assert!(!result.html.contains("?type=video"));
  assert!(!result.html.contains("<a"));
}

#[test]
fn test_plain_links_are_untouched() {
  let result = processor().render("[docs](https://example.com \"Docs\")");
  assert_eq!(
    result.html,
    "<p><a href=\"https://example.com\" title=\"Docs\">docs</a></p>\n"
  );
}

#[test]
fn test_adjacent_links_never_leave_unmatched_video_tags() {
  let md = "[a](one.mp4?type=video) [b](https://example.com) \
            [c](two.webm?type=video)\n\n[d](https://example.org)";
  let html = processor().render(md).html;

  assert_eq!(html.matches("<video").count(), 2);
  assert_eq!(html.matches("</video>").count(), 2);
  assert_eq!(html.matches("<a ").count(), 2);
  assert_eq!(html.matches("</a>").count(), 2);
  assert!(html.contains(r#"<a href="https://example.com">b</a>"#));
  assert!(html.contains(r#"<a href="https://example.org">d</a>"#));
}

#[test]
fn test_video_keeps_inline_content() {
  let html = processor()
    .render("[*intro* `clip`](intro.mp4?type=video)")
    .html;
  assert!(html.contains("<em>intro</em> <code>clip</code></video>"));
}

#[test]
fn test_only_first_marker_is_removed() {
  let html = processor().render("[x](a.mp4?type=video#?type=video)").html;
  assert!(html.contains(r#"src="a.mp4#?type=video""#));
}

#[test]
fn test_video_rewrite_disabled_with_empty_marker() {
  let processor = MarkdownProcessor::new(MarkdownOptions {
    highlight_code: false,
    video_marker: String::new(),
    ..MarkdownOptions::default()
  });
  let html = processor.render("[demo](movie.mp4?type=video)").html;
  assert!(html.contains(r#"<a href="movie.mp4?type=video">demo</a>"#));
  assert!(!html.contains("<video"));
}

#[test]
fn test_custom_class_and_marker() {
  let processor = MarkdownProcessor::new(MarkdownOptions {
    highlight_code: false,
    video_marker: "#video".to_string(),
    video_class: "clip".to_string(),
    ..MarkdownOptions::default()
  });
  let html = processor.render("[demo](movie.mp4#video)").html;
  assert!(html.contains(r#"<video class="clip" src="movie.mp4" controls>"#));
}
