//! Video link rewriting.
//!
//! A link whose URL contains the video marker renders as a `<video>` element
//! instead of an anchor:
//!
//! ```markdown
//! [demo](movie.mp4?type=video)
//! ```
//!
//! becomes `<video class="centered-video" src="movie.mp4" controls>demo</video>`.

use log::trace;

use super::{RenderEnv, RenderRule, Token, TokenKind};

/// Marker that turns a link into a video.
pub const DEFAULT_VIDEO_MARKER: &str = "?type=video";
/// Class set on rewritten video elements.
pub const DEFAULT_VIDEO_CLASS: &str = "centered-video";

/// Link open/close rule pair for video links.
///
/// One instance is registered under both [`TokenKind::LinkOpen`] and
/// [`TokenKind::LinkClose`]. The close branch decides by looking at the open
/// token it is paired with, so the two sides always agree.
#[derive(Debug, Clone)]
pub struct VideoLinkRule {
  marker: String,
  class:  String,
}

impl VideoLinkRule {
  #[must_use]
  pub fn new(marker: impl Into<String>, class: impl Into<String>) -> Self {
    Self {
      marker: marker.into(),
      class:  class.into(),
    }
  }

  #[must_use]
  pub fn marker(&self) -> &str {
    &self.marker
  }

  #[must_use]
  pub fn class(&self) -> &str {
    &self.class
  }

  /// Whether a link open token points at a video.
  #[must_use]
  pub fn is_video(&self, token: &Token) -> bool {
    !self.marker.is_empty()
      && token.kind == TokenKind::LinkOpen
      && token
        .attr("href")
        .is_some_and(|href| href.contains(self.marker.as_str()))
  }

  /// The link target with the first occurrence of the marker removed.
  #[must_use]
  pub fn video_source(&self, href: &str) -> String {
    href.replacen(self.marker.as_str(), "", 1)
  }

  fn open_tag(&self, token: &Token) -> String {
    let src = self.video_source(token.attr("href").unwrap_or_default());
    trace!("Rewriting video link to {src}");
    format!(
      r#"<video class="{}" src="{}" controls>"#,
      html_escape::encode_double_quoted_attribute(&self.class),
      html_escape::encode_double_quoted_attribute(&src),
    )
  }
}

impl Default for VideoLinkRule {
  fn default() -> Self {
    Self::new(DEFAULT_VIDEO_MARKER, DEFAULT_VIDEO_CLASS)
  }
}

impl RenderRule for VideoLinkRule {
  fn render(
    &self,
    tokens: &[Token],
    idx: usize,
    _env: &RenderEnv<'_>,
  ) -> Option<String> {
    let token = tokens.get(idx)?;
    match token.kind {
      TokenKind::LinkOpen if self.is_video(token) => Some(self.open_tag(token)),
      TokenKind::LinkClose => {
        let opener = tokens.get(token.opener?)?;
        self.is_video(opener).then(|| "</video>".to_string())
      },
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::templates::TemplateSet;

  fn render_all(tokens: &[Token]) -> Vec<Option<String>> {
    let templates = TemplateSet::new();
    let env = RenderEnv {
      playgrounds: false,
      templates:   &templates,
    };
    let rule = VideoLinkRule::default();
    (0..tokens.len())
      .map(|idx| rule.render(tokens, idx, &env))
      .collect()
  }

  #[test]
  fn test_video_link_pair() {
    let tokens = vec![
      Token::link_open("movie.mp4?type=video", ""),
      Token::link_close(0),
    ];
    assert_eq!(render_all(&tokens), vec![
      Some(r#"<video class="centered-video" src="movie.mp4" controls>"#.to_string()),
      Some("</video>".to_string()),
    ]);
  }

  #[test]
  fn test_plain_link_uses_default() {
    let tokens = vec![Token::link_open("https://example.com", ""), Token::link_close(0)];
    assert_eq!(render_all(&tokens), vec![None, None]);
  }

  #[test]
  fn test_adjacent_links_pair_independently() {
    let tokens = vec![
      Token::link_open("a.mp4?type=video", ""),
      Token::link_close(0),
      Token::link_open("https://example.com", ""),
      Token::link_close(2),
      Token::link_open("b.webm?type=video", ""),
      Token::link_close(4),
    ];
    let rendered = render_all(&tokens);
    assert!(rendered[0].as_deref().is_some_and(|s| s.contains(r#"src="a.mp4""#)));
    assert_eq!(rendered[1].as_deref(), Some("</video>"));
    assert_eq!(rendered[2], None);
    assert_eq!(rendered[3], None);
    assert!(rendered[4].as_deref().is_some_and(|s| s.contains(r#"src="b.webm""#)));
    assert_eq!(rendered[5].as_deref(), Some("</video>"));
  }

  #[test]
  fn test_only_first_marker_removed() {
    let rule = VideoLinkRule::default();
    assert_eq!(
      rule.video_source("a?type=video&b?type=video"),
      "a&b?type=video"
    );
  }

  #[test]
  fn test_close_without_opener_is_default() {
    let mut close = Token::link_close(0);
    close.opener = None;
    assert_eq!(render_all(&[close]), vec![None]);
  }

  #[test]
  fn test_custom_marker_and_class() {
    let rule = VideoLinkRule::new("#video", "clip");
    let token = Token::link_open("clip.mp4#video", "");
    assert!(rule.is_video(&token));
    assert!(!rule.is_video(&Token::link_open("clip.mp4?type=video", "")));
    assert_eq!(
      rule.open_tag(&token),
      r#"<video class="clip" src="clip.mp4" controls>"#
    );
  }
}
