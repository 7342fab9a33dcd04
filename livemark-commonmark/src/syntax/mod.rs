//! Syntax highlighting for fenced code blocks.
//!
//! Highlighting goes through the [`SyntaxHighlighter`] trait so the backend
//! can be swapped. The bundled backend is **Syntect** (Sublime Text syntax
//! definitions, extended by two-face) behind the `syntect` feature.

pub mod error;
pub mod types;

pub use error::{SyntaxError, SyntaxResult};
pub use types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager};

#[cfg(feature = "syntect")] mod syntect;
#[cfg(feature = "syntect")] pub use syntect::*;

/// Create the default syntax manager based on available features.
///
/// # Errors
///
/// Returns [`SyntaxError::NoBackendAvailable`] when the crate was built
/// without a highlighting backend.
pub fn create_default_manager() -> SyntaxResult<SyntaxManager> {
  create_manager_with_theme(None)
}

/// Create the default syntax manager with a preferred theme.
///
/// # Errors
///
/// Returns [`SyntaxError::NoBackendAvailable`] when the crate was built
/// without a highlighting backend.
pub fn create_manager_with_theme(
  theme: Option<String>,
) -> SyntaxResult<SyntaxManager> {
  #[cfg(feature = "syntect")]
  {
    create_syntect_manager(theme)
  }

  #[cfg(not(feature = "syntect"))]
  {
    let _ = theme;
    Err(SyntaxError::NoBackendAvailable)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_syntax_config_default() {
    let config = SyntaxConfig::default();
    assert!(config.fallback_to_plain);
    assert_eq!(config.language_aliases["js"], "javascript");
    assert_eq!(config.language_aliases["svelte"], "html");
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_highlights_known_language() {
    let manager = create_default_manager().expect("syntect backend");
    assert_eq!(manager.highlighter().name(), "Syntect");

    let html = manager.highlight_or_escape("fn main() {}", "rust", None);
    assert!(html.contains("<span"));
    assert!(html.contains("main"));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_unknown_language_is_plain_text() {
    let manager = create_default_manager().expect("syntect backend");
    let html = manager.highlight_or_escape("<b>", "no-such-language", None);
    assert!(!html.contains("<b>"));
    assert!(html.contains("&lt;b&gt;"));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_theme_fallback() {
    let manager =
      create_manager_with_theme(Some("NotARealTheme".to_string()))
        .expect("syntect backend");
    // Unknown theme still produces output through the fallback theme
    let html = manager.highlight_or_escape("let x = 1;", "js", None);
    assert!(html.contains("<pre"));
  }

  #[cfg(not(feature = "syntect"))]
  #[test]
  fn test_no_backend() {
    assert!(matches!(
      create_default_manager(),
      Err(SyntaxError::NoBackendAvailable)
    ));
  }
}
