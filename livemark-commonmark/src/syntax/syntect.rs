//! Syntect-based syntax highlighting backend enhanced with two-face.
//!
//! Syntect uses Sublime Text's syntax definitions (TextMate grammars). The
//! two-face crate adds the grammars playground snippets are usually written
//! in (JSX, TSX, Vue, Svelte) on top of the syntect defaults.

use std::sync::OnceLock;

use syntect::{
  highlighting::Theme,
  html::highlighted_html_for_string,
  parsing::SyntaxSet,
};
use two_face::{
  re_exports::syntect::highlighting::ThemeSet,
  theme::{EmbeddedLazyThemeSet, EmbeddedThemeName},
};

use super::{
  error::{SyntaxError, SyntaxResult},
  types::{SyntaxConfig, SyntaxHighlighter, SyntaxManager},
};

const FALLBACK_THEME: &str = "InspiredGitHub";

/// Names of the extra themes shipped by two-face that we expose.
const EMBEDDED_THEMES: &[(&str, EmbeddedThemeName)] = &[
  ("Dracula", EmbeddedThemeName::Dracula),
  ("Github", EmbeddedThemeName::Github),
  ("GruvboxDark", EmbeddedThemeName::GruvboxDark),
  ("GruvboxLight", EmbeddedThemeName::GruvboxLight),
  ("MonokaiExtended", EmbeddedThemeName::MonokaiExtended),
  ("MonokaiExtendedLight", EmbeddedThemeName::MonokaiExtendedLight),
  ("Nord", EmbeddedThemeName::Nord),
  ("OneHalfDark", EmbeddedThemeName::OneHalfDark),
  ("OneHalfLight", EmbeddedThemeName::OneHalfLight),
  ("SolarizedDark", EmbeddedThemeName::SolarizedDark),
  ("SolarizedLight", EmbeddedThemeName::SolarizedLight),
  ("TwoDark", EmbeddedThemeName::TwoDark),
];

/// Syntect-based syntax highlighter
pub struct SyntectHighlighter {
  theme_name: String,
}

impl SyntectHighlighter {
  /// Create a new Syntect highlighter with the specified theme.
  #[must_use]
  pub fn new(theme_name: Option<String>) -> Self {
    Self {
      theme_name: theme_name.unwrap_or_else(|| FALLBACK_THEME.to_string()),
    }
  }

  fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(two_face::syntax::extra_newlines)
  }

  fn theme_set() -> &'static EmbeddedLazyThemeSet {
    static THEME_SET: OnceLock<EmbeddedLazyThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(two_face::theme::extra)
  }

  fn default_theme_set() -> &'static ThemeSet {
    static DEFAULT_THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    DEFAULT_THEME_SET.get_or_init(ThemeSet::load_defaults)
  }

  /// Get the theme by name, falling back to `InspiredGitHub`.
  fn get_theme(&self, theme_name: Option<&str>) -> &'static Theme {
    let name = match theme_name {
      Some(name) if !name.is_empty() => name,
      _ if !self.theme_name.is_empty() => self.theme_name.as_str(),
      _ => FALLBACK_THEME,
    };

    let default_theme_set = Self::default_theme_set();
    if let Some(theme) = default_theme_set.themes.get(name) {
      return theme;
    }

    if let Some((_, embedded)) = EMBEDDED_THEMES
      .iter()
      .find(|(embedded_name, _)| embedded_name.eq_ignore_ascii_case(name))
    {
      return Self::theme_set().get(*embedded);
    }

    default_theme_set
      .themes
      .get(FALLBACK_THEME)
      .unwrap_or_else(|| Self::theme_set().get(EmbeddedThemeName::InspiredGithub))
  }
}

impl Default for SyntectHighlighter {
  fn default() -> Self {
    Self::new(None)
  }
}

impl SyntaxHighlighter for SyntectHighlighter {
  fn name(&self) -> &'static str {
    "Syntect"
  }

  fn supported_languages(&self) -> Vec<String> {
    Self::syntax_set()
      .syntaxes()
      .iter()
      .flat_map(|syntax| {
        std::iter::once(syntax.name.to_lowercase())
          .chain(syntax.file_extensions.iter().map(|ext| ext.to_lowercase()))
      })
      .collect()
  }

  fn available_themes(&self) -> Vec<String> {
    let mut themes: Vec<String> =
      Self::default_theme_set().themes.keys().cloned().collect();
    themes.extend(EMBEDDED_THEMES.iter().map(|(name, _)| (*name).to_string()));
    themes.sort();
    themes.dedup();
    themes
  }

  fn highlight(
    &self,
    code: &str,
    language: &str,
    theme: Option<&str>,
  ) -> SyntaxResult<String> {
    let syntax_set = Self::syntax_set();
    let syntax = syntax_set
      .find_syntax_by_token(language)
      .unwrap_or_else(|| syntax_set.find_syntax_plain_text());

    highlighted_html_for_string(code, syntax_set, syntax, self.get_theme(theme))
      .map_err(|e| SyntaxError::HighlightingFailed(e.to_string()))
  }
}

/// Create a Syntect-based syntax manager.
///
/// # Errors
///
/// Currently infallible; the signature matches the other backend
/// constructors.
pub fn create_syntect_manager(
  theme: Option<String>,
) -> SyntaxResult<SyntaxManager> {
  let highlighter = std::sync::Arc::new(SyntectHighlighter::new(theme.clone()));
  let config = SyntaxConfig {
    default_theme: Some(theme.unwrap_or_else(|| FALLBACK_THEME.to_string())),
    ..SyntaxConfig::default()
  };
  Ok(SyntaxManager::new(highlighter, config))
}
