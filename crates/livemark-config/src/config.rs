use std::{
  fs,
  path::{Path, PathBuf},
};

use livemark_commonmark::{
  MarkdownOptions,
  TemplateSet,
  rules::video::{DEFAULT_VIDEO_CLASS, DEFAULT_VIDEO_MARKER},
};
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, theme::Theme};

/// File names searched for in the working directory, in order.
const CONFIG_FILENAMES: &[&str] = &[
  "livemark.toml",
  "livemark.json",
  ".livemark.toml",
  ".livemark.json",
];

/// Configuration for livemark.
///
/// [`Config`] controls markdown rendering, playground placeholders, video
/// links and the initial widget theme. Fields are typically loaded from a TOML
/// or JSON config file and can be overridden with `KEY=VALUE` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Theme handed to widgets on first render.
  pub theme: Theme,

  /// Markdown rendering options.
  pub markdown: MarkdownConfig,

  /// Playground placeholder options.
  pub playground: PlaygroundConfig,

  /// Video link options.
  pub video: VideoConfig,
}

/// Markdown rendering options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
  /// Enable GitHub Flavored Markdown extensions.
  pub gfm: bool,

  /// Pass raw HTML written by the author through unescaped.
  pub raw_html: bool,

  /// Enable syntax highlighting for code blocks.
  pub highlight_code: bool,

  /// Syntax highlighting theme name.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub highlight_theme: Option<String>,
}

impl Default for MarkdownConfig {
  fn default() -> Self {
    Self {
      gfm:             true,
      raw_html:        false,
      highlight_code:  true,
      highlight_theme: None,
    }
  }
}

/// Playground placeholder options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
  /// Turn known-template code blocks into playgrounds.
  pub enable: bool,

  /// Known templates. `None` means the Sandpack template names.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub templates: Option<Vec<String>>,

  /// Templates added on top of `templates`.
  pub extra_templates: Vec<String>,
}

impl Default for PlaygroundConfig {
  fn default() -> Self {
    Self {
      enable:          true,
      templates:       None,
      extra_templates: Vec::new(),
    }
  }
}

/// Video link options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
  /// URL marker that turns a link into a video. Empty disables the rewrite.
  pub marker: String,

  /// Class set on video elements.
  pub class: String,
}

impl Default for VideoConfig {
  fn default() -> Self {
    Self {
      marker: DEFAULT_VIDEO_MARKER.to_string(),
      class:  DEFAULT_VIDEO_CLASS.to_string(),
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  #[allow(
    clippy::option_if_let_else,
    reason = "Clearer with explicit match on extension"
  )]
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {}",
        path.display(),
        e
      ))
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
      Some(ext) => {
        match ext.to_lowercase().as_str() {
          "json" => {
            serde_json::from_str(&content).map_err(|e| {
              ConfigError::Config(format!(
                "Failed to parse JSON config from {}: {}",
                path.display(),
                e
              ))
            })
          },
          "toml" => {
            toml::from_str(&content).map_err(|e| {
              ConfigError::Config(format!(
                "Failed to parse TOML config from {}: {}",
                path.display(),
                e
              ))
            })
          },
          _ => {
            Err(ConfigError::Config(format!(
              "Unsupported config file format: {}",
              path.display()
            )))
          },
        }
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from files and `KEY=VALUE` overrides.
  ///
  /// Explicit files are merged in order. Without explicit files a config
  /// discovered in the working directory is used, falling back to the
  /// defaults.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded or an override is invalid.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first)?;
      for config_path in rest {
        merged_config.merge(Self::from_file(config_path)?);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config)?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust
  /// use livemark_config::Config;
  ///
  /// let mut config = Config::default();
  /// config
  ///   .apply_overrides(&[
  ///     "markdown.gfm=false".to_string(),
  ///     "playground.templates=react,vue".to_string(),
  ///   ])
  ///   .expect("valid overrides");
  /// assert!(!config.markdown.gfm);
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a single override.
  ///
  /// # Errors
  ///
  /// Returns an error if the key is unknown or the value does not parse.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "theme" => self.theme = value.parse()?,
      "markdown.gfm" => self.markdown.gfm = parse_bool(key, value)?,
      "markdown.raw_html" => self.markdown.raw_html = parse_bool(key, value)?,
      "markdown.highlight_code" => {
        self.markdown.highlight_code = parse_bool(key, value)?;
      },
      "markdown.highlight_theme" => {
        self.markdown.highlight_theme =
          (!value.is_empty()).then(|| value.to_string());
      },
      "playground.enable" => self.playground.enable = parse_bool(key, value)?,
      "playground.templates" => {
        self.playground.templates =
          (!value.is_empty()).then(|| parse_list(value));
      },
      "playground.extra_templates" => {
        self.playground.extra_templates.extend(parse_list(value));
      },
      "video.marker" => self.video.marker = value.to_string(),
      "video.class" => self.video.class = value.to_string(),
      _ => {
        return Err(ConfigError::Config(format!(
          "Unknown configuration key: '{key}'. See documentation for \
           supported keys."
        )));
      },
    }
    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - [`Vec<T>`] fields: Other's vec is appended to this config's vec
  /// - Plain fields (String, bool, etc.): Other's value always replaces
  pub fn merge(&mut self, other: Self) {
    self.theme = other.theme;

    self.markdown.gfm = other.markdown.gfm;
    self.markdown.raw_html = other.markdown.raw_html;
    self.markdown.highlight_code = other.markdown.highlight_code;
    if other.markdown.highlight_theme.is_some() {
      self.markdown.highlight_theme = other.markdown.highlight_theme;
    }

    self.playground.enable = other.playground.enable;
    if other.playground.templates.is_some() {
      self.playground.templates = other.playground.templates;
    }
    self
      .playground
      .extra_templates
      .extend(other.playground.extra_templates);

    self.video = other.video;
  }

  /// The known playground templates.
  #[must_use]
  pub fn templates(&self) -> TemplateSet {
    let mut templates = self.playground.templates.as_ref().map_or_else(
      TemplateSet::sandpack,
      |names| names.iter().cloned().collect(),
    );
    templates.extend(self.playground.extra_templates.iter().cloned());
    templates
  }

  /// Markdown processor options for this configuration.
  #[must_use]
  pub fn markdown_options(&self) -> MarkdownOptions {
    MarkdownOptions {
      gfm:             self.markdown.gfm,
      raw_html:        self.markdown.raw_html,
      highlight_code:  self.markdown.highlight_code,
      highlight_theme: self.markdown.highlight_theme.clone(),
      playgrounds:     self.playground.enable,
      templates:       self.templates(),
      video_marker:    self.video.marker.clone(),
      video_class:     self.video.class.clone(),
    }
  }

  /// Search for a config file in the current directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    Self::find_config_file_in(&current_dir)
  }

  /// Search for a config file in `dir`.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }

  /// Generate a default configuration file in `format` (`toml` or `json`).
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unknown, serialization fails, or the
  /// file cannot be written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config = Self::default();
    let config_content = match format.to_lowercase().as_str() {
      "toml" => {
        format!(
          "# livemark configuration\n#\n# Keys can be overridden on the \
           command line with --config KEY=VALUE.\n\n{}",
          toml::to_string_pretty(&config)?
        )
      },
      "json" => serde_json::to_string_pretty(&config)? + "\n",
      other => {
        return Err(ConfigError::Config(format!(
          "Unsupported config format: '{other}'. Expected toml or json"
        )));
      },
    };

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {}",
        path.display(),
        e
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}

fn parse_list(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(str::trim)
    .filter(|item| !item.is_empty())
    .map(str::to_string)
    .collect()
}
