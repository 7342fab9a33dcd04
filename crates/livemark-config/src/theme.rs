//! Color theme shared by every mounted widget.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Light or dark presentation.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  #[default]
  Light,
  Dark,
}

impl Theme {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Light => "light",
      Self::Dark => "dark",
    }
  }

  /// The other theme.
  #[must_use]
  pub const fn toggled(self) -> Self {
    match self {
      Self::Light => Self::Dark,
      Self::Dark => Self::Light,
    }
  }
}

impl fmt::Display for Theme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Theme {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "light" => Ok(Self::Light),
      "dark" => Ok(Self::Dark),
      _ => {
        Err(ConfigError::Config(format!(
          "Invalid theme: '{s}'. Expected light or dark"
        )))
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_and_display() {
    assert_eq!("dark".parse::<Theme>().ok(), Some(Theme::Dark));
    assert_eq!(" Light ".parse::<Theme>().ok(), Some(Theme::Light));
    assert!("sepia".parse::<Theme>().is_err());
    assert_eq!(Theme::Dark.to_string(), "dark");
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
  }

  #[test]
  fn test_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Theme::Dark).ok().as_deref(), Some("\"dark\""));
    let theme: Theme = serde_json::from_str("\"light\"").expect("theme");
    assert_eq!(theme, Theme::Light);
  }
}
