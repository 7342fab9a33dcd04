//! Fenced code block info string parsing.
//!
//! An info string such as `jsx template="react" autorun="false"` carries a
//! positional language tag followed by any number of `key="value"` pairs.
//! Parsing never fails: fragments that do not look like a pair are ignored.

use std::{collections::BTreeMap, sync::LazyLock};

use log::error;
use regex::Regex;

use crate::utils::never_matching_regex;

/// Matches `key="value"` pairs. Keys are ASCII word characters, values may
/// contain anything except a double quote.
static ATTRIBUTE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?P<key>[A-Za-z0-9_]+)="(?P<value>[^"]*)""#).unwrap_or_else(
    |e| {
      error!("Failed to compile ATTRIBUTE_PAIR regex: {e}");
      never_matching_regex()
    },
  )
});

/// Attributes parsed from a fenced code block's info string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveAttributes {
  explicit: BTreeMap<String, String>,
  lang:     Option<String>,
}

impl DirectiveAttributes {
  /// Parse an info string.
  ///
  /// Later duplicates of a key overwrite earlier ones. The positional
  /// language tag is everything up to the first whitespace character and is
  /// only recorded when non-empty.
  #[must_use]
  pub fn parse(info: &str) -> Self {
    let explicit = ATTRIBUTE_PAIR
      .captures_iter(info)
      .map(|caps| (caps["key"].to_string(), caps["value"].to_string()))
      .collect();

    let lang = info
      .split(char::is_whitespace)
      .next()
      .filter(|tag| !tag.is_empty())
      .map(str::to_string);

    Self { explicit, lang }
  }

  /// Look up an attribute.
  ///
  /// `lang` resolves to the positional tag when there is one; an explicit
  /// `lang="..."` pair is only visible without a positional tag.
  #[must_use]
  pub fn get(&self, key: &str) -> Option<&str> {
    if key == "lang"
      && let Some(lang) = &self.lang
    {
      return Some(lang);
    }
    self.explicit.get(key).map(String::as_str)
  }

  /// The positional language tag.
  #[must_use]
  pub fn lang(&self) -> Option<&str> {
    self.get("lang")
  }

  /// The `template` attribute.
  #[must_use]
  pub fn template(&self) -> Option<&str> {
    self.get("template")
  }

  /// Whether the playground should run on load.
  ///
  /// Only the literal value `"false"` disables autorun.
  #[must_use]
  pub fn autorun(&self) -> bool {
    self.get("autorun") != Some("false")
  }

  /// Whether the info string had no pairs and no positional tag.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.explicit.is_empty() && self.lang.is_none()
  }

  /// Iterate over the explicit `key="value"` pairs, sorted by key.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .explicit
      .iter()
      .map(|(key, value)| (key.as_str(), value.as_str()))
  }

  /// Serialize the explicit pairs back to `key="value"` form.
  ///
  /// Re-parsing the result reproduces the explicit pairs.
  #[must_use]
  pub fn to_attribute_string(&self) -> String {
    self
      .iter()
      .map(|(key, value)| format!("{key}=\"{value}\""))
      .collect::<Vec<_>>()
      .join(" ")
  }
}
