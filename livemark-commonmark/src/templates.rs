//! The set of playground templates a widget factory knows how to mount.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Template names understood by the Sandpack playground.
pub const SANDPACK_TEMPLATES: &[&str] = &[
  "static",
  "angular",
  "react",
  "react-ts",
  "solid",
  "svelte",
  "test-ts",
  "vanilla-ts",
  "vanilla",
  "vue",
  "vue-ts",
  "node",
  "nextjs",
  "vite",
  "vite-react",
  "vite-react-ts",
  "vite-preact",
  "vite-preact-ts",
  "vite-vue",
  "vite-vue-ts",
  "vite-svelte",
  "vite-svelte-ts",
  "astro",
];

/// Known playground template names.
///
/// Membership is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateSet(BTreeSet<String>);

impl TemplateSet {
  /// An empty set; no fenced block becomes a playground.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// The Sandpack template names.
  #[must_use]
  pub fn sandpack() -> Self {
    SANDPACK_TEMPLATES.iter().copied().collect()
  }

  #[must_use]
  pub fn contains(&self, template: &str) -> bool {
    self.0.contains(template)
  }

  /// Add a template, returning whether it was new.
  pub fn insert(&mut self, template: impl Into<String>) -> bool {
    self.0.insert(template.into())
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.0.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }
}

impl<S: Into<String>> FromIterator<S> for TemplateSet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self(iter.into_iter().map(Into::into).collect())
  }
}

impl<S: Into<String>> Extend<S> for TemplateSet {
  fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
    self.0.extend(iter.into_iter().map(Into::into));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sandpack_templates() {
    let set = TemplateSet::sandpack();
    assert_eq!(set.len(), SANDPACK_TEMPLATES.len());
    assert!(set.contains("react-ts"));
    assert!(set.contains("vite-svelte-ts"));
    assert!(!set.contains("React"));
    assert!(!set.contains("jsx"));
  }

  #[test]
  fn test_collect_and_extend() {
    let mut set: TemplateSet = ["react", "vue"].into_iter().collect();
    set.extend(["vue", "custom"]);
    assert_eq!(set.iter().collect::<Vec<_>>(), vec!["custom", "react", "vue"]);
  }
}
