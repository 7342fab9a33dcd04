//! Interfaces between the mount manager and interactive widgets.
//!
//! A [`WidgetFactory`] builds one widget per playground placeholder. The
//! returned [`WidgetHandle`] is owned by the mount manager until the widget
//! is unmounted, at which point [`WidgetHandle::destroy`] consumes it.

use kuchikikiki::NodeRef;
use livemark_commonmark::{PlaceholderRecord, TemplateSet};
use livemark_config::Theme;

use crate::error::WidgetError;

/// A placeholder element found in the attached tree.
#[derive(Debug, Clone)]
pub struct Placeholder {
  id:     String,
  host:   NodeRef,
  record: PlaceholderRecord,
}

impl Placeholder {
  #[must_use]
  pub const fn new(id: String, host: NodeRef, record: PlaceholderRecord) -> Self {
    Self { id, host, record }
  }

  /// Generated placeholder id, also stored in `data-playground-id`.
  #[must_use]
  pub fn id(&self) -> &str {
    &self.id
  }

  /// The element the widget renders into.
  #[must_use]
  pub const fn host(&self) -> &NodeRef {
    &self.host
  }

  #[must_use]
  pub const fn record(&self) -> &PlaceholderRecord {
    &self.record
  }

  #[must_use]
  pub fn template(&self) -> &str {
    &self.record.template
  }

  #[must_use]
  pub fn code(&self) -> &str {
    &self.record.code
  }

  #[must_use]
  pub const fn autorun(&self) -> bool {
    self.record.autorun
  }
}

/// Builds widgets for placeholders.
pub trait WidgetFactory {
  /// Templates this factory can mount. Fenced blocks naming any other
  /// template keep their static rendering.
  fn templates(&self) -> &TemplateSet;

  /// Construct a widget inside `placeholder.host()`.
  ///
  /// # Errors
  ///
  /// Returns an error if the widget cannot be built; the placeholder is then
  /// left unmounted.
  fn create_widget(
    &self,
    placeholder: &Placeholder,
    theme: Theme,
  ) -> Result<Box<dyn WidgetHandle>, WidgetError>;
}

/// A live widget.
pub trait WidgetHandle {
  /// Re-render in place for a new theme.
  ///
  /// # Errors
  ///
  /// Returns an error if the widget fails to update; other widgets are still
  /// updated.
  fn update(&mut self, theme: Theme) -> Result<(), WidgetError>;

  /// Tear the widget down. Runs exactly once.
  fn destroy(self: Box<Self>);
}
