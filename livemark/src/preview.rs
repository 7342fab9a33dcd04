//! Headless playground widgets.
//!
//! [`StaticPreviewFactory`] renders each playground as its source code in a
//! `<pre>` block, styled by theme. It stands in for a live sandbox when the
//! tree is serialized (the CLI) and in tests.

use kuchikikiki::{Attribute, ExpandedName, NodeRef};
use livemark_commonmark::TemplateSet;
use livemark_config::Theme;
use markup5ever::{QualName, local_name, ns};

use crate::{
  error::WidgetError,
  widget::{Placeholder, WidgetFactory, WidgetHandle},
};

/// Builds [`StaticPreview`] widgets for a fixed set of templates.
#[derive(Debug, Clone)]
pub struct StaticPreviewFactory {
  templates: TemplateSet,
}

impl StaticPreviewFactory {
  #[must_use]
  pub const fn new(templates: TemplateSet) -> Self {
    Self { templates }
  }
}

impl Default for StaticPreviewFactory {
  fn default() -> Self {
    Self::new(TemplateSet::sandpack())
  }
}

impl WidgetFactory for StaticPreviewFactory {
  fn templates(&self) -> &TemplateSet {
    &self.templates
  }

  fn create_widget(
    &self,
    placeholder: &Placeholder,
    theme: Theme,
  ) -> Result<Box<dyn WidgetHandle>, WidgetError> {
    if !self.templates.contains(placeholder.template()) {
      return Err(WidgetError::UnsupportedTemplate(
        placeholder.template().to_string(),
      ));
    }

    let host = placeholder.host().clone();
    let code = element(local_name!("code"), vec![(
      "class",
      format!("language-{}", placeholder.template()),
    )]);
    code.append(NodeRef::new_text(placeholder.code()));
    let pre = element(local_name!("pre"), vec![(
      "class",
      "playground-source".to_string(),
    )]);
    pre.append(code);
    host.append(pre);

    let widget = StaticPreview { host };
    widget.apply_theme(theme);
    Ok(Box::new(widget))
  }
}

/// A playground rendered as plain source text.
#[derive(Debug)]
pub struct StaticPreview {
  host: NodeRef,
}

impl StaticPreview {
  fn apply_theme(&self, theme: Theme) {
    if let Some(element) = self.host.as_element() {
      element
        .attributes
        .borrow_mut()
        .insert("class", format!("playground playground-{theme}"));
    }
  }
}

impl WidgetHandle for StaticPreview {
  fn update(&mut self, theme: Theme) -> Result<(), WidgetError> {
    if self.host.as_element().is_none() {
      return Err(WidgetError::Update("host is not an element".to_string()));
    }
    self.apply_theme(theme);
    Ok(())
  }

  fn destroy(self: Box<Self>) {
    let children: Vec<_> = self.host.children().collect();
    for child in children {
      child.detach();
    }
    if let Some(element) = self.host.as_element() {
      element.attributes.borrow_mut().remove("class");
    }
  }
}

fn element(
  name: markup5ever::LocalName,
  attributes: Vec<(&str, String)>,
) -> NodeRef {
  NodeRef::new_element(
    QualName::new(None, ns!(html), name),
    attributes.into_iter().map(|(key, value)| {
      (ExpandedName::new("", key), Attribute {
        prefix: None,
        value,
      })
    }),
  )
}
