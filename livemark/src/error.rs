use thiserror::Error;

/// Errors returned by [`crate::MarkdownRenderer`].
#[derive(Debug, Error)]
pub enum RenderError {
  #[error("Renderer has been disposed")]
  Disposed,

  #[error("Mount manager is busy; re-entrant render is not supported")]
  Busy,
}

/// Errors raised by widget factories and widget handles.
#[derive(Debug, Error)]
pub enum WidgetError {
  #[error("Unsupported playground template: {0}")]
  UnsupportedTemplate(String),

  #[error("Placeholder is missing the {0} attribute")]
  MissingAttribute(&'static str),

  #[error("Widget construction failed: {0}")]
  Construction(String),

  #[error("Widget update failed: {0}")]
  Update(String),
}
