//! Render markdown into a live document tree.
//!
//! [`MarkdownRenderer`] attaches the output of the `livemark-commonmark`
//! engine to a DOM container and mounts an interactive widget into every
//! playground placeholder, using a [`WidgetFactory`] supplied by the caller.
//! Mounting and unmounting run as deferred tasks on a [`Scheduler`].
pub mod cli;
pub mod error;
pub mod mount;
pub mod preview;
pub mod renderer;
pub mod scheduler;
pub mod widget;

pub use crate::{
  error::{RenderError, WidgetError},
  mount::{ATTR_PLAYGROUND_ID, MountManager, ScanOutcome, ScanReport},
  preview::{StaticPreview, StaticPreviewFactory},
  renderer::{AttachResult, Document, MarkdownRenderer, RenderContext},
  scheduler::Scheduler,
  widget::{Placeholder, WidgetFactory, WidgetHandle},
};
