//! Renderer façade.
//!
//! [`MarkdownRenderer`] turns a [`Document`] into an attached tree, queues a
//! scan that mounts playground widgets, refreshes those widgets when the
//! [`RenderContext`] changes, and tears everything down on
//! [`MarkdownRenderer::dispose`].

use std::{cell::RefCell, rc::Rc};

use kuchikikiki::{Attribute, ExpandedName, NodeRef};
use livemark_commonmark::{
  MarkdownOptions,
  MarkdownProcessor,
  process_with_recovery,
  utils,
};
use livemark_config::Theme;
use log::{debug, trace, warn};
use markup5ever::{QualName, local_name, ns};

use crate::{
  error::RenderError,
  mount::{MountManager, ScanOutcome},
  scheduler::Scheduler,
  widget::WidgetFactory,
};

/// Class of the container element every render is attached to.
pub const CONTAINER_CLASS: &str = "markdown-body";

/// Markdown source plus the per-document playground switch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
  pub text:        String,
  pub playgrounds: bool,
}

impl Document {
  /// A document with playgrounds disabled.
  #[must_use]
  pub fn new(text: impl Into<String>) -> Self {
    Self {
      text:        text.into(),
      playgrounds: false,
    }
  }

  #[must_use]
  pub const fn with_playgrounds(mut self, enabled: bool) -> Self {
    self.playgrounds = enabled;
    self
  }
}

/// Presentation state that can change without re-parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderContext {
  pub theme: Theme,
}

impl RenderContext {
  #[must_use]
  pub const fn new(theme: Theme) -> Self {
    Self { theme }
  }
}

/// The tree produced by one [`MarkdownRenderer::render`] call.
#[derive(Debug, Clone)]
pub struct AttachResult {
  /// The renderer's container element. Shared with the renderer, so later
  /// renders and widget mounts are visible through it.
  pub tree:         NodeRef,
  pub generation:   u64,
  /// Placeholders emitted by the markdown engine.
  pub placeholders: usize,
}

impl AttachResult {
  /// Serialize the container and everything under it.
  #[must_use]
  pub fn to_html(&self) -> String {
    let mut buf = Vec::new();
    if let Err(e) = self.tree.serialize(&mut buf) {
      warn!("Failed to serialize rendered tree: {e}");
    }
    String::from_utf8(buf).unwrap_or_default()
  }
}

/// Renders documents into one owned tree and keeps their widgets alive.
pub struct MarkdownRenderer {
  processor: MarkdownProcessor,
  manager:   Rc<RefCell<MountManager>>,
  scheduler: Scheduler,
  container: NodeRef,
  context:   RenderContext,
  disposed:  bool,
}

impl MarkdownRenderer {
  /// Create a renderer.
  ///
  /// The set of templates that become placeholders is taken from `factory`,
  /// replacing `options.templates`.
  #[must_use]
  pub fn new(
    mut options: MarkdownOptions,
    factory: Rc<dyn WidgetFactory>,
    scheduler: Scheduler,
  ) -> Self {
    options.templates = factory.templates().clone();
    let manager = MountManager::new(factory, scheduler.clone());

    Self {
      processor: MarkdownProcessor::new(options),
      manager: Rc::new(RefCell::new(manager)),
      scheduler,
      container: container(),
      context: RenderContext::default(),
      disposed: false,
    }
  }

  /// Render `document` and attach it, replacing the previous render.
  ///
  /// Widgets of the previous render are unmounted on the next tick. Widgets
  /// for the new placeholders are mounted by a scan queued on the scheduler,
  /// after the new HTML is fully attached.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::Disposed`] after [`Self::dispose`], and
  /// [`RenderError::Busy`] when called from inside a scan.
  pub fn render(
    &mut self,
    document: &Document,
    context: RenderContext,
  ) -> Result<AttachResult, RenderError> {
    if self.disposed {
      return Err(RenderError::Disposed);
    }

    let generation = {
      let mut manager =
        self.manager.try_borrow_mut().map_err(|_| RenderError::Busy)?;
      manager.set_theme(context.theme);
      manager.begin_generation(document.playgrounds)
    };
    self.context = context;

    let result = process_with_recovery(
      &self.processor,
      &document.text,
      document.playgrounds,
    );
    self.attach(&result.html);
    debug!(
      "Attached render generation {generation} with {} placeholder(s)",
      result.placeholders
    );

    self.queue_scan(generation);

    Ok(AttachResult {
      tree: self.container.clone(),
      generation,
      placeholders: result.placeholders,
    })
  }

  /// Apply `context` to every mounted widget. The markup is not re-parsed
  /// and placeholder elements are left in place.
  ///
  /// # Errors
  ///
  /// Returns [`RenderError::Disposed`] after [`Self::dispose`], and
  /// [`RenderError::Busy`] when called from inside a scan.
  pub fn update_context(
    &mut self,
    context: RenderContext,
  ) -> Result<(), RenderError> {
    if self.disposed {
      return Err(RenderError::Disposed);
    }
    let updated = self
      .manager
      .try_borrow_mut()
      .map_err(|_| RenderError::Busy)?
      .update_theme(context.theme);
    self.context = context;
    trace!("Context update refreshed {updated} widget(s)");
    Ok(())
  }

  /// Scan the current tree immediately instead of waiting for the queued
  /// scan.
  pub fn scan_now(&self) -> ScanOutcome {
    let Ok(mut manager) = self.manager.try_borrow_mut() else {
      return ScanOutcome::Busy;
    };
    let generation = manager.generation();
    manager.scan(&self.container, generation)
  }

  /// Unmount every widget and detach the rendered content. Safe to call more
  /// than once.
  ///
  /// When called while a scan is running (from a widget factory, say) the
  /// unmount is deferred to the next tick.
  pub fn dispose(&mut self) {
    if self.disposed {
      return;
    }
    self.disposed = true;

    match self.manager.try_borrow_mut() {
      Ok(mut manager) => manager.dispose(),
      Err(_) => {
        // Called from inside a scan; unmount once the scan has returned.
        debug!("Mount manager busy during dispose; deferring unmount");
        let manager = Rc::clone(&self.manager);
        self.scheduler.defer(move || match manager.try_borrow_mut() {
          Ok(mut manager) => manager.dispose(),
          Err(_) => warn!("Mount manager still busy; widgets not unmounted"),
        });
      },
    }
    detach_children(&self.container);
    debug!("Renderer disposed");
  }

  /// The container element renders are attached to.
  #[must_use]
  pub const fn tree(&self) -> &NodeRef {
    &self.container
  }

  #[must_use]
  pub fn generation(&self) -> u64 {
    self.manager.borrow().generation()
  }

  #[must_use]
  pub const fn context(&self) -> RenderContext {
    self.context
  }

  #[must_use]
  pub fn mounted_count(&self) -> usize {
    self.manager.borrow().mounted_count()
  }

  /// Whether `node` hosts a widget mounted by this renderer.
  #[must_use]
  pub fn is_mounted(&self, node: &NodeRef) -> bool {
    self.manager.borrow().is_mounted(node)
  }

  #[must_use]
  pub const fn is_disposed(&self) -> bool {
    self.disposed
  }

  #[must_use]
  pub const fn processor(&self) -> &MarkdownProcessor {
    &self.processor
  }

  fn attach(&self, html: &str) {
    detach_children(&self.container);
    let document = utils::parse_fragment(html);
    let Some(body) = utils::body_of(&document) else {
      warn!("Rendered HTML has no body; nothing attached");
      return;
    };
    let children: Vec<NodeRef> = body.children().collect();
    for child in children {
      self.container.append(child);
    }
  }

  fn queue_scan(&self, generation: u64) {
    let manager = Rc::downgrade(&self.manager);
    let root = self.container.clone();
    self.scheduler.defer(move || {
      let Some(manager) = manager.upgrade() else {
        debug!("Renderer dropped before scan of generation {generation}");
        return;
      };
      let Ok(mut manager) = manager.try_borrow_mut() else {
        warn!("Mount manager busy; skipping scan of generation {generation}");
        return;
      };
      manager.scan(&root, generation);
    });
  }
}

impl Drop for MarkdownRenderer {
  fn drop(&mut self) {
    self.dispose();
  }
}

impl std::fmt::Debug for MarkdownRenderer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MarkdownRenderer")
      .field("processor", &self.processor)
      .field("manager", &self.manager)
      .field("context", &self.context)
      .field("disposed", &self.disposed)
      .finish_non_exhaustive()
  }
}

fn container() -> NodeRef {
  NodeRef::new_element(
    QualName::new(None, ns!(html), local_name!("div")),
    [(ExpandedName::new("", "class"), Attribute {
      prefix: None,
      value:  CONTAINER_CLASS.to_string(),
    })],
  )
}

fn detach_children(node: &NodeRef) {
  let children: Vec<NodeRef> = node.children().collect();
  for child in children {
    child.detach();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::preview::StaticPreviewFactory;

  fn renderer() -> (MarkdownRenderer, Scheduler) {
    let scheduler = Scheduler::new();
    let options = MarkdownOptions {
      highlight_code: false,
      ..MarkdownOptions::default()
    };
    let renderer = MarkdownRenderer::new(
      options,
      Rc::new(StaticPreviewFactory::default()),
      scheduler.clone(),
    );
    (renderer, scheduler)
  }

  #[test]
  fn test_render_attaches_into_container() {
    let (mut renderer, _scheduler) = renderer();
    let result = renderer
      .render(&Document::new("# Title"), RenderContext::default())
      .expect("render");

    assert_eq!(result.generation, 1);
    assert_eq!(result.placeholders, 0);
    assert!(result.tree == *renderer.tree());
    assert_eq!(
      result.to_html(),
      "<div class=\"markdown-body\"><h1>Title</h1>\n</div>"
    );
  }

  #[test]
  fn test_rerender_replaces_content() {
    let (mut renderer, _scheduler) = renderer();
    renderer
      .render(&Document::new("first"), RenderContext::default())
      .expect("render");
    let result = renderer
      .render(&Document::new("second"), RenderContext::default())
      .expect("render");

    assert_eq!(result.generation, 2);
    let html = result.to_html();
    assert!(html.contains("second"));
    assert!(!html.contains("first"));
  }

  #[test]
  fn test_scan_is_deferred() {
    let (mut renderer, scheduler) = renderer();
    let document =
      Document::new("```js template=\"vanilla\"\n1\n```\n").with_playgrounds(true);
    renderer
      .render(&document, RenderContext::new(Theme::Dark))
      .expect("render");

    assert_eq!(renderer.mounted_count(), 0);
    assert_eq!(scheduler.pending(), 1);
    scheduler.run_until_idle();
    assert_eq!(renderer.mounted_count(), 1);
    assert_eq!(renderer.context().theme, Theme::Dark);
  }

  #[test]
  fn test_dispose_is_idempotent() {
    let (mut renderer, _scheduler) = renderer();
    renderer
      .render(&Document::new("text"), RenderContext::default())
      .expect("render");
    renderer.dispose();
    renderer.dispose();

    assert!(renderer.is_disposed());
    assert_eq!(renderer.tree().children().count(), 0);
    assert!(matches!(
      renderer.update_context(RenderContext::default()),
      Err(RenderError::Disposed)
    ));
  }
}
