//! Widget mount manager.
//!
//! Each playground placeholder goes through
//! `unmounted -> mounted -> updated* -> unmounted`. Mount records live in a
//! side table keyed by a generated placeholder id, which is also written to
//! the element as `data-playground-id`. An entry only counts for the element
//! it was created for, so an id copied onto another element never makes that
//! element look mounted.

use std::{panic::AssertUnwindSafe, rc::Rc};

use indexmap::IndexMap;
use kuchikikiki::NodeRef;
use livemark_commonmark::{ATTR_TEMPLATE, PLACEHOLDER_SELECTOR, PlaceholderRecord};
use livemark_config::Theme;
use log::{debug, error, trace, warn};

use crate::{
  error::WidgetError,
  scheduler::Scheduler,
  widget::{Placeholder, WidgetFactory, WidgetHandle},
};

/// Attribute holding the generated placeholder id.
pub const ATTR_PLAYGROUND_ID: &str = "data-playground-id";

/// Counts from one completed scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
  /// Widgets constructed by this scan.
  pub mounted: usize,
  /// Placeholders already mounted, already failed this generation, or found
  /// while playgrounds are off.
  pub skipped: usize,
  /// Placeholders whose widget could not be built.
  pub failed:  usize,
  /// Widgets unmounted because their element left the tree.
  pub pruned:  usize,
}

/// Result of a scan request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
  Completed(ScanReport),
  /// The scan was queued for an older render and was discarded.
  Stale { queued: u64, current: u64 },
  /// The manager was already borrowed; the scan was skipped.
  Busy,
}

impl ScanOutcome {
  /// The report of a completed scan.
  #[must_use]
  pub const fn report(self) -> Option<ScanReport> {
    match self {
      Self::Completed(report) => Some(report),
      Self::Stale { .. } | Self::Busy => None,
    }
  }
}

struct MountedWidget {
  host:   NodeRef,
  record: PlaceholderRecord,
  handle: Box<dyn WidgetHandle>,
}

/// Owns every mounted widget of one renderer.
pub struct MountManager {
  factory:     Rc<dyn WidgetFactory>,
  scheduler:   Scheduler,
  generation:  u64,
  playgrounds: bool,
  theme:       Theme,
  next_id:     usize,
  mounted:     IndexMap<String, MountedWidget>,
  failed:      IndexMap<String, NodeRef>,
}

impl MountManager {
  #[must_use]
  pub fn new(factory: Rc<dyn WidgetFactory>, scheduler: Scheduler) -> Self {
    Self {
      factory,
      scheduler,
      generation: 0,
      playgrounds: false,
      theme: Theme::default(),
      next_id: 0,
      mounted: IndexMap::new(),
      failed: IndexMap::new(),
    }
  }

  #[must_use]
  pub const fn generation(&self) -> u64 {
    self.generation
  }

  /// Whether the current generation mounts playgrounds at all.
  #[must_use]
  pub const fn playgrounds(&self) -> bool {
    self.playgrounds
  }

  #[must_use]
  pub const fn theme(&self) -> Theme {
    self.theme
  }

  /// Set the theme used for widgets mounted from now on, without touching
  /// mounted widgets.
  pub const fn set_theme(&mut self, theme: Theme) {
    self.theme = theme;
  }

  #[must_use]
  pub fn mounted_count(&self) -> usize {
    self.mounted.len()
  }

  #[must_use]
  pub fn failed_count(&self) -> usize {
    self.failed.len()
  }

  /// Ids of mounted widgets, in mount order.
  pub fn mounted_ids(&self) -> impl Iterator<Item = &str> {
    self.mounted.keys().map(String::as_str)
  }

  /// Record of the widget mounted under `id`.
  #[must_use]
  pub fn record(&self, id: &str) -> Option<&PlaceholderRecord> {
    self.mounted.get(id).map(|widget| &widget.record)
  }

  /// Whether `node` hosts a mounted widget.
  #[must_use]
  pub fn is_mounted(&self, node: &NodeRef) -> bool {
    placeholder_id(node)
      .and_then(|id| self.mounted.get(&id))
      .is_some_and(|widget| widget.host == *node)
  }

  /// Start a new render generation.
  ///
  /// Every mounted widget is unmounted and the failure record is cleared.
  /// Scans queued for earlier generations become stale. When `playgrounds`
  /// is false, scans of this generation mount nothing.
  pub fn begin_generation(&mut self, playgrounds: bool) -> u64 {
    self.generation += 1;
    self.playgrounds = playgrounds;
    self.unmount_all();
    self.failed.clear();
    self.next_id = 0;
    debug!("Starting render generation {}", self.generation);
    self.generation
  }

  /// Mount a widget for every unmounted placeholder under `root`, in
  /// document order.
  ///
  /// Discarded as stale when `generation` is not the current one. Widgets
  /// whose element is no longer under `root` are unmounted.
  pub fn scan(&mut self, root: &NodeRef, generation: u64) -> ScanOutcome {
    if generation != self.generation {
      debug!(
        "Discarding stale scan for generation {generation} (current {})",
        self.generation
      );
      return ScanOutcome::Stale {
        queued:  generation,
        current: self.generation,
      };
    }

    let nodes: Vec<NodeRef> = root
      .select(PLACEHOLDER_SELECTOR)
      .map(|found| found.map(|node| node.as_node().clone()).collect())
      .unwrap_or_default();

    let mut report = ScanReport {
      pruned: self.prune(&nodes),
      ..ScanReport::default()
    };

    if !self.playgrounds {
      report.skipped = nodes.len();
      if report.skipped > 0 {
        debug!(
          "Playgrounds are off for generation {}; ignoring {} placeholder(s)",
          self.generation, report.skipped
        );
      }
      return ScanOutcome::Completed(report);
    }

    for node in nodes {
      if self.is_known(&node) {
        report.skipped += 1;
        continue;
      }

      let id = self.assign_id(&node);
      match self.mount(&id, &node) {
        Ok(()) => report.mounted += 1,
        Err(e) => {
          warn!("Failed to mount playground {id}: {e}");
          self.failed.insert(id, node);
          report.failed += 1;
        },
      }
    }

    debug!(
      "Scan of generation {}: {} mounted, {} skipped, {} failed, {} pruned",
      self.generation,
      report.mounted,
      report.skipped,
      report.failed,
      report.pruned
    );
    ScanOutcome::Completed(report)
  }

  /// Apply a new theme to every mounted widget, in mount order.
  ///
  /// Update errors are logged and do not stop the remaining widgets. Returns
  /// the number of widgets updated successfully.
  pub fn update_theme(&mut self, theme: Theme) -> usize {
    self.theme = theme;
    let mut updated = 0;
    for (id, widget) in &mut self.mounted {
      match widget.handle.update(theme) {
        Ok(()) => updated += 1,
        Err(e) => error!("Failed to update playground {id}: {e}"),
      }
    }
    trace!("Updated {updated} widget(s) to the {theme} theme");
    updated
  }

  /// Unmount every widget. Each `destroy` runs on the next scheduler tick.
  pub fn unmount_all(&mut self) -> usize {
    let count = self.mounted.len();
    for (id, widget) in self.mounted.drain(..) {
      Self::defer_destroy(&self.scheduler, id, widget);
    }
    if count > 0 {
      debug!("Scheduled {count} widget(s) for unmount");
    }
    count
  }

  /// Tear down for good: unmount everything and invalidate queued scans.
  pub fn dispose(&mut self) {
    self.begin_generation(false);
  }

  /// Whether `node` is already handled in this generation.
  fn is_known(&self, node: &NodeRef) -> bool {
    let Some(id) = placeholder_id(node) else {
      return false;
    };
    self.mounted.get(&id).is_some_and(|widget| widget.host == *node)
      || self.failed.get(&id).is_some_and(|host| host == node)
  }

  fn assign_id(&mut self, node: &NodeRef) -> String {
    let id = format!("pg-{}-{}", self.generation, self.next_id);
    self.next_id += 1;
    if let Some(element) = node.as_element() {
      element
        .attributes
        .borrow_mut()
        .insert(ATTR_PLAYGROUND_ID, id.clone());
    }
    id
  }

  fn mount(&mut self, id: &str, node: &NodeRef) -> Result<(), WidgetError> {
    let record = node
      .as_element()
      .and_then(|element| {
        PlaceholderRecord::from_attributes(&element.attributes.borrow())
      })
      .ok_or(WidgetError::MissingAttribute(ATTR_TEMPLATE))?;
    if !self.factory.templates().contains(&record.template) {
      return Err(WidgetError::UnsupportedTemplate(record.template));
    }

    let placeholder = Placeholder::new(id.to_string(), node.clone(), record);
    let factory = Rc::clone(&self.factory);
    let theme = self.theme;
    let handle = std::panic::catch_unwind(AssertUnwindSafe(|| {
      factory.create_widget(&placeholder, theme)
    }))
    .map_err(|_| {
      WidgetError::Construction(format!(
        "factory panicked building a '{}' widget",
        placeholder.template()
      ))
    })??;

    trace!("Mounted {} playground {id}", placeholder.template());
    self.mounted.insert(id.to_string(), MountedWidget {
      host: node.clone(),
      record: placeholder.record().clone(),
      handle,
    });
    Ok(())
  }

  /// Unmount widgets whose element is not among `attached`.
  fn prune(&mut self, attached: &[NodeRef]) -> usize {
    let stale: Vec<String> = self
      .mounted
      .iter()
      .filter(|(_, widget)| !attached.contains(&widget.host))
      .map(|(id, _)| id.clone())
      .collect();

    for id in &stale {
      if let Some(widget) = self.mounted.shift_remove(id) {
        debug!("Playground {id} left the tree, unmounting");
        Self::defer_destroy(&self.scheduler, id.clone(), widget);
      }
    }
    stale.len()
  }

  fn defer_destroy(scheduler: &Scheduler, id: String, widget: MountedWidget) {
    let handle = widget.handle;
    scheduler.defer(move || {
      trace!("Destroying playground {id}");
      handle.destroy();
    });
  }
}

impl std::fmt::Debug for MountManager {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MountManager")
      .field("generation", &self.generation)
      .field("theme", &self.theme)
      .field("mounted", &self.mounted.keys().collect::<Vec<_>>())
      .field("failed", &self.failed.keys().collect::<Vec<_>>())
      .finish_non_exhaustive()
  }
}

/// The `data-playground-id` of an element, if set.
fn placeholder_id(node: &NodeRef) -> Option<String> {
  node
    .as_element()?
    .attributes
    .borrow()
    .get(ATTR_PLAYGROUND_ID)
    .map(str::to_string)
}
