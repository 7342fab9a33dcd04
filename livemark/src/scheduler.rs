//! Single-threaded cooperative task queue.
//!
//! Work that must not run inside the current call stack (mounting widgets
//! after a render, destroying widgets after an unmount) is deferred to the
//! next [`Scheduler::tick`].

use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};

use log::{error, warn};

type Task = Box<dyn FnOnce()>;

/// Upper bound on ticks in [`Scheduler::run_until_idle`], so tasks that keep
/// re-queuing themselves cannot spin forever.
const MAX_IDLE_TICKS: usize = 1024;

/// Cloneable handle to a FIFO task queue.
///
/// All clones share the same queue.
#[derive(Clone, Default)]
pub struct Scheduler {
  queue: Rc<RefCell<VecDeque<Task>>>,
}

impl Scheduler {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Queue `task` for the next tick.
  pub fn defer(&self, task: impl FnOnce() + 'static) {
    self.queue.borrow_mut().push_back(Box::new(task));
  }

  /// Number of queued tasks.
  #[must_use]
  pub fn pending(&self) -> usize {
    self.queue.borrow().len()
  }

  #[must_use]
  pub fn is_idle(&self) -> bool {
    self.queue.borrow().is_empty()
  }

  /// Run the tasks queued before this call, in order.
  ///
  /// Tasks queued while ticking run on the next tick. A panicking task is
  /// logged and does not stop the rest of the batch. Returns the number of
  /// tasks run.
  pub fn tick(&self) -> usize {
    let batch: Vec<Task> = self.queue.borrow_mut().drain(..).collect();
    let count = batch.len();
    for task in batch {
      if let Err(e) = std::panic::catch_unwind(std::panic::AssertUnwindSafe(task))
      {
        if let Some(msg) = e.downcast_ref::<String>() {
          error!("Scheduled task panicked: {msg}");
        } else if let Some(msg) = e.downcast_ref::<&str>() {
          error!("Scheduled task panicked: {msg}");
        } else {
          error!("Scheduled task panicked");
        }
      }
    }
    count
  }

  /// Tick until the queue is empty. Returns the total number of tasks run.
  pub fn run_until_idle(&self) -> usize {
    let mut total = 0;
    for _ in 0..MAX_IDLE_TICKS {
      if self.is_idle() {
        return total;
      }
      total += self.tick();
    }
    warn!(
      "Scheduler still busy after {MAX_IDLE_TICKS} ticks, {} task(s) left",
      self.pending()
    );
    total
  }
}

impl fmt::Debug for Scheduler {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Scheduler")
      .field("pending", &self.pending())
      .finish()
  }
}
