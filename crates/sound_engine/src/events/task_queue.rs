//! Deferred callbacks
//!
//! The "call later" primitive: work submitted here never runs synchronously.
//! The host loop calls [`TaskQueue::run_pending`] once per frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

type Task = Box<dyn FnOnce()>;

/// FIFO queue of one-shot callbacks
///
/// Clones share the same queue, so handles can hold one without owning the
/// host loop.
#[derive(Clone, Default)]
pub struct TaskQueue {
    pending: Rc<RefCell<VecDeque<Task>>>,
}

impl TaskQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run on a later pump
    pub fn call_later(&self, task: impl FnOnce() + 'static) {
        self.pending.borrow_mut().push_back(Box::new(task));
    }

    /// Number of tasks waiting
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// True if nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Run every task queued before this call, in submission order.
    ///
    /// Tasks scheduled while pumping wait for the next call. Returns the
    /// number of tasks run.
    pub fn run_pending(&self) -> usize {
        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        let count = batch.len();
        for task in batch {
            task();
        }
        if count > 0 {
            log::trace!("Ran {} deferred task(s)", count);
        }
        count
    }

    /// Drop every waiting task without running it
    pub fn clear(&self) {
        self.pending.borrow_mut().clear();
    }
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending_count())
            .finish()
    }
}
