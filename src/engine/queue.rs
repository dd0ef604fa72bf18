use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::types::Task;

/// Pending rebuild tasks, waiting for the next debounce tick.
///
/// Semantics:
/// - Adding a task that is already pending (same kind and target) is a
///   no-op, so a directory saved three times between ticks yields one task.
/// - Tasks are kept sorted by [`crate::types::TaskKind`] at insertion time;
///   tasks of the same kind stay in arrival order. A drained batch is
///   therefore already in execution order.
/// - Every mutation happens under one exclusive lock, which makes
///   [`TaskQueue::drain_all`] atomic with respect to [`TaskQueue::add`].
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: Mutex<Vec<Task>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue `task` unless an equal task is already pending.
    ///
    /// Returns `true` if the task was inserted.
    pub fn add(&self, task: Task) -> bool {
        let mut tasks = self.lock();

        let mut insert_at = tasks.len();
        for (i, pending) in tasks.iter().enumerate() {
            if *pending == task {
                debug!(%task, "task already pending; coalesced");
                return false;
            }
            if pending.kind > task.kind {
                insert_at = i;
                break;
            }
        }

        // Anything past `insert_at` has a greater kind and can't be equal.
        debug!(%task, position = insert_at, "task queued");
        tasks.insert(insert_at, task);
        true
    }

    /// Take every pending task, leaving the queue empty.
    pub fn drain_all(&self) -> Vec<Task> {
        let drained = std::mem::take(&mut *self.lock());
        if !drained.is_empty() {
            debug!(drained = drained.len(), "drained pending tasks");
        }
        drained
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the pending tasks, in execution order.
    pub fn snapshot(&self) -> Vec<Task> {
        self.lock().clone()
    }
}
