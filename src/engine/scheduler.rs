use std::sync::Arc;

use tracing::debug;

use crate::engine::queue::TaskQueue;
use crate::exec::AppShell;

/// Flushes the task queue to the executor once per debounce tick.
///
/// The tick period is fixed; events don't push it back. This is the only
/// place tasks are handed to the executor.
#[derive(Clone)]
pub struct DebounceScheduler {
    queue: Arc<TaskQueue>,
    shell: Arc<dyn AppShell>,
}

impl std::fmt::Debug for DebounceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebounceScheduler")
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

impl DebounceScheduler {
    pub fn new(queue: Arc<TaskQueue>, shell: Arc<dyn AppShell>) -> Self {
        Self { queue, shell }
    }

    pub fn queue(&self) -> &Arc<TaskQueue> {
        &self.queue
    }

    /// Drain the queue and dispatch the batch, if any.
    ///
    /// Returns the number of dispatched tasks. The queue lock is released
    /// before the executor runs, so the drain is atomic but building isn't
    /// done under the lock.
    pub async fn tick(&self) -> usize {
        let batch = self.queue.drain_all();
        if batch.is_empty() {
            return 0;
        }

        let count = batch.len();
        let names: Vec<String> = batch.iter().map(ToString::to_string).collect();
        debug!(?names, "dispatching task batch");
        self.shell.dispatch_tasks(batch).await;
        count
    }
}
