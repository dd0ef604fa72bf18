// src/exec/backend.rs

//! Executor abstraction.
//!
//! The watch session talks to an [`AppShell`] instead of spawning builds
//! itself. Production code uses [`super::shell::CommandShell`]; tests provide
//! a fake that records the batches it was handed.

use crate::deps::BoxFuture;
use crate::errors::Result;
use crate::types::Task;

/// Builds, tests and serves the project.
pub trait AppShell: Send + Sync {
    /// Bring the application up (initial build, then start serving).
    ///
    /// An error here aborts the session.
    fn run(&self) -> BoxFuture<'_, Result<()>>;

    /// Execute a batch of tasks in the given order.
    ///
    /// Failures are the executor's business; they are logged, not returned.
    fn dispatch_tasks(&self, batch: Vec<Task>) -> BoxFuture<'_, ()>;
}
