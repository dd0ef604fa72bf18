use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use devwatch::deps::BoxFuture;
use devwatch::errors::{DevwatchError, Result};
use devwatch::exec::AppShell;
use devwatch::types::Task;

/// A fake executor that:
/// - records every batch it is handed, in order
/// - forwards each batch on a channel so tests can await dispatches
/// - optionally fails `run`, like a broken initial build.
pub struct FakeAppShell {
    batches: Arc<Mutex<Vec<Vec<Task>>>>,
    batch_tx: mpsc::UnboundedSender<Vec<Task>>,
    run_error: Option<String>,
    runs: AtomicUsize,
}

impl FakeAppShell {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Vec<Task>>) {
        Self::build(None)
    }

    /// A shell whose `run` fails with `BuildFailed(reason)`.
    pub fn failing_run(reason: &str) -> (Arc<Self>, mpsc::UnboundedReceiver<Vec<Task>>) {
        Self::build(Some(reason.to_string()))
    }

    fn build(run_error: Option<String>) -> (Arc<Self>, mpsc::UnboundedReceiver<Vec<Task>>) {
        let (batch_tx, batch_rx) = mpsc::unbounded_channel();
        let shell = Self {
            batches: Arc::new(Mutex::new(Vec::new())),
            batch_tx,
            run_error,
            runs: AtomicUsize::new(0),
        };
        (Arc::new(shell), batch_rx)
    }

    pub fn batches(&self) -> Vec<Vec<Task>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn run_count(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl AppShell for FakeAppShell {
    fn run(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            self.runs.fetch_add(1, Ordering::SeqCst);
            match &self.run_error {
                Some(reason) => Err(DevwatchError::BuildFailed(reason.clone())),
                None => Ok(()),
            }
        })
    }

    fn dispatch_tasks(&self, batch: Vec<Task>) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.batches.lock().unwrap().push(batch.clone());
            let _ = self.batch_tx.send(batch);
        })
    }
}
