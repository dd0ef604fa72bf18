// src/engine/mod.rs

//! Watch-and-schedule engine.
//!
//! This module ties together:
//! - the deduplicating, priority-ordered [`TaskQueue`]
//! - the [`DebounceScheduler`] flushing that queue on a fixed tick
//! - the [`ConfigReloader`] reacting to project file changes
//! - the [`WatchLoop`] consuming filesystem notifications
//! - the [`WatchSession`] owning startup, the executor and shutdown

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::watch::{ClassifierOptions, DEFAULT_IGNORED};

pub mod queue;
pub mod reload;
pub mod runtime;
pub mod scheduler;
pub mod session;

pub use queue::TaskQueue;
pub use reload::{ConfigReloader, ReloadOutcome};
pub use runtime::WatchLoop;
pub use scheduler::DebounceScheduler;
pub use session::{SessionContext, WatchSession};

/// Period of the debounce tick.
pub const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(800);

/// Settings fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub debounce: Duration,
    /// Root-relative path prefixes that are never watched.
    pub ignore: Vec<String>,
    pub classifier: ClassifierOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_INTERVAL,
            ignore: DEFAULT_IGNORED.iter().map(|s| s.to_string()).collect(),
            classifier: ClassifierOptions::default(),
        }
    }
}

/// Requests the end of a session. Dropping every handle also counts as a
/// stop request.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes a [`StopHandle`].
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once a stop has been requested. Cancel safe.
    pub async fn wait(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx: Arc::new(tx) }, StopSignal { rx })
}
