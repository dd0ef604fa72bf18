// src/watch/watcher.rs

use std::path::Path;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::watch::event::{from_notify, FsEvent};

/// Registration table of the notification backend.
///
/// Directories are registered one by one (non-recursively) so the observed
/// set can grow and shrink while the session runs.
pub trait WatchRegistry: Send {
    fn watch(&mut self, dir: &Path) -> Result<()>;
    fn unwatch(&mut self, dir: &Path) -> Result<()>;
}

/// Receiving half of the notification stream consumed by the watch loop.
#[derive(Debug)]
pub struct NotificationSource {
    pub events: mpsc::UnboundedReceiver<FsEvent>,
    pub errors: mpsc::UnboundedReceiver<notify::Error>,
}

/// Sending half of the notification stream.
#[derive(Debug, Clone)]
pub struct NotificationSink {
    pub events: mpsc::UnboundedSender<FsEvent>,
    pub errors: mpsc::UnboundedSender<notify::Error>,
}

pub fn notification_channel() -> (NotificationSink, NotificationSource) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (error_tx, error_rx) = mpsc::unbounded_channel();
    (
        NotificationSink {
            events: event_tx,
            errors: error_tx,
        },
        NotificationSource {
            events: event_rx,
            errors: error_rx,
        },
    )
}

/// [`WatchRegistry`] backed by the platform's recommended `notify` watcher.
///
/// Dropping it stops all observation.
pub struct NotifyRegistry {
    inner: RecommendedWatcher,
}

impl std::fmt::Debug for NotifyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyRegistry").finish()
    }
}

impl NotifyRegistry {
    /// Create the backend watcher together with the stream it feeds.
    pub fn new() -> Result<(Self, NotificationSource)> {
        let (sink, source) = notification_channel();

        // Called synchronously on notify's own thread.
        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for fs_event in from_notify(event) {
                        if let Err(err) = sink.events.send(fs_event) {
                            warn!("failed to forward notify event: {err}");
                        }
                    }
                }
                Err(err) => {
                    if sink.errors.send(err).is_err() {
                        warn!("watch loop gone; dropping notify error");
                    }
                }
            },
            Config::default(),
        )?;

        Ok((Self { inner }, source))
    }
}

impl WatchRegistry for NotifyRegistry {
    fn watch(&mut self, dir: &Path) -> Result<()> {
        self.inner.watch(dir, RecursiveMode::NonRecursive)?;
        debug!(path = %dir.display(), "watching");
        Ok(())
    }

    fn unwatch(&mut self, dir: &Path) -> Result<()> {
        self.inner.unwatch(dir)?;
        debug!(path = %dir.display(), "stopped watching");
        Ok(())
    }
}
