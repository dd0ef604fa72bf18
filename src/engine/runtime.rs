// src/engine/runtime.rs

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::engine::reload::ConfigReloader;
use crate::engine::scheduler::DebounceScheduler;
use crate::engine::StopSignal;
use crate::watch::{
    DirectoryWatcher, EventClassifier, FsEvent, NotificationSource, WatchAction, WatchRegistry,
};

/// The background half of a watch session.
///
/// A single task selects over notification events, notification errors,
/// the debounce tick and the stop signal, so event handling and queue
/// flushing never run at the same time.
#[derive(Debug)]
pub struct WatchLoop<R: WatchRegistry> {
    watcher: DirectoryWatcher<R>,
    classifier: EventClassifier,
    reloader: ConfigReloader,
    scheduler: DebounceScheduler,
    debounce: Duration,
}

impl<R: WatchRegistry> WatchLoop<R> {
    pub fn new(
        watcher: DirectoryWatcher<R>,
        classifier: EventClassifier,
        reloader: ConfigReloader,
        scheduler: DebounceScheduler,
        debounce: Duration,
    ) -> Self {
        Self {
            watcher,
            classifier,
            reloader,
            scheduler,
            debounce,
        }
    }

    pub fn watcher(&self) -> &DirectoryWatcher<R> {
        &self.watcher
    }

    pub fn watcher_mut(&mut self) -> &mut DirectoryWatcher<R> {
        &mut self.watcher
    }

    pub fn scheduler(&self) -> &DebounceScheduler {
        &self.scheduler
    }

    /// Main event loop. Runs until `stop` fires or every notification
    /// channel is closed.
    ///
    /// Tasks still queued when the loop ends are dropped.
    pub async fn run(mut self, mut source: NotificationSource, mut stop: StopSignal) {
        // First flush one full period after start, not immediately.
        let mut ticker = interval_at(Instant::now() + self.debounce, self.debounce);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut events_open = true;
        let mut errors_open = true;

        info!(interval = ?self.debounce, "watch loop started");

        loop {
            tokio::select! {
                _ = stop.wait() => {
                    info!("stop requested; leaving watch loop");
                    break;
                }
                event = source.events.recv(), if events_open => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        debug!("notification event channel closed");
                        events_open = false;
                    }
                },
                err = source.errors.recv(), if errors_open => match err {
                    Some(err) => error!(error = %err, "file watch error"),
                    None => errors_open = false,
                },
                _ = ticker.tick() => {
                    self.scheduler.tick().await;
                }
            }

            if !events_open && !errors_open {
                info!("notification source closed; leaving watch loop");
                break;
            }
        }

        let dropped = self.scheduler.queue().drain_all();
        if !dropped.is_empty() {
            debug!(dropped = dropped.len(), "discarding pending tasks at shutdown");
        }
    }

    /// Classify one event and apply the resulting actions.
    pub async fn handle_event(&mut self, event: FsEvent) {
        let actions = self.classifier.classify(&event, self.watcher.watched());
        if !actions.is_empty() {
            debug!(?event, ?actions, "classified event");
        }

        for action in actions {
            match action {
                WatchAction::RegisterDirectory(dir) => self.watcher.on_directory_created(&dir),
                WatchAction::DeregisterDirectory(dir) => self.watcher.on_directory_removed(&dir),
                WatchAction::Enqueue(task) => {
                    self.scheduler.queue().add(task);
                }
                WatchAction::ReloadConfig => {
                    self.reloader.reload().await;
                }
            }
        }
    }
}
