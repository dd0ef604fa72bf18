use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use tracing::{error, info};

use crate::config::SharedConfig;
use crate::deps::DependencyResolver;
use crate::engine::queue::TaskQueue;
use crate::engine::reload::ConfigReloader;
use crate::engine::runtime::WatchLoop;
use crate::engine::scheduler::DebounceScheduler;
use crate::engine::{SessionOptions, StopSignal};
use crate::errors::Result;
use crate::exec::AppShell;
use crate::fs::FileSystem;
use crate::watch::{
    DirectoryWatcher, EventClassifier, NotificationSource, PathFilter, WatchRegistry,
};

/// Everything a session shares with the rest of the process.
#[derive(Debug, Clone)]
pub struct SessionContext {
    /// Project root; event paths are interpreted relative to it.
    pub root: PathBuf,
    pub config: SharedConfig,
    pub fs: Arc<dyn FileSystem>,
    pub queue: Arc<TaskQueue>,
    pub resolver: DependencyResolver,
    pub options: SessionOptions,
}

/// A running development session: watch the tree, keep the app up, rebuild
/// on change until told to stop.
pub struct WatchSession<R: WatchRegistry> {
    watch_loop: WatchLoop<R>,
    shell: Arc<dyn AppShell>,
}

impl<R: WatchRegistry> std::fmt::Debug for WatchSession<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchSession").finish_non_exhaustive()
    }
}

impl<R: WatchRegistry + 'static> WatchSession<R> {
    pub fn new(ctx: SessionContext, registry: R, shell: Arc<dyn AppShell>) -> Self {
        let filter = Arc::new(PathFilter::new(&ctx.options.ignore));
        let config_path = ctx.root.join(&ctx.options.classifier.config_file);

        let watcher = DirectoryWatcher::new(
            ctx.root.clone(),
            registry,
            Arc::clone(&filter),
            Arc::clone(&ctx.fs),
        );
        let classifier = EventClassifier::new(
            ctx.root.clone(),
            filter,
            Arc::clone(&ctx.fs),
            ctx.config.clone(),
            ctx.options.classifier.clone(),
        );
        let reloader = ConfigReloader::new(
            config_path,
            Arc::clone(&ctx.fs),
            ctx.config.clone(),
            ctx.resolver.clone(),
            Arc::clone(&ctx.queue),
        );
        let scheduler = DebounceScheduler::new(Arc::clone(&ctx.queue), Arc::clone(&shell));

        Self {
            watch_loop: WatchLoop::new(
                watcher,
                classifier,
                reloader,
                scheduler,
                ctx.options.debounce,
            ),
            shell,
        }
    }

    /// Run the session until `stop` fires.
    ///
    /// 1. Register the project tree (any failure aborts).
    /// 2. Start consuming notifications in the background.
    /// 3. Run the executor's `run`, racing it against the stop signal.
    /// 4. Wait for the stop signal, then wind the loop down.
    pub async fn run(mut self, source: NotificationSource, stop: StopSignal) -> Result<()> {
        self.watch_loop.watcher_mut().register_tree()?;

        let shell = Arc::clone(&self.shell);
        let mut app_stop = stop.clone();
        let handle = tokio::spawn(self.watch_loop.run(source, stop));

        info!("waiting for file changes ...");
        tokio::select! {
            res = shell.run() => {
                if let Err(err) = res {
                    error!(error = %err, "application failed to start");
                    handle.abort();
                    return Err(err);
                }
            }
            _ = app_stop.wait() => {}
        }

        app_stop.wait().await;
        handle
            .await
            .map_err(|e| anyhow!("watch loop terminated abnormally: {e}"))?;
        Ok(())
    }
}
