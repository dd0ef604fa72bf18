use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};

use crate::config::{load_with, SharedConfig};
use crate::deps::DependencyResolver;
use crate::engine::queue::TaskQueue;
use crate::fs::FileSystem;
use crate::types::full_rebuild_tasks;

/// Result of one reload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The new file didn't parse or validate; the old configuration stays.
    Rejected,
    /// The configuration was swapped but dependency resolution failed; no
    /// rebuild was scheduled.
    DependenciesFailed,
    /// Swapped, dependencies resolved, full rebuild queued.
    Reloaded,
}

/// Re-reads the project file after it changes on disk.
///
/// A bad file never replaces a good configuration, and no failure here ends
/// the watch session.
#[derive(Debug, Clone)]
pub struct ConfigReloader {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
    config: SharedConfig,
    resolver: DependencyResolver,
    queue: Arc<TaskQueue>,
}

impl ConfigReloader {
    pub fn new(
        path: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        config: SharedConfig,
        resolver: DependencyResolver,
        queue: Arc<TaskQueue>,
    ) -> Self {
        Self {
            path: path.into(),
            fs,
            config,
            resolver,
            queue,
        }
    }

    pub async fn reload(&self) -> ReloadOutcome {
        info!(path = %self.path.display(), "reloading project file");

        let fresh = match load_with(self.fs.as_ref(), &self.path) {
            Ok(cfg) => cfg,
            Err(err) => {
                error!(
                    path = %self.path.display(),
                    error = %err,
                    "project file changed but is invalid; keeping the previous configuration"
                );
                info!("waiting for file changes ...");
                return ReloadOutcome::Rejected;
            }
        };

        self.config.write().replace_sections(fresh);
        info!("loaded the new project file; updating dependencies");

        if let Err(err) = self.resolver.ensure_all().await {
            error!(error = %err, "failed to update project dependencies after reload");
            return ReloadOutcome::DependenciesFailed;
        }

        for task in full_rebuild_tasks() {
            self.queue.add(task);
        }
        ReloadOutcome::Reloaded
    }
}
