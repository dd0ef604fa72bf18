use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::errors::{DevwatchError, Result};
use crate::fs::FileSystem;
use crate::watch::filter::PathFilter;
use crate::watch::path_utils::relative_str;
use crate::watch::watcher::WatchRegistry;

/// Keeps the set of observed directories in sync with the project tree.
///
/// The watched set mirrors what has been registered with the backend; it is
/// also what tells a removed path (which can no longer be stat'ed) apart from
/// a removed file.
#[derive(Debug)]
pub struct DirectoryWatcher<R: WatchRegistry> {
    root: PathBuf,
    registry: R,
    filter: Arc<PathFilter>,
    fs: Arc<dyn FileSystem>,
    watched: BTreeSet<PathBuf>,
}

impl<R: WatchRegistry> DirectoryWatcher<R> {
    pub fn new(
        root: impl Into<PathBuf>,
        registry: R,
        filter: Arc<PathFilter>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            root: root.into(),
            registry,
            filter,
            fs,
            watched: BTreeSet::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn watched(&self) -> &BTreeSet<PathBuf> {
        &self.watched
    }

    pub fn is_watched(&self, dir: &Path) -> bool {
        self.watched.contains(dir)
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    fn is_ignored(&self, dir: &Path) -> bool {
        relative_str(self.fs.as_ref(), &self.root, dir)
            .is_some_and(|rel| self.filter.is_ignored(&rel))
    }

    /// Register the root and every non-ignored directory below it.
    ///
    /// The first registration failure aborts the walk. Ignored directories
    /// are not descended into; unreadable ones are skipped.
    pub fn register_tree(&mut self) -> Result<()> {
        let mut stack = vec![self.root.clone()];

        while let Some(dir) = stack.pop() {
            if self.is_ignored(&dir) {
                debug!(path = %dir.display(), "ignored directory; not watching");
                continue;
            }

            self.registry.watch(&dir)?;
            self.watched.insert(dir.clone());

            let entries = match self.fs.read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %dir.display(), error = %err, "cannot list directory; skipping");
                    continue;
                }
            };
            for entry in entries.into_iter().rev() {
                if self.fs.is_dir(&entry) {
                    stack.push(entry);
                }
            }
        }

        info!(
            root = %self.root.display(),
            directories = self.watched.len(),
            "registered project tree"
        );
        Ok(())
    }

    /// Start watching a directory that appeared after startup.
    ///
    /// Only this directory is registered; sub-directories created in the
    /// same burst arrive as their own creation events.
    pub fn on_directory_created(&mut self, dir: &Path) {
        if !self.fs.is_dir(dir) {
            return;
        }
        if self.watched.contains(dir) {
            return;
        }
        match self.registry.watch(dir) {
            Ok(()) => {
                self.watched.insert(dir.to_path_buf());
            }
            Err(err) => {
                error!(
                    path = %dir.display(),
                    error = %err,
                    "failed to add new directory into watching list"
                );
            }
        }
    }

    /// Stop watching a directory that has been removed.
    pub fn on_directory_removed(&mut self, dir: &Path) {
        if self.fs.exists(dir) || !self.watched.remove(dir) {
            return;
        }
        match self.registry.unwatch(dir) {
            Ok(()) => {}
            // inotify drops the watch itself when the directory goes away.
            Err(DevwatchError::WatchError(err))
                if matches!(err.kind, notify::ErrorKind::WatchNotFound) =>
            {
                debug!(path = %dir.display(), "watch already gone with its directory");
            }
            Err(err) => {
                error!(
                    path = %dir.display(),
                    error = %err,
                    "failed to remove directory from watching list"
                );
            }
        }
    }
}
