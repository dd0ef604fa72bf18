// src/watch/classifier.rs

//! Turns raw filesystem events into watch actions.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::SharedConfig;
use crate::fs::{walk_files, FileSystem};
use crate::types::{Task, TaskKind};
use crate::watch::event::{FsEvent, FsEventKind};
use crate::watch::filter::PathFilter;
use crate::watch::path_utils::{clean_path, parent_dir, relative_str};

/// What the watch loop should do about one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchAction {
    RegisterDirectory(PathBuf),
    DeregisterDirectory(PathBuf),
    Enqueue(Task),
    ReloadConfig,
}

/// Front-end file categories. Writes to these are recognised but don't
/// schedule anything yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Style,
    Script,
}

impl AssetKind {
    pub fn from_path(rel: &str) -> Option<Self> {
        let ext = Path::new(rel).extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" => Some(AssetKind::Image),
            "css" | "styl" | "less" | "scss" | "sass" => Some(AssetKind::Style),
            "js" | "jsx" | "coffee" | "ts" | "tsx" => Some(AssetKind::Script),
            _ => None,
        }
    }
}

/// Knobs for classification that are fixed for the whole session.
#[derive(Debug, Clone)]
pub struct ClassifierOptions {
    /// Root-relative name of the project file.
    pub config_file: String,
    /// Suffix of compiled source files.
    pub source_suffix: String,
    /// Suffix of compiled test files.
    pub test_suffix: String,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            config_file: crate::config::DEFAULT_CONFIG_FILE.to_string(),
            source_suffix: ".go".to_string(),
            test_suffix: "_test.go".to_string(),
        }
    }
}

/// Maps filesystem events onto [`WatchAction`]s.
///
/// Rules, first match wins:
/// 1. empty or ignored path: nothing
/// 2. directory created: register it
/// 3. watched directory removed: deregister it
/// 4. project file written: reload configuration
/// 5. Go source written: rebuild (and re-test) its module
/// 6. anything else: nothing
#[derive(Debug, Clone)]
pub struct EventClassifier {
    root: PathBuf,
    filter: Arc<PathFilter>,
    fs: Arc<dyn FileSystem>,
    config: SharedConfig,
    options: ClassifierOptions,
}

impl EventClassifier {
    pub fn new(
        root: impl Into<PathBuf>,
        filter: Arc<PathFilter>,
        fs: Arc<dyn FileSystem>,
        config: SharedConfig,
        options: ClassifierOptions,
    ) -> Self {
        Self {
            root: root.into(),
            filter,
            fs,
            config,
            options,
        }
    }

    /// Classify one event. `watched` is the current set of observed
    /// directories.
    pub fn classify(&self, event: &FsEvent, watched: &BTreeSet<PathBuf>) -> Vec<WatchAction> {
        if event.path.as_os_str().is_empty() {
            return Vec::new();
        }
        let Some(rel) = relative_str(self.fs.as_ref(), &self.root, &event.path) else {
            debug!(path = %event.path.display(), "event outside project root");
            return Vec::new();
        };
        let rel = clean_path(&rel);
        if rel == "." || self.filter.is_ignored(&rel) {
            return Vec::new();
        }

        let abs = self.root.join(&rel);
        match event.kind {
            FsEventKind::Created => {
                if self.fs.is_dir(&abs) {
                    return vec![WatchAction::RegisterDirectory(abs)];
                }
                Vec::new()
            }
            FsEventKind::Removed => {
                if watched.contains(&abs) {
                    if self.is_asset_path(&rel) {
                        debug!(path = %rel, "asset directory removed; asset rebuild not scheduled");
                    }
                    return vec![WatchAction::DeregisterDirectory(abs)];
                }
                debug!(path = %rel, "file removed; nothing scheduled");
                Vec::new()
            }
            FsEventKind::Written => self.classify_write(&rel),
        }
    }

    fn classify_write(&self, rel: &str) -> Vec<WatchAction> {
        if rel == self.options.config_file {
            return vec![WatchAction::ReloadConfig];
        }

        if rel.ends_with(&self.options.source_suffix) {
            let module = parent_dir(rel);
            let mut actions = Vec::with_capacity(2);
            if self.has_tests(&module) {
                actions.push(WatchAction::Enqueue(Task::new(TaskKind::BinaryTest, module.clone())));
            }
            actions.push(WatchAction::Enqueue(Task::new(TaskKind::BuildBinary, module)));
            return actions;
        }

        if let Some(kind) = AssetKind::from_path(rel) {
            debug!(path = %rel, ?kind, "asset changed; asset rebuild not scheduled");
        }
        Vec::new()
    }

    fn is_asset_path(&self, rel: &str) -> bool {
        let config = self.config.read();
        config.assets_directory().is_some_and(|dir| {
            let dir = clean_path(dir);
            rel == dir || rel.starts_with(&format!("{dir}/"))
        })
    }

    /// Whether `module` (root-relative) contains, at any depth, a test file
    /// that isn't listed in `package.omit_tests`.
    ///
    /// Omitted paths are compared as exact strings against the root-relative
    /// path of each test file.
    pub fn has_tests(&self, module: &str) -> bool {
        let omitted: HashSet<String> = self.config.read().omit_tests().into_iter().collect();

        let dir = if module == "." {
            self.root.clone()
        } else {
            self.root.join(module)
        };
        walk_files(self.fs.as_ref(), &dir).iter().any(|file| {
            let Some(rel) = relative_str(self.fs.as_ref(), &self.root, file) else {
                return false;
            };
            rel.ends_with(&self.options.test_suffix) && !omitted.contains(&rel)
        })
    }
}
