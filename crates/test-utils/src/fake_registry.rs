use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use devwatch::errors::{DevwatchError, Result};
use devwatch::watch::WatchRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    Watch(PathBuf),
    Unwatch(PathBuf),
}

/// A [`WatchRegistry`] that only records what it was asked to do.
///
/// Clones share the same log, so a test can keep one handle while the
/// watcher owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingRegistry {
    calls: Arc<Mutex<Vec<RegistryCall>>>,
    fail_on: Option<PathBuf>,
    unwatch_error: Option<fn() -> notify::Error>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering `path` fails; everything else succeeds.
    pub fn failing_on(path: impl Into<PathBuf>) -> Self {
        Self {
            fail_on: Some(path.into()),
            ..Self::default()
        }
    }

    /// Every deregistration is recorded, then fails with `error()`.
    pub fn unwatch_fails_with(error: fn() -> notify::Error) -> Self {
        Self {
            unwatch_error: Some(error),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn watched(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RegistryCall::Watch(p) => Some(p),
                RegistryCall::Unwatch(_) => None,
            })
            .collect()
    }

    pub fn unwatched(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RegistryCall::Unwatch(p) => Some(p),
                RegistryCall::Watch(_) => None,
            })
            .collect()
    }
}

impl WatchRegistry for RecordingRegistry {
    fn watch(&mut self, dir: &Path) -> Result<()> {
        if self.fail_on.as_deref() == Some(dir) {
            return Err(DevwatchError::WatchError(notify::Error::generic(
                "registration refused",
            )));
        }
        self.calls
            .lock()
            .unwrap()
            .push(RegistryCall::Watch(dir.to_path_buf()));
        Ok(())
    }

    fn unwatch(&mut self, dir: &Path) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(RegistryCall::Unwatch(dir.to_path_buf()));
        match self.unwatch_error {
            Some(error) => Err(DevwatchError::WatchError(error())),
            None => Ok(()),
        }
    }
}
