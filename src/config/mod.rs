// src/config/mod.rs

//! Project configuration for devwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a project file from disk or through a [`crate::fs::FileSystem`]
//!   (`loader.rs`).
//! - Validate what serde can't (`validate.rs`).
//!
//! The live configuration is shared as a [`SharedConfig`]: readers take the
//! read lock just long enough to copy what they need, and only the config
//! reloader takes the write lock.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, PoisonError};

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_with, parse_config, DEFAULT_CONFIG_FILE};
pub use model::{AssetsConfig, DistributionConfig, PackageConfig, ProjectConfig};
pub use validate::validate_config;

/// Configuration shared between the watch loop, the reloader, the
/// dependency resolver and the executor.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<ProjectConfig>>,
}

impl SharedConfig {
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, ProjectConfig> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, ProjectConfig> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current configuration.
    pub fn snapshot(&self) -> ProjectConfig {
        self.read().clone()
    }
}
