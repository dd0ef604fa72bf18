// src/exec/dist.rs

//! Packing a built project into `dist/`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::config::ProjectConfig;
use crate::errors::{DevwatchError, Result};
use crate::fs::{walk_files, FileSystem, RealFileSystem};

/// Directory under the project root that receives packed builds.
pub const DIST_DIR: &str = "dist";

/// Copy the built binary and every `[distribution].pack_extras` entry into
/// `dist/<name>-<version>` (or `dist/<name>` without a version).
///
/// An existing package directory is replaced. Returns the package directory.
pub fn pack(root: &Path, config: &ProjectConfig) -> Result<PathBuf> {
    let Some(package) = &config.package else {
        return Err(DevwatchError::ConfigError(
            "packing needs a [package] section".to_string(),
        ));
    };

    let dir_name = if package.version.trim().is_empty() {
        package.name.clone()
    } else {
        format!("{}-{}", package.name, package.version)
    };
    let dest = root.join(DIST_DIR).join(dir_name);

    let binary = root.join(&package.name);
    if !binary.is_file() {
        return Err(DevwatchError::ConfigError(format!(
            "binary {:?} not found; build it before packing",
            binary
        )));
    }

    if dest.exists() {
        fs::remove_dir_all(&dest).with_context(|| format!("clearing {:?}", dest))?;
    }
    fs::create_dir_all(&dest).with_context(|| format!("creating {:?}", dest))?;
    copy_file(&binary, &dest.join(&package.name))?;

    let extras = config
        .distribution
        .as_ref()
        .map(|d| d.pack_extras.as_slice())
        .unwrap_or_default();
    for extra in extras {
        copy_extra(root, extra, &dest)?;
    }

    info!(path = %dest.display(), extras = extras.len(), "package ready");
    Ok(dest)
}

fn copy_extra(root: &Path, extra: &str, dest: &Path) -> Result<()> {
    let source = root.join(extra);
    let fs = RealFileSystem;

    if fs.is_file(&source) {
        return copy_file(&source, &dest.join(extra));
    }
    if !fs.is_dir(&source) {
        return Err(DevwatchError::ConfigError(format!(
            "[distribution].pack_extras entry '{extra}' does not exist"
        )));
    }

    for file in walk_files(&fs, &source) {
        let Ok(rel) = file.strip_prefix(root) else {
            continue;
        };
        copy_file(&file, &dest.join(rel))?;
    }
    Ok(())
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    fs::copy(from, to).with_context(|| format!("copying {:?} to {:?}", from, to))?;
    debug!(from = %from.display(), to = %to.display(), "packed");
    Ok(())
}
