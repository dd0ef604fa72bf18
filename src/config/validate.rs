use std::path::{Component, Path};

use crate::config::model::ProjectConfig;
use crate::errors::{DevwatchError, Result};

/// Semantic checks that TOML deserialization can't express.
pub fn validate_config(cfg: &ProjectConfig) -> Result<()> {
    validate_package(cfg)?;
    validate_assets(cfg)?;
    validate_distribution(cfg)?;
    Ok(())
}

fn validate_package(cfg: &ProjectConfig) -> Result<()> {
    let Some(package) = &cfg.package else {
        return Ok(());
    };

    if package.name.trim().is_empty() {
        return Err(DevwatchError::ConfigError(
            "[package].name must not be empty".to_string(),
        ));
    }
    ensure_named("[package].dependencies", &package.dependencies)?;

    for path in &package.omit_tests {
        if path.starts_with('/') {
            return Err(DevwatchError::ConfigError(format!(
                "[package].omit_tests entry '{path}' must be relative to the project root"
            )));
        }
    }
    Ok(())
}

fn validate_assets(cfg: &ProjectConfig) -> Result<()> {
    let Some(assets) = &cfg.assets else {
        return Ok(());
    };

    if assets.directory.trim().is_empty() {
        return Err(DevwatchError::ConfigError(
            "[assets].directory must not be empty".to_string(),
        ));
    }
    ensure_named("[assets].dependencies", &assets.dependencies)?;
    ensure_named("[assets].toolchain", &assets.toolchain)?;
    Ok(())
}

fn validate_distribution(cfg: &ProjectConfig) -> Result<()> {
    let Some(dist) = &cfg.distribution else {
        return Ok(());
    };

    for extra in &dist.pack_extras {
        let path = Path::new(extra);
        let escapes = path.components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });
        if extra.trim().is_empty() || escapes {
            return Err(DevwatchError::ConfigError(format!(
                "[distribution].pack_extras entry '{extra}' must be a path inside the project root"
            )));
        }
    }
    Ok(())
}

fn ensure_named(field: &str, deps: &[String]) -> Result<()> {
    if deps.iter().any(|d| d.trim().is_empty()) {
        return Err(DevwatchError::ConfigError(format!(
            "{field} contains an empty entry"
        )));
    }
    Ok(())
}
