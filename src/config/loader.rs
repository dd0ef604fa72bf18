use std::path::Path;

use crate::config::model::ProjectConfig;
use crate::config::validate::validate_config;
use crate::errors::Result;
use crate::fs::FileSystem;

/// Name of the project file, relative to the project root.
pub const DEFAULT_CONFIG_FILE: &str = "project.toml";

/// Parse TOML text into a validated [`ProjectConfig`].
pub fn parse_config(contents: &str) -> Result<ProjectConfig> {
    let config: ProjectConfig = toml::from_str(contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load a project file through `fs` and validate it.
///
/// This is what the reloader uses; the read goes through the filesystem
/// abstraction so reloads can be tested in memory.
pub fn load_with(fs: &dyn FileSystem, path: &Path) -> Result<ProjectConfig> {
    let contents = fs.read_to_string(path)?;
    parse_config(&contents)
}

/// Load a project file from disk and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectConfig> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    parse_config(&contents)
}
