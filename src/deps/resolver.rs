use std::sync::Arc;

use tracing::{error, info};

use crate::config::{ProjectConfig, SharedConfig};
use crate::deps::process::{CommandSpec, ProcessRunner};
use crate::errors::{DevwatchError, Result};

/// A package ecosystem the project depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ecosystem {
    /// Go packages from `[package].dependencies`.
    Go,
    /// npm packages from `[assets].dependencies` plus the asset toolchain.
    Npm,
}

impl Ecosystem {
    pub fn name(self) -> &'static str {
        match self {
            Ecosystem::Go => "go",
            Ecosystem::Npm => "npm",
        }
    }

    /// Read-only "is it already there" check.
    pub fn check_command(self, dep: &str) -> CommandSpec {
        match self {
            Ecosystem::Go => CommandSpec::new("go", ["list", dep]),
            Ecosystem::Npm => CommandSpec::new("npm", ["list", "--depth", "0", dep]),
        }
    }

    pub fn install_command(self, dep: &str) -> CommandSpec {
        match self {
            Ecosystem::Go => CommandSpec::new("go", ["get", dep]),
            Ecosystem::Npm => CommandSpec::new("npm", ["install", dep]),
        }
    }

    fn declared(self, config: &ProjectConfig) -> Vec<String> {
        match self {
            Ecosystem::Go => config.package_dependencies(),
            Ecosystem::Npm => config.asset_dependencies(),
        }
    }
}

/// Makes sure every declared dependency is installed.
///
/// For each dependency a check runs first; only a failed check leads to an
/// install. The first failed install aborts the ecosystem. The configuration
/// lock is held only while copying the dependency list.
#[derive(Clone)]
pub struct DependencyResolver {
    config: SharedConfig,
    runner: Arc<dyn ProcessRunner>,
}

impl std::fmt::Debug for DependencyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyResolver").finish_non_exhaustive()
    }
}

impl DependencyResolver {
    pub fn new(config: SharedConfig, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    /// Resolve Go packages, then npm packages.
    pub async fn ensure_all(&self) -> Result<()> {
        self.ensure(Ecosystem::Go).await?;
        self.ensure(Ecosystem::Npm).await?;
        Ok(())
    }

    /// Resolve one ecosystem. A no-op without declared dependencies.
    pub async fn ensure(&self, ecosystem: Ecosystem) -> Result<()> {
        let deps = ecosystem.declared(&self.config.read());
        if deps.is_empty() {
            return Ok(());
        }

        info!(ecosystem = ecosystem.name(), count = deps.len(), "checking dependencies");
        for dep in &deps {
            if self.runner.check(&ecosystem.check_command(dep)).await {
                info!(ecosystem = ecosystem.name(), dependency = %dep, "dependency present");
                continue;
            }

            let install = ecosystem.install_command(dep);
            info!(ecosystem = ecosystem.name(), dependency = %dep, command = %install, "installing dependency");
            if let Err(err) = self.runner.install(&install).await {
                error!(
                    ecosystem = ecosystem.name(),
                    dependency = %dep,
                    error = %err,
                    "dependency install failed"
                );
                return Err(DevwatchError::DependencyInstall {
                    ecosystem: ecosystem.name(),
                    dependency: dep.clone(),
                    reason: format!("{err:#}"),
                });
            }
        }

        info!(
            ecosystem = ecosystem.name(),
            dependencies = %deps.join(", "),
            "dependencies loaded"
        );
        Ok(())
    }
}
