#![allow(dead_code)]

use devwatch::config::{AssetsConfig, DistributionConfig, PackageConfig, ProjectConfig};

/// Builder for `ProjectConfig` to simplify test setup.
///
/// Sections are created on first use; the asset toolchain starts empty so
/// tests only see the dependencies they declare.
pub struct ProjectConfigBuilder {
    config: ProjectConfig,
}

impl ProjectConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ProjectConfig::default(),
        }
    }

    fn package_mut(&mut self) -> &mut PackageConfig {
        self.config.package.get_or_insert_with(|| PackageConfig {
            name: "app".to_string(),
            ..PackageConfig::default()
        })
    }

    fn assets_mut(&mut self) -> &mut AssetsConfig {
        self.config.assets.get_or_insert_with(|| AssetsConfig {
            toolchain: Vec::new(),
            ..AssetsConfig::default()
        })
    }

    pub fn package(mut self, name: &str) -> Self {
        self.package_mut().name = name.to_string();
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.package_mut().version = version.to_string();
        self
    }

    pub fn go_dependency(mut self, dep: &str) -> Self {
        self.package_mut().dependencies.push(dep.to_string());
        self
    }

    pub fn omit_test(mut self, path: &str) -> Self {
        self.package_mut().omit_tests.push(path.to_string());
        self
    }

    pub fn build_opt(mut self, opt: &str) -> Self {
        self.package_mut().build_opts.push(opt.to_string());
        self
    }

    pub fn assets_directory(mut self, dir: &str) -> Self {
        self.assets_mut().directory = dir.to_string();
        self
    }

    pub fn asset_dependency(mut self, dep: &str) -> Self {
        self.assets_mut().dependencies.push(dep.to_string());
        self
    }

    pub fn toolchain(mut self, tools: &[&str]) -> Self {
        self.assets_mut().toolchain = tools.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn styles_command(mut self, cmd: &str) -> Self {
        self.assets_mut().styles = Some(cmd.to_string());
        self
    }

    pub fn pack_extra(mut self, path: &str) -> Self {
        self.config
            .distribution
            .get_or_insert_with(DistributionConfig::default)
            .pack_extras
            .push(path.to_string());
        self
    }

    pub fn build(self) -> ProjectConfig {
        self.config
    }
}

impl Default for ProjectConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
