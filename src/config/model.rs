use serde::Deserialize;

/// Top-level project configuration as read from `project.toml`.
///
/// ```toml
/// [package]
/// name = "app"
/// dependencies = ["github.com/gorilla/mux"]
/// omit_tests = ["models/slow_test.go"]
///
/// [assets]
/// dependencies = ["react"]
/// styles = "stylus assets/stylesheets -o public/stylesheets"
///
/// [distribution]
/// pack_extras = ["templates"]
/// ```
///
/// Every section is optional. A missing `[package]` or `[assets]` section
/// disables dependency resolution for that ecosystem.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub package: Option<PackageConfig>,

    #[serde(default)]
    pub assets: Option<AssetsConfig>,

    #[serde(default)]
    pub distribution: Option<DistributionConfig>,
}

/// `[package]` section: the Go side of the project.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PackageConfig {
    /// Name of the produced binary.
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub authors: Vec<String>,

    /// Go import paths fetched with `go get`.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Root-relative test files that never count as "this module has tests".
    ///
    /// Matched by exact path string, not as patterns.
    #[serde(default)]
    pub omit_tests: Vec<String>,

    /// Extra flags for `go build`.
    #[serde(default)]
    pub build_opts: Vec<String>,
}

/// `[assets]` section: the front-end pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetsConfig {
    /// Root-relative directory holding images, stylesheets and scripts.
    #[serde(default = "default_assets_directory")]
    pub directory: String,

    /// npm packages required by the front-end.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// npm packages the pipeline itself needs (bundlers, transforms).
    ///
    /// Only resolved when `dependencies` is non-empty.
    #[serde(default = "default_asset_toolchain")]
    pub toolchain: Vec<String>,

    /// Shell command rebuilding images/sprites.
    #[serde(default)]
    pub images: Option<String>,

    /// Shell command rebuilding stylesheets.
    #[serde(default)]
    pub styles: Option<String>,

    /// Shell command rebuilding scripts.
    #[serde(default)]
    pub javascripts: Option<String>,
}

fn default_assets_directory() -> String {
    "assets".to_string()
}

fn default_asset_toolchain() -> Vec<String> {
    ["browserify", "coffeeify", "envify", "uglifyify", "babelify", "nib", "stylus"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            directory: default_assets_directory(),
            dependencies: Vec::new(),
            toolchain: default_asset_toolchain(),
            images: None,
            styles: None,
            javascripts: None,
        }
    }
}

/// `[distribution]` section.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DistributionConfig {
    /// Extra root-relative paths shipped next to the binary.
    #[serde(default)]
    pub pack_extras: Vec<String>,
}

impl ProjectConfig {
    pub fn package_dependencies(&self) -> Vec<String> {
        self.package
            .as_ref()
            .map(|p| p.dependencies.clone())
            .unwrap_or_default()
    }

    pub fn omit_tests(&self) -> Vec<String> {
        self.package
            .as_ref()
            .map(|p| p.omit_tests.clone())
            .unwrap_or_default()
    }

    /// Asset dependencies followed by the toolchain, or nothing when no
    /// asset dependency is declared.
    pub fn asset_dependencies(&self) -> Vec<String> {
        match &self.assets {
            Some(assets) if !assets.dependencies.is_empty() => {
                let mut deps = assets.dependencies.clone();
                for tool in &assets.toolchain {
                    if !deps.contains(tool) {
                        deps.push(tool.clone());
                    }
                }
                deps
            }
            _ => Vec::new(),
        }
    }

    pub fn assets_directory(&self) -> Option<&str> {
        self.assets.as_ref().map(|a| a.directory.as_str())
    }

    /// Replace every reloadable section with the ones from `fresh`.
    pub fn replace_sections(&mut self, fresh: ProjectConfig) {
        self.package = fresh.package;
        self.assets = fresh.assets;
        self.distribution = fresh.distribution;
    }
}
