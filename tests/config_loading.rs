// tests/config_loading.rs

mod common;

use std::io::Write;

use tempfile::NamedTempFile;

use common::TestResult;
use devwatch::config::{load_and_validate, load_with, parse_config};
use devwatch::fs::mock::MockFileSystem;
use std::path::Path;

#[test]
fn full_project_file_parses() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[package]
name = "app"
version = "0.3.0"
authors = ["dev <dev@example.com>"]
dependencies = ["github.com/gorilla/mux", "github.com/lib/pq"]
omit_tests = ["models/slow_test.go"]
build_opts = ["-race"]

[assets]
directory = "frontend"
dependencies = ["react"]
styles = "stylus frontend/styles -o public/css"

[distribution]
pack_extras = ["templates", "public"]
"#
    )?;

    let cfg = load_and_validate(file.path())?;

    let package = cfg.package.as_ref().ok_or("missing [package]")?;
    assert_eq!(package.name, "app");
    assert_eq!(package.build_opts, vec!["-race"]);
    assert_eq!(cfg.omit_tests(), vec!["models/slow_test.go"]);
    assert_eq!(cfg.assets_directory(), Some("frontend"));
    assert_eq!(
        cfg.assets.as_ref().and_then(|a| a.styles.as_deref()),
        Some("stylus frontend/styles -o public/css")
    );

    let dist = cfg.distribution.as_ref().ok_or("missing [distribution]")?;
    assert_eq!(dist.pack_extras, vec!["templates", "public"]);
    Ok(())
}

#[test]
fn every_section_is_optional() -> TestResult {
    let cfg = parse_config("")?;
    assert!(cfg.package.is_none());
    assert!(cfg.assets.is_none());
    assert!(cfg.distribution.is_none());
    assert!(cfg.package_dependencies().is_empty());
    assert!(cfg.asset_dependencies().is_empty());
    Ok(())
}

#[test]
fn asset_defaults_apply() -> TestResult {
    let cfg = parse_config("[assets]\ndependencies = [\"react\"]\n")?;

    assert_eq!(cfg.assets_directory(), Some("assets"));
    let deps = cfg.asset_dependencies();
    assert_eq!(deps.first().map(String::as_str), Some("react"));
    for tool in ["browserify", "stylus", "nib"] {
        assert!(deps.iter().any(|d| d == tool), "{tool} missing");
    }
    Ok(())
}

#[test]
fn toolchain_is_not_duplicated() -> TestResult {
    let cfg = parse_config(
        "[assets]\ndependencies = [\"stylus\", \"react\"]\ntoolchain = [\"stylus\", \"nib\"]\n",
    )?;
    assert_eq!(cfg.asset_dependencies(), vec!["stylus", "react", "nib"]);
    Ok(())
}

#[test]
fn load_with_reads_through_the_filesystem() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("./project.toml", "[package]\nname = \"mock\"\n");

    let cfg = load_with(&fs, Path::new("./project.toml"))?;
    assert_eq!(cfg.package.map(|p| p.name), Some("mock".to_string()));
    Ok(())
}
