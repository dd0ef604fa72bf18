// tests/classifier.rs

mod common;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use devwatch::config::{ProjectConfig, SharedConfig};
use devwatch::fs::mock::MockFileSystem;
use devwatch::fs::FileSystem;
use devwatch::types::{Task, TaskKind};
use devwatch::watch::{ClassifierOptions, EventClassifier, FsEvent, PathFilter, WatchAction};
use devwatch_test_utils::builders::ProjectConfigBuilder;

fn classifier(fs: &MockFileSystem, config: ProjectConfig) -> EventClassifier {
    EventClassifier::new(
        ".",
        Arc::new(PathFilter::default()),
        Arc::new(fs.clone()),
        SharedConfig::new(config),
        ClassifierOptions::default(),
    )
}

fn go_project() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("./project.toml", "[package]\nname = \"app\"\n");
    fs.add_file("./main.go", "package main");
    fs.add_file("./foo/bar.go", "package foo");
    fs.add_file("./foo/bar_test.go", "package foo");
    fs.add_file("./web/handlers.go", "package web");
    fs.add_file("./web/api/routes_test.go", "package api");
    fs.add_file("./assets/javascripts/app.js", "");
    fs
}

fn no_watched() -> BTreeSet<PathBuf> {
    BTreeSet::new()
}

#[test]
fn go_write_in_module_with_tests_enqueues_test_and_build() {
    let fs = go_project();
    let c = classifier(&fs, ProjectConfigBuilder::new().package("app").build());

    let actions = c.classify(&FsEvent::written("./foo/bar.go"), &no_watched());
    assert_eq!(
        actions,
        vec![
            WatchAction::Enqueue(Task::new(TaskKind::BinaryTest, "foo")),
            WatchAction::Enqueue(Task::new(TaskKind::BuildBinary, "foo")),
        ]
    );
}

#[test]
fn omitted_test_file_does_not_count() {
    let fs = go_project();
    let config = ProjectConfigBuilder::new()
        .package("app")
        .omit_test("foo/bar_test.go")
        .build();
    let c = classifier(&fs, config);

    let actions = c.classify(&FsEvent::written("./foo/bar.go"), &no_watched());
    assert_eq!(
        actions,
        vec![WatchAction::Enqueue(Task::new(TaskKind::BuildBinary, "foo"))]
    );
}

#[test]
fn tests_in_sub_directories_count() {
    let fs = go_project();
    let c = classifier(&fs, ProjectConfigBuilder::new().package("app").build());

    assert!(c.has_tests("web"));
    let actions = c.classify(&FsEvent::written("./web/handlers.go"), &no_watched());
    assert_eq!(actions.len(), 2);
    assert_eq!(
        actions[0],
        WatchAction::Enqueue(Task::new(TaskKind::BinaryTest, "web"))
    );
}

#[test]
fn root_package_write_targets_dot() {
    let fs = MockFileSystem::new();
    fs.add_file("./main.go", "package main");
    let c = classifier(&fs, ProjectConfig::default());

    let actions = c.classify(&FsEvent::written("./main.go"), &no_watched());
    assert_eq!(
        actions,
        vec![WatchAction::Enqueue(Task::new(TaskKind::BuildBinary, "."))]
    );
}

#[test]
fn root_module_sees_tests_anywhere_below_it() {
    let fs = go_project();
    let c = classifier(&fs, ProjectConfig::default());
    assert!(c.has_tests("."));
}

#[test]
fn project_file_write_requests_reload() {
    let fs = go_project();
    let c = classifier(&fs, ProjectConfig::default());

    let actions = c.classify(&FsEvent::written("./project.toml"), &no_watched());
    assert_eq!(actions, vec![WatchAction::ReloadConfig]);
}

#[test]
fn ignored_paths_produce_nothing() {
    let fs = go_project();
    fs.add_dir("./node_modules/react");
    let c = classifier(&fs, ProjectConfig::default());

    for event in [
        FsEvent::written("./node_modules/x.go"),
        FsEvent::written("./NODE_MODULES/x.go"),
        FsEvent::created("./node_modules/react"),
        FsEvent::written("./.git/HEAD"),
        FsEvent::written("./public/app.js"),
    ] {
        assert!(c.classify(&event, &no_watched()).is_empty(), "{event:?}");
    }
}

#[test]
fn root_itself_and_empty_paths_produce_nothing() {
    let fs = go_project();
    let c = classifier(&fs, ProjectConfig::default());

    assert!(c.classify(&FsEvent::written("."), &no_watched()).is_empty());
    assert!(c.classify(&FsEvent::written(""), &no_watched()).is_empty());
}

#[test]
fn created_directory_is_registered_created_file_is_not() {
    let fs = go_project();
    fs.add_dir("./newdir");
    let c = classifier(&fs, ProjectConfig::default());

    assert_eq!(
        c.classify(&FsEvent::created("./newdir"), &no_watched()),
        vec![WatchAction::RegisterDirectory(PathBuf::from("./newdir"))]
    );
    assert!(c.classify(&FsEvent::created("./foo/bar.go"), &no_watched()).is_empty());
}

#[test]
fn removed_watched_directory_is_deregistered() {
    let fs = go_project();
    let c = classifier(&fs, ProjectConfig::default());
    let watched: BTreeSet<PathBuf> = [PathBuf::from("."), PathBuf::from("./gone")]
        .into_iter()
        .collect();

    assert_eq!(
        c.classify(&FsEvent::removed("./gone"), &watched),
        vec![WatchAction::DeregisterDirectory(PathBuf::from("./gone"))]
    );
    // A removed file was never watched.
    assert!(c.classify(&FsEvent::removed("./foo/old.go"), &watched).is_empty());
}

#[test]
fn asset_changes_schedule_nothing() {
    let fs = go_project();
    let config = ProjectConfigBuilder::new()
        .asset_dependency("react")
        .styles_command("stylus assets/stylesheets")
        .build();
    let c = classifier(&fs, config);

    for event in [
        FsEvent::written("./assets/javascripts/app.js"),
        FsEvent::written("./assets/stylesheets/site.styl"),
        FsEvent::removed("./assets/images/logo.png"),
    ] {
        assert!(c.classify(&event, &no_watched()).is_empty(), "{event:?}");
    }
}

#[test]
fn unrelated_files_schedule_nothing() {
    let fs = go_project();
    let c = classifier(&fs, ProjectConfig::default());

    assert!(c.classify(&FsEvent::written("./README.md"), &no_watched()).is_empty());
    assert!(c.classify(&FsEvent::written("./foo/notes.txt"), &no_watched()).is_empty());
}

#[test]
fn omit_list_follows_config_updates() {
    let fs = go_project();
    let config = SharedConfig::new(ProjectConfig::default());
    let c = EventClassifier::new(
        ".",
        Arc::new(PathFilter::default()),
        Arc::new(fs.clone()),
        config.clone(),
        ClassifierOptions::default(),
    );
    assert!(c.has_tests("foo"));

    config.write().replace_sections(
        ProjectConfigBuilder::new()
            .package("app")
            .omit_test("foo/bar_test.go")
            .build(),
    );
    assert!(!c.has_tests("foo"));
}

/// Mock tree also reachable through a symlink-like alias at `/link`.
#[derive(Debug)]
struct AliasedFs(MockFileSystem);

impl FileSystem for AliasedFs {
    fn read_to_string(&self, path: &Path) -> anyhow::Result<String> {
        self.0.read_to_string(path)
    }
    fn exists(&self, path: &Path) -> bool {
        self.0.exists(path)
    }
    fn is_file(&self, path: &Path) -> bool {
        self.0.is_file(path)
    }
    fn is_dir(&self, path: &Path) -> bool {
        self.0.is_dir(path)
    }
    fn canonicalize(&self, path: &Path) -> anyhow::Result<PathBuf> {
        match path.strip_prefix("/link") {
            Ok(rel) => Ok(Path::new(".").join(rel)),
            Err(_) => self.0.canonicalize(path),
        }
    }
    fn read_dir(&self, path: &Path) -> anyhow::Result<Vec<PathBuf>> {
        self.0.read_dir(path)
    }
}

#[test]
fn aliased_event_paths_resolve_through_the_filesystem() {
    let c = EventClassifier::new(
        ".",
        Arc::new(PathFilter::default()),
        Arc::new(AliasedFs(go_project())),
        SharedConfig::new(ProjectConfigBuilder::new().package("app").build()),
        ClassifierOptions::default(),
    );

    assert_eq!(
        c.classify(&FsEvent::written("/link/foo/bar.go"), &no_watched()),
        vec![
            WatchAction::Enqueue(Task::new(TaskKind::BinaryTest, "foo")),
            WatchAction::Enqueue(Task::new(TaskKind::BuildBinary, "foo")),
        ]
    );
    assert!(c.classify(&FsEvent::written("/elsewhere/foo/bar.go"), &no_watched()).is_empty());
}
