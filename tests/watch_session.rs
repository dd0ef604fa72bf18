// tests/watch_session.rs

mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::time::{timeout, Duration};

use common::{init_tracing, session_context, with_timeout, TestResult};
use devwatch::engine::{
    stop_channel, ConfigReloader, DebounceScheduler, SessionContext, WatchLoop, WatchSession,
};
use devwatch::errors::DevwatchError;
use devwatch::fs::mock::MockFileSystem;
use devwatch::types::{full_rebuild_tasks, Task, TaskKind};
use devwatch::watch::{
    notification_channel, DirectoryWatcher, EventClassifier, FsEvent, PathFilter,
};
use devwatch_test_utils::builders::ProjectConfigBuilder;
use devwatch_test_utils::fake_registry::RecordingRegistry;
use devwatch_test_utils::fake_shell::FakeAppShell;

fn project_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("./project.toml", "[package]\nname = \"app\"\n");
    fs.add_file("./main.go", "package main");
    fs.add_file("./foo/bar.go", "package foo");
    fs.add_file("./foo/baz.go", "package foo");
    fs.add_file("./foo/bar_test.go", "package foo");
    fs.add_file("./node_modules/x/index.js", "");
    fs
}

fn context(fs: &MockFileSystem, debounce: Duration) -> SessionContext {
    let config = ProjectConfigBuilder::new().package("app").build();
    let mut ctx = session_context(".", config, Arc::new(fs.clone()), None);
    ctx.options.debounce = debounce;
    ctx
}

/// The loop a session would build, exposed so tests can drive it event by
/// event.
fn watch_loop(
    ctx: &SessionContext,
    registry: RecordingRegistry,
    shell: Arc<FakeAppShell>,
) -> WatchLoop<RecordingRegistry> {
    let filter = Arc::new(PathFilter::new(&ctx.options.ignore));
    let watcher = DirectoryWatcher::new(
        ctx.root.clone(),
        registry,
        Arc::clone(&filter),
        Arc::clone(&ctx.fs),
    );
    let classifier = EventClassifier::new(
        ctx.root.clone(),
        filter,
        Arc::clone(&ctx.fs),
        ctx.config.clone(),
        ctx.options.classifier.clone(),
    );
    let reloader = ConfigReloader::new(
        ctx.root.join(&ctx.options.classifier.config_file),
        Arc::clone(&ctx.fs),
        ctx.config.clone(),
        ctx.resolver.clone(),
        Arc::clone(&ctx.queue),
    );
    let scheduler = DebounceScheduler::new(Arc::clone(&ctx.queue), shell);
    WatchLoop::new(watcher, classifier, reloader, scheduler, ctx.options.debounce)
}

#[tokio::test]
async fn burst_of_events_becomes_one_ordered_batch() -> TestResult {
    init_tracing();
    let fs = project_fs();
    let ctx = context(&fs, Duration::from_secs(60));
    let (shell, _batches) = FakeAppShell::new();
    let mut wl = watch_loop(&ctx, RecordingRegistry::new(), shell.clone());

    for _ in 0..3 {
        wl.handle_event(FsEvent::written("./foo/bar.go")).await;
    }
    wl.handle_event(FsEvent::written("./main.go")).await;

    assert_eq!(wl.scheduler().tick().await, 4);
    assert_eq!(
        shell.batches(),
        vec![vec![
            Task::new(TaskKind::BuildBinary, "foo"),
            Task::new(TaskKind::BuildBinary, "."),
            Task::new(TaskKind::BinaryTest, "foo"),
            Task::new(TaskKind::BinaryTest, "."),
        ]]
    );

    // Nothing pending: the next tick is silent.
    assert_eq!(wl.scheduler().tick().await, 0);
    assert_eq!(shell.batches().len(), 1);
    Ok(())
}

#[tokio::test]
async fn directories_are_tracked_as_they_come_and_go() -> TestResult {
    let fs = project_fs();
    let ctx = context(&fs, Duration::from_secs(60));
    let registry = RecordingRegistry::new();
    let (shell, _batches) = FakeAppShell::new();
    let mut wl = watch_loop(&ctx, registry.clone(), shell.clone());
    wl.watcher_mut().register_tree()?;

    assert!(wl.watcher().is_watched(Path::new(".")));
    assert!(wl.watcher().is_watched(Path::new("./foo")));
    assert!(!wl.watcher().is_watched(Path::new("./node_modules")));

    fs.add_dir("./newpkg");
    wl.handle_event(FsEvent::created("./newpkg")).await;
    assert!(wl.watcher().is_watched(Path::new("./newpkg")));

    fs.add_dir("./node_modules/left-pad");
    wl.handle_event(FsEvent::created("./node_modules/left-pad")).await;
    assert!(!registry
        .watched()
        .iter()
        .any(|p| p.starts_with("./node_modules")));

    fs.remove("./newpkg");
    wl.handle_event(FsEvent::removed("./newpkg")).await;
    assert!(!wl.watcher().is_watched(Path::new("./newpkg")));
    assert_eq!(registry.unwatched(), vec![PathBuf::from("./newpkg")]);

    // Directory bookkeeping never schedules work.
    assert!(ctx.queue.is_empty());
    Ok(())
}

#[tokio::test]
async fn project_file_change_queues_full_rebuild() -> TestResult {
    let fs = project_fs();
    let ctx = context(&fs, Duration::from_secs(60));
    let (shell, _batches) = FakeAppShell::new();
    let mut wl = watch_loop(&ctx, RecordingRegistry::new(), shell.clone());

    fs.add_file("./project.toml", "[package]\nname = \"renamed\"\n");
    wl.handle_event(FsEvent::written("./project.toml")).await;

    assert_eq!(ctx.queue.snapshot(), full_rebuild_tasks());
    assert_eq!(
        ctx.config.read().package.as_ref().map(|p| p.name.clone()),
        Some("renamed".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn pending_tasks_are_dropped_when_notifications_end() -> TestResult {
    let fs = project_fs();
    let ctx = context(&fs, Duration::from_secs(60));
    let (shell, _batches) = FakeAppShell::new();
    let wl = watch_loop(&ctx, RecordingRegistry::new(), shell.clone());
    let (sink, source) = notification_channel();
    let (_stop_handle, stop) = stop_channel();

    sink.events.send(FsEvent::written("./foo/baz.go"))?;
    drop(sink);

    timeout(Duration::from_secs(3), wl.run(source, stop)).await?;

    assert!(ctx.queue.is_empty());
    assert!(shell.batches().is_empty());
    Ok(())
}

#[tokio::test]
async fn session_builds_watches_and_dispatches_until_stopped() -> TestResult {
    init_tracing();
    let fs = project_fs();
    let ctx = context(&fs, Duration::from_millis(200));
    let registry = RecordingRegistry::new();
    let (shell, mut batches) = FakeAppShell::new();
    let (sink, source) = notification_channel();
    let (stop_handle, stop) = stop_channel();

    let session = WatchSession::new(ctx, registry.clone(), shell.clone());
    let handle = tokio::spawn(session.run(source, stop));

    // A backend error is reported but doesn't end the session.
    sink.errors.send(notify::Error::generic("queue overflow"))?;
    for path in [
        "./foo/bar.go",
        "./foo/bar.go",
        "./foo/baz.go",
        "./node_modules/x/index.js",
    ] {
        sink.events.send(FsEvent::written(path))?;
    }

    let batch = with_timeout(batches.recv())
        .await
        .ok_or("fake shell dropped")?;
    assert_eq!(
        batch,
        vec![
            Task::new(TaskKind::BuildBinary, "foo"),
            Task::new(TaskKind::BinaryTest, "foo"),
        ]
    );
    assert_eq!(shell.run_count(), 1);
    assert!(registry.watched().contains(&PathBuf::from(".")));

    stop_handle.stop();
    let result = timeout(Duration::from_secs(3), handle).await??;
    result?;

    assert_eq!(shell.batches().len(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_initial_build_ends_the_session() -> TestResult {
    init_tracing();
    let fs = project_fs();
    let ctx = context(&fs, Duration::from_millis(50));
    let (shell, _batches) = FakeAppShell::failing_run("build_binary");
    let (_sink, source) = notification_channel();
    let (_stop_handle, stop) = stop_channel();

    let session = WatchSession::new(ctx, RecordingRegistry::new(), shell.clone());
    let result = timeout(Duration::from_secs(3), session.run(source, stop)).await?;

    match result {
        Err(DevwatchError::BuildFailed(task)) => assert_eq!(task, "build_binary"),
        other => panic!("expected BuildFailed, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn registration_failure_aborts_before_building() -> TestResult {
    let fs = project_fs();
    let ctx = context(&fs, Duration::from_millis(50));
    let (shell, _batches) = FakeAppShell::new();
    let (_sink, source) = notification_channel();
    let (_stop_handle, stop) = stop_channel();

    let registry = RecordingRegistry::failing_on("./foo");
    let session = WatchSession::new(ctx, registry, shell.clone());
    let result = timeout(Duration::from_secs(3), session.run(source, stop)).await?;

    assert!(matches!(result, Err(DevwatchError::WatchError(_))));
    assert_eq!(shell.run_count(), 0);
    Ok(())
}

#[tokio::test]
async fn stop_before_any_change_dispatches_nothing() -> TestResult {
    let fs = project_fs();
    let ctx = context(&fs, Duration::from_millis(20));
    let (shell, _batches) = FakeAppShell::new();
    let (_sink, source) = notification_channel();
    let (stop_handle, stop) = stop_channel();

    stop_handle.stop();
    let session = WatchSession::new(ctx, RecordingRegistry::new(), shell.clone());
    timeout(Duration::from_secs(3), session.run(source, stop)).await??;

    assert!(shell.batches().is_empty());
    Ok(())
}
