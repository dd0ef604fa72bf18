#![allow(dead_code)]

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use devwatch::config::{ProjectConfig, SharedConfig};
use devwatch::deps::{DependencyResolver, ProcessRunner};
use devwatch::engine::{SessionContext, SessionOptions, TaskQueue};
use devwatch::fs::FileSystem;
use devwatch_test_utils::fake_runner::FakeProcessRunner;

pub use devwatch_test_utils::{init_tracing, with_timeout};

pub type TestResult = Result<(), Box<dyn Error>>;

/// Session wiring around an in-memory or temp-dir project.
///
/// `runner` defaults to a fake on which every install succeeds.
pub fn session_context(
    root: impl Into<PathBuf>,
    config: ProjectConfig,
    fs: Arc<dyn FileSystem>,
    runner: Option<Arc<FakeProcessRunner>>,
) -> SessionContext {
    let config = SharedConfig::new(config);
    let runner: Arc<dyn ProcessRunner> = match runner {
        Some(r) => r,
        None => Arc::new(FakeProcessRunner::new()),
    };
    SessionContext {
        root: root.into(),
        resolver: DependencyResolver::new(config.clone(), runner),
        config,
        fs,
        queue: Arc::new(TaskQueue::new()),
        options: SessionOptions::default(),
    }
}
