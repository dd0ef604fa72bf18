// src/exec/shell.rs

//! The production executor: builds with the Go toolchain, runs the asset
//! commands from `[assets]`, and keeps the application binary running.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::{ProjectConfig, SharedConfig};
use crate::deps::{BoxFuture, CommandSpec};
use crate::errors::{DevwatchError, Result};
use crate::exec::backend::AppShell;
use crate::exec::task_runner::{run_task, TaskCommand};
use crate::types::{full_rebuild_tasks, Task, TaskKind};

/// What happened while executing a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Tasks that ran and succeeded, in order.
    pub succeeded: Vec<Task>,
    /// Tasks without a configured command.
    pub skipped: Vec<Task>,
    /// The task that stopped the batch, if any.
    pub failed: Option<Task>,
}

impl BatchReport {
    pub fn rebuilt_binary(&self) -> bool {
        self.succeeded.iter().any(|t| t.kind == TaskKind::BuildBinary)
    }
}

fn default_go() -> CommandSpec {
    CommandSpec::new("go", Vec::<String>::new())
}

/// Resolve the command a task runs under `config`, if it has one.
pub fn command_for(config: &ProjectConfig, task: &Task) -> Option<TaskCommand> {
    command_for_with(&default_go(), config, task)
}

/// Like [`command_for`], with Go invoked through `go` (its args are prepended
/// to every Go subcommand).
pub fn command_for_with(go: &CommandSpec, config: &ProjectConfig, task: &Task) -> Option<TaskCommand> {
    let go_command = |args: Vec<String>| {
        let mut full = go.args.clone();
        full.extend(args);
        TaskCommand::Exec(CommandSpec::new(go.program.clone(), full))
    };
    match task.kind {
        TaskKind::BuildImages | TaskKind::BuildStyles | TaskKind::BuildJavaScripts => {
            asset_command(config, task.kind)
        }
        TaskKind::BuildBinary => config.package.as_ref().map(|pkg| {
            let mut args = vec!["build".to_string(), "-o".to_string(), pkg.name.clone()];
            args.extend(pkg.build_opts.iter().cloned());
            go_command(args)
        }),
        TaskKind::BinaryTest => {
            let pattern = match task.target.as_str() {
                "" => "./...".to_string(),
                "." => ".".to_string(),
                module => format!("./{module}"),
            };
            Some(go_command(vec!["test".to_string(), pattern]))
        }
    }
}

fn asset_command(config: &ProjectConfig, kind: TaskKind) -> Option<TaskCommand> {
    let assets = config.assets.as_ref()?;
    let line = match kind {
        TaskKind::BuildImages => &assets.images,
        TaskKind::BuildStyles => &assets.styles,
        TaskKind::BuildJavaScripts => &assets.javascripts,
        _ => return None,
    };
    line.clone().map(TaskCommand::Shell)
}

/// [`AppShell`] running real processes in the project root.
#[derive(Debug)]
pub struct CommandShell {
    root: PathBuf,
    config: SharedConfig,
    app_args: Vec<String>,
    go: CommandSpec,
    app: Mutex<Option<Child>>,
    /// Held across a batch and the restart that follows it.
    build_lock: Mutex<()>,
}

impl CommandShell {
    pub fn new(root: impl Into<PathBuf>, config: SharedConfig, app_args: Vec<String>) -> Self {
        Self {
            root: root.into(),
            config,
            app_args,
            go: default_go(),
            app: Mutex::new(None),
            build_lock: Mutex::new(()),
        }
    }

    /// Invoke the Go toolchain through `go` instead of `go` on `PATH`.
    pub fn with_go(mut self, go: CommandSpec) -> Self {
        self.go = go;
        self
    }

    /// Run `batch` in order. The first failing task stops the batch, so a
    /// broken binary build never reaches its tests.
    ///
    /// Batches never overlap: a batch started while another one (or its
    /// application restart) is in flight waits for it to finish.
    pub async fn execute_batch(&self, batch: Vec<Task>) -> BatchReport {
        let _guard = self.build_lock.lock().await;
        self.run_batch(batch).await
    }

    /// Execute `batch`, then restart the application if the binary was
    /// rebuilt. Both steps run under the build lock.
    pub async fn rebuild(&self, batch: Vec<Task>) -> Result<BatchReport> {
        let _guard = self.build_lock.lock().await;
        let report = self.run_batch(batch).await;
        if report.rebuilt_binary() {
            self.restart_app().await?;
        }
        Ok(report)
    }

    async fn run_batch(&self, batch: Vec<Task>) -> BatchReport {
        let mut report = BatchReport::default();
        let mut binary_built = false;

        for task in batch {
            // Every module builds the same binary.
            if task.kind == TaskKind::BuildBinary && binary_built {
                debug!(task = %task, "binary already built in this batch");
                report.succeeded.push(task);
                continue;
            }

            let command = command_for_with(&self.go, &self.config.read(), &task);
            let Some(command) = command else {
                info!(task = %task, "no command configured; skipping");
                report.skipped.push(task);
                continue;
            };

            match run_task(&task, &command, &self.root).await {
                Ok(outcome) if outcome.is_success() => {
                    binary_built |= task.kind == TaskKind::BuildBinary;
                    report.succeeded.push(task);
                }
                Ok(outcome) => {
                    error!(task = %task, ?outcome, "task failed; dropping the rest of the batch");
                    report.failed = Some(task);
                    break;
                }
                Err(err) => {
                    error!(task = %task, error = %err, "task execution error");
                    report.failed = Some(task);
                    break;
                }
            }
        }

        report
    }

    /// Stop the running application (if any) and start the freshly built one.
    pub async fn restart_app(&self) -> Result<()> {
        let name = self.config.read().package.as_ref().map(|p| p.name.clone());
        let Some(name) = name else {
            return Ok(());
        };

        let mut app = self.app.lock().await;
        if let Some(mut child) = app.take() {
            info!(app = %name, "stopping application");
            if let Err(err) = child.kill().await {
                warn!(app = %name, error = %err, "failed to stop application");
            }
        }

        let binary = self.root.join(&name);
        let child = Command::new(&binary)
            .args(&self.app_args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("starting application {:?}", binary))?;

        info!(app = %name, pid = ?child.id(), "application started");
        *app = Some(child);
        Ok(())
    }
}

impl AppShell for CommandShell {
    fn run(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let report = self.rebuild(full_rebuild_tasks()).await?;
            match report.failed {
                Some(task) => Err(DevwatchError::BuildFailed(task.to_string())),
                None => Ok(()),
            }
        })
    }

    fn dispatch_tasks(&self, batch: Vec<Task>) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if let Err(err) = self.rebuild(batch).await {
                error!(error = %err, "failed to restart application");
            }
        })
    }
}
