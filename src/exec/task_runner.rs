// src/exec/task_runner.rs

//! Runs a single build command to completion.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::deps::CommandSpec;
use crate::types::{Task, TaskOutcome};

/// How a task's command is expressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// A program with explicit arguments.
    Exec(CommandSpec),
    /// A user-supplied shell line from the project file.
    Shell(String),
}

impl TaskCommand {
    fn build(&self) -> Command {
        match self {
            TaskCommand::Exec(spec) => {
                let mut c = Command::new(&spec.program);
                c.args(&spec.args);
                c
            }
            TaskCommand::Shell(line) if cfg!(windows) => {
                let mut c = Command::new("cmd");
                c.arg("/C").arg(line);
                c
            }
            TaskCommand::Shell(line) => {
                let mut c = Command::new("sh");
                c.arg("-c").arg(line);
                c
            }
        }
    }
}

impl std::fmt::Display for TaskCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskCommand::Exec(spec) => write!(f, "{spec}"),
            TaskCommand::Shell(line) => f.write_str(line),
        }
    }
}

/// Run `command` for `task` in `cwd`, forwarding its output into the log.
///
/// Returns `Err` only when the process couldn't be spawned or waited on; a
/// non-zero exit is reported as [`TaskOutcome::Failed`].
pub async fn run_task(task: &Task, command: &TaskCommand, cwd: &Path) -> Result<TaskOutcome> {
    info!(task = %task, cmd = %command, "starting task process");

    let mut cmd = command.build();
    cmd.current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{task}'"))?;

    forward_output(task, &mut child);

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{task}'"))?;

    let code = status.code().unwrap_or(-1);
    let outcome = if status.success() {
        TaskOutcome::Success
    } else {
        TaskOutcome::Failed(code)
    };

    info!(
        task = %task,
        exit_code = code,
        success = status.success(),
        "task process exited"
    );
    Ok(outcome)
}

/// Consume stdout/stderr so pipes never fill up. Compiler diagnostics land
/// on stderr and are logged as warnings.
fn forward_output(task: &Task, child: &mut Child) {
    if let Some(stdout) = child.stdout.take() {
        spawn_line_logger(task.to_string(), stdout, false);
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_line_logger(task.to_string(), stderr, true);
    }
}

fn spawn_line_logger<R>(task: String, reader: R, is_stderr: bool)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if is_stderr {
                warn!(task = %task, "{}", line);
            } else {
                info!(task = %task, "{}", line);
            }
        }
    });
}
