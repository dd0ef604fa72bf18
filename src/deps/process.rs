use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{anyhow, Context, Result};
use tokio::process::Command;
use tracing::debug;

/// Boxed future returned by the process and executor traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Runs the package-manager commands used for dependency resolution.
///
/// Production code uses [`SystemProcessRunner`]; tests substitute a fake that
/// records what would have been run.
pub trait ProcessRunner: Send + Sync {
    /// Run a read-only check; `true` means the command exited successfully.
    /// Output is discarded.
    fn check<'a>(&'a self, command: &'a CommandSpec) -> BoxFuture<'a, bool>;

    /// Run an installing command with its output streamed to the operator.
    fn install<'a>(&'a self, command: &'a CommandSpec) -> BoxFuture<'a, Result<()>>;
}

/// [`ProcessRunner`] spawning real processes in the project root.
#[derive(Debug, Clone)]
pub struct SystemProcessRunner {
    cwd: PathBuf,
}

impl SystemProcessRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    fn command(&self, spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).current_dir(&self.cwd).kill_on_drop(true);
        cmd
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn check<'a>(&'a self, command: &'a CommandSpec) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            let status = self
                .command(command)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .await;
            match status {
                Ok(status) => status.success(),
                Err(err) => {
                    debug!(command = %command, error = %err, "check could not be started");
                    false
                }
            }
        })
    }

    fn install<'a>(&'a self, command: &'a CommandSpec) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let status = self
                .command(command)
                .stdin(Stdio::null())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit())
                .status()
                .await
                .with_context(|| format!("spawning `{command}`"))?;
            if status.success() {
                Ok(())
            } else {
                Err(anyhow!("`{command}` exited with {status}"))
            }
        })
    }
}
