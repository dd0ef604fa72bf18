use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::anyhow;

use devwatch::deps::{BoxFuture, CommandSpec, ProcessRunner};

/// One command the resolver asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerCall {
    Check(CommandSpec),
    Install(CommandSpec),
}

/// A fake package manager.
///
/// The dependency name is the last argument of each command. Checks succeed
/// for dependencies marked present; installs fail for dependencies marked
/// failing and succeed otherwise.
#[derive(Debug, Default)]
pub struct FakeProcessRunner {
    present: HashSet<String>,
    failing: HashSet<String>,
    calls: Mutex<Vec<RunnerCall>>,
}

impl FakeProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_present(mut self, dep: &str) -> Self {
        self.present.insert(dep.to_string());
        self
    }

    pub fn with_failing(mut self, dep: &str) -> Self {
        self.failing.insert(dep.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RunnerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Rendered install commands, e.g. `"go get github.com/x/y"`.
    pub fn installs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RunnerCall::Install(spec) => Some(spec.to_string()),
                RunnerCall::Check(_) => None,
            })
            .collect()
    }

    fn dependency(command: &CommandSpec) -> String {
        command.args.last().cloned().unwrap_or_default()
    }
}

impl ProcessRunner for FakeProcessRunner {
    fn check<'a>(&'a self, command: &'a CommandSpec) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push(RunnerCall::Check(command.clone()));
            self.present.contains(&Self::dependency(command))
        })
    }

    fn install<'a>(&'a self, command: &'a CommandSpec) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push(RunnerCall::Install(command.clone()));
            let dep = Self::dependency(command);
            if self.failing.contains(&dep) {
                return Err(anyhow!("cannot install {dep}"));
            }
            Ok(())
        })
    }
}
