// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] defines the [`AppShell`] contract the watch session
//!   dispatches task batches to.
//! - [`shell`] is the production [`AppShell`]: Go builds and tests, the asset
//!   commands from `[assets]`, and the served application process.
//! - [`task_runner`] runs one command and streams its output into the log.
//! - [`dist`] packs the built binary and its extras into `dist/`.

pub mod backend;
pub mod dist;
pub mod shell;
pub mod task_runner;

pub use backend::AppShell;
pub use dist::{pack, DIST_DIR};
pub use shell::{command_for, command_for_with, BatchReport, CommandShell};
pub use task_runner::{run_task, TaskCommand};
