// src/deps/mod.rs

//! Dependency resolution for the Go and npm halves of a project.
//!
//! - [`resolver`] decides what to check and install from the shared
//!   configuration.
//! - [`process`] owns the [`ProcessRunner`] seam that actually spawns the
//!   package managers.

pub mod process;
pub mod resolver;

pub use process::{BoxFuture, CommandSpec, ProcessRunner, SystemProcessRunner};
pub use resolver::{DependencyResolver, Ecosystem};
