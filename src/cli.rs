// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `devwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "devwatch",
    version,
    about = "Watch a Go + assets project, rebuild on change and keep the app running.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project file (TOML).
    ///
    /// Its directory is the project root that gets watched.
    #[arg(long, value_name = "PATH", default_value = "project.toml")]
    pub config: String,

    /// Resolve dependencies, run one full build and exit without watching.
    #[arg(long)]
    pub once: bool,

    /// Resolve dependencies, run one full build and pack the binary plus
    /// `[distribution].pack_extras` into `dist/`.
    #[arg(long, conflicts_with = "once")]
    pub dist: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, the `DEVWATCH_LOG` directives or `info` are used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate the project file, print it, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Arguments passed to the application binary when it is started.
    #[arg(last = true, value_name = "APP_ARGS")]
    pub app_args: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
