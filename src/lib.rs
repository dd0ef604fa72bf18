// src/lib.rs

pub mod cli;
pub mod config;
pub mod deps;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, ProjectConfig, SharedConfig};
use crate::deps::{DependencyResolver, Ecosystem, SystemProcessRunner};
use crate::engine::{stop_channel, SessionContext, SessionOptions, TaskQueue, WatchSession};
use crate::exec::CommandShell;
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::full_rebuild_tasks;
use crate::watch::{ClassifierOptions, NotifyRegistry};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project file loading
/// - dependency resolution (fatal before watching starts)
/// - the command executor (`--once` / `--dist` stop after one build)
/// - the watch session and Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let project = load_and_validate(&config_path)
        .with_context(|| format!("loading project file {:?}", config_path))?;

    if args.dry_run {
        print_dry_run(&project);
        return Ok(());
    }

    let root = project_root(&config_path);
    let config = SharedConfig::new(project);
    let runner = Arc::new(SystemProcessRunner::new(root.clone()));
    let resolver = DependencyResolver::new(config.clone(), runner);

    resolver
        .ensure(Ecosystem::Go)
        .await
        .context("failed to load project Go dependencies")?;
    resolver
        .ensure(Ecosystem::Npm)
        .await
        .context("failed to load project assets dependencies")?;

    let shell = Arc::new(CommandShell::new(
        root.clone(),
        config.clone(),
        args.app_args.clone(),
    ));

    if args.once || args.dist {
        let report = shell.execute_batch(full_rebuild_tasks()).await;
        if let Some(task) = report.failed {
            bail!("build failed at {task}");
        }
        info!(built = report.succeeded.len(), skipped = report.skipped.len(), "build finished");

        if args.dist {
            let dest = exec::pack(&root, &config.read())?;
            info!(path = %dest.display(), "distribution packed");
        }
        return Ok(());
    }

    let (registry, source) = NotifyRegistry::new()?;
    let (stop_handle, stop) = stop_channel();

    // Ctrl-C → graceful shutdown.
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        stop_handle.stop();
    });

    let options = SessionOptions {
        classifier: ClassifierOptions {
            config_file: config_file_name(&config_path),
            ..ClassifierOptions::default()
        },
        ..SessionOptions::default()
    };
    let ctx = SessionContext {
        root,
        config,
        fs: Arc::new(RealFileSystem),
        queue: Arc::new(TaskQueue::new()),
        resolver,
        options,
    };

    WatchSession::new(ctx, registry, shell)
        .run(source, stop)
        .await
        .context("failed to start watching project changes")?;
    Ok(())
}

/// Directory holding the project file, canonicalized when possible.
///
/// A bare filename like "project.toml" (parent = "") means the current
/// working directory.
fn project_root(config_path: &Path) -> PathBuf {
    let root = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    RealFileSystem.canonicalize(&root).unwrap_or(root)
}

fn config_file_name(config_path: &Path) -> String {
    config_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| config::DEFAULT_CONFIG_FILE.to_string())
}

/// Simple dry-run output: print what would be resolved and built.
fn print_dry_run(cfg: &ProjectConfig) {
    println!("devwatch dry-run");

    match &cfg.package {
        Some(pkg) => {
            println!("package: {} {}", pkg.name, pkg.version);
            println!("  go dependencies: {:?}", pkg.dependencies);
            if !pkg.omit_tests.is_empty() {
                println!("  omit_tests: {:?}", pkg.omit_tests);
            }
            if !pkg.build_opts.is_empty() {
                println!("  build_opts: {:?}", pkg.build_opts);
            }
        }
        None => println!("package: (none)"),
    }

    match &cfg.assets {
        Some(assets) => {
            println!("assets: {}", assets.directory);
            println!("  npm dependencies: {:?}", cfg.asset_dependencies());
            for (label, cmd) in [
                ("images", &assets.images),
                ("styles", &assets.styles),
                ("javascripts", &assets.javascripts),
            ] {
                if let Some(cmd) = cmd {
                    println!("  {label}: {cmd}");
                }
            }
        }
        None => println!("assets: (none)"),
    }

    if let Some(dist) = &cfg.distribution {
        println!("distribution:");
        println!("  pack_extras: {:?}", dist.pack_extras);
    }

    debug!("dry-run complete (no execution)");
}
