// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod monitor;
pub mod present;
pub mod process;
pub mod selector;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate, ConfigFile, RawConfigFile};
use crate::engine::{ChangeHub, CoreMonitor, MonitorEvent, Runtime};
use crate::fs::{FileSystem, RealFileSystem};
use crate::present::{format_options, TerminalPresenter};
use crate::process::ProcessRegistry;
use crate::selector::ProcessSelector;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the process registry (source + candidate query)
/// - selector / core monitor / runtime
/// - the terminal presenter
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let (cfg, config_path) = load_config(args.config.as_deref())?;
    let registry_path = resolve_registry_path(&cfg, &config_path, args.registry.as_deref());

    if args.dry_run {
        print_dry_run(&cfg, &registry_path);
        return Ok(());
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let registry = Arc::new(ProcessRegistry::new(registry_path, Arc::clone(&fs)));
    let mut selector = ProcessSelector::new(registry.clone(), cfg.query.process_label.clone());

    if args.list {
        selector.refresh()?;
        for line in format_options(selector.options(), selector.selection()) {
            println!("{line}");
        }
        return Ok(());
    }

    let core = CoreMonitor::new(selector, registry, fs, cfg.monitor_options(args.once));

    let (tx, rx) = mpsc::channel::<MonitorEvent>(64);

    // Ctrl-C → graceful shutdown.
    {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(MonitorEvent::ShutdownRequested).await;
        });
    }

    // Populate the candidate list, then pick the requested process.
    tx.send(MonitorEvent::RefreshRequested).await?;
    tx.send(MonitorEvent::SelectionRequested(args.pk)).await?;
    info!(pk = ?args.pk, "initial selection queued");

    let mut hub = ChangeHub::new();
    let mut presenter = TerminalPresenter::new(cfg.monitor.title.clone());
    hub.subscribe_all(move |change| {
        for line in presenter.render(change) {
            println!("{line}");
        }
    });

    let runtime = Runtime::new(core, rx, hub);
    runtime.run().await?;

    // Keep the sender alive until the runtime is done.
    drop(tx);
    Ok(())
}

/// Load the explicit config, or `Procwatch.toml` if present, or defaults.
fn load_config(explicit: Option<&str>) -> Result<(ConfigFile, PathBuf)> {
    if let Some(path) = explicit {
        let path = PathBuf::from(path);
        return Ok((load_and_validate(&path)?, path));
    }

    let path = default_config_path();
    if path.is_file() {
        return Ok((load_and_validate(&path)?, path));
    }

    debug!("no config file found; using defaults");
    Ok((ConfigFile::try_from(RawConfigFile::default())?, path))
}

/// CLI override first, then `[source].registry` relative to the config dir.
fn resolve_registry_path(cfg: &ConfigFile, config_path: &Path, cli: Option<&str>) -> PathBuf {
    if let Some(path) = cli {
        return PathBuf::from(path);
    }
    let registry = &cfg.source.registry;
    if registry.is_absolute() {
        registry.clone()
    } else {
        config_root_dir(config_path).join(registry)
    }
}

/// Directory of the config file, or "." for a bare file name.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn print_dry_run(cfg: &ConfigFile, registry_path: &Path) {
    println!("procwatch dry-run");
    println!("  monitor.poll_interval = {:?}", cfg.monitor.poll_interval);
    println!("  monitor.window_lines = {}", cfg.monitor.window_lines);
    println!("  monitor.title = {:?}", cfg.monitor.title);
    println!("  query.process_label = {}", cfg.query.process_label);
    println!("  source.registry = {}", registry_path.display());

    debug!("dry-run complete (nothing watched)");
}
