// src/lib.rs

pub mod cli;
pub mod compile;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod input;
pub mod logging;
pub mod present;
pub mod store;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::compile::HttpCompiler;
use crate::config::loader::load_or_default;
use crate::config::ConfigFile;
use crate::engine::{CoreOrchestrator, OrchestratorOptions, Runtime, RuntimeEvent};
use crate::errors::{LivetexError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::present::{spawn_console_reporter, FileArtifactSink, Presenter};
use crate::store::{seed_from_source_file, FileKvStore, SourceStore};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the source store and its persisted state
/// - the compile backend and the preview sink
/// - runtime (core orchestrator + IO shell)
/// - (optional) source file watcher and stdin commands
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args)?;

    if args.dry_run {
        print_dry_run(&cfg, &args);
        return Ok(());
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    // Source store, loaded from the persisted key-value file.
    let kv = FileKvStore::new(cfg.editor.state_file.clone(), Arc::clone(&fs));
    let mut store = SourceStore::load(Box::new(kv), cfg.editor.default_render_option);
    if let Some(font) = args.font {
        store.set_render_option(font);
    }
    if let Some(ref source) = cfg.editor.source {
        seed_from_source_file(&mut store, fs.as_ref(), source)?;
    }

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let compiler = HttpCompiler::new(&cfg.compile.endpoint, cfg.compile.output_name.clone())?;
    info!(endpoint = %compiler.endpoint(), "using compile endpoint");

    let sink = FileArtifactSink::new(
        cfg.preview.output_dir.clone(),
        cfg.compile.output_name.clone(),
        Arc::clone(&fs),
    );
    let (presenter, preview_rx) = Presenter::new(Box::new(sink));
    let _reporter = spawn_console_reporter(preview_rx.clone());

    // Interactive inputs (disabled in --once mode).
    let _watcher_handle = match (&cfg.editor.source, args.once) {
        (Some(source), false) => Some(crate::input::spawn_source_watcher(
            source.clone(),
            Arc::clone(&fs),
            rt_tx.clone(),
        )?),
        _ => None,
    };
    if !args.once && !args.no_stdin {
        crate::input::spawn_stdin_commands(rt_tx.clone());
    }

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    let options = OrchestratorOptions {
        debounce: if args.once {
            Duration::ZERO
        } else {
            Duration::from_millis(cfg.compile.debounce_ms)
        },
        exit_when_idle: args.once,
    };

    // Construct the pure core (single source of truth for semantics).
    let core = CoreOrchestrator::new(store.document().clone(), options);

    // Construct the async IO shell around the core.
    let runtime = Runtime::new(core, store, presenter, compiler, rt_tx, rt_rx);
    let mut presenter = runtime.run().await?;

    // Leave the last good preview on disk after exit.
    if let Some(handle) = presenter.take_artifact() {
        let location = handle.keep();
        info!(%location, "final preview kept");
    }

    if args.once {
        if let Some(diagnostic) = presenter.diagnostic() {
            return Err(LivetexError::CompileFailed(diagnostic));
        }
    }

    Ok(())
}

/// Load the config file (or defaults), apply CLI overrides, validate.
pub fn load_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut raw = load_or_default(&args.config)?;
    args.apply_overrides(&mut raw);
    ConfigFile::try_from(raw)
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile, args: &CliArgs) {
    println!("livetex dry-run");
    println!("  compile.endpoint = {}", cfg.compile.endpoint);
    println!("  compile.output_name = {}", cfg.compile.output_name);
    println!("  compile.debounce_ms = {}", cfg.compile.debounce_ms);
    match cfg.editor.source {
        Some(ref source) => println!("  editor.source = {}", source.display()),
        None => println!("  editor.source = (none)"),
    }
    println!(
        "  editor.default_render_option = {}",
        cfg.editor.default_render_option
    );
    if let Some(font) = args.font {
        println!("  render option override = {font}");
    }
    println!("  editor.state_file = {}", cfg.editor.state_file.display());
    println!("  preview.output_dir = {}", cfg.preview.output_dir.display());

    debug!("dry-run complete (no compilation)");
}
