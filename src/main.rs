//! Entry point for the lesson player.
//!
//! - Parse command-line arguments (an optional lesson document).
//! - Load user configuration from `conf/config.toml`.
//! - Load the lesson, falling back to the built-in one.
//! - Launch the GUI application with the lesson and config.

mod app;
mod audio;
mod cache;
mod config;

use crate::app::run_app;
use crate::config::{CONFIG_PATH, load_config};
use anyhow::{Context, Result, anyhow};
use lesson_core::{LessonScript, load_script};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

static SIGINT_REQUESTED: AtomicBool = AtomicBool::new(false);

fn main() {
    let reload_handle = init_tracing();
    install_sigint_handler();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let lesson_path = parse_args()?;
    let config = load_config(Path::new(CONFIG_PATH));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(level = %config.log_level, "Starting lesson player");
    info!(
        clips_dir = %config.clips_dir,
        lessons_dir = %config.lessons_dir,
        tick_ms = config.tick_interval().as_millis() as u64,
        audio_timeout_secs = config.audio_timeout().as_secs(),
        "Active lesson configuration"
    );

    let script = match &lesson_path {
        Some(path) => load_script(path)?,
        None => {
            info!("No lesson given; using the built-in lesson");
            LessonScript::builtin()
        }
    };
    run_app(script, config, lesson_path).context("Failed to start the GUI")?;
    Ok(())
}

fn parse_args() -> Result<Option<PathBuf>> {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        return Ok(None);
    };
    if args.next().is_some() {
        return Err(anyhow!("Usage: sketchpad-lessons [lesson.json]"));
    }

    let path = PathBuf::from(path);
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.as_path().display()));
    }
    Ok(Some(path))
}

fn install_sigint_handler() {
    if let Err(err) = ctrlc::set_handler(|| {
        info!("Received Ctrl+C; requesting safe shutdown");
        SIGINT_REQUESTED.store(true, Ordering::SeqCst);
    }) {
        warn!("Failed to install Ctrl+C signal handler: {err}");
    }
}

/// True once per Ctrl+C; the UI polls this and quits through its own
/// shutdown path.
pub(crate) fn take_sigint_requested() -> bool {
    SIGINT_REQUESTED.swap(false, Ordering::SeqCst)
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}
