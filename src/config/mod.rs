//! Configuration loading for the lesson player.
//!
//! All user-tunable settings are centralized here and loaded from
//! `conf/config.toml` if present. Any missing or invalid entries fall back to
//! sensible defaults so the UI can still launch.

mod defaults;
mod io;
mod models;
mod tables;

/// Location of the user configuration, relative to the working directory.
pub const CONFIG_PATH: &str = "conf/config.toml";

pub use io::{load_config, parse_config, save_config, serialize_config};
pub use models::{AppConfig, LogLevel, ThemeMode};
