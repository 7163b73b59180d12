use super::models::AppConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const TABLE_NAMES: [&str; 6] = ["appearance", "timeline", "audio", "lessons", "logging", "keys"];

/// Load configuration from `path`, falling back to defaults on any error.
pub fn load_config(path: &Path) -> AppConfig {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) => {
            debug!(path = %path.display(), "No config file found ({err}); using defaults");
            return AppConfig::default();
        }
    };

    match parse_config(&data) {
        Ok(config) => {
            info!(path = %path.display(), "Loaded config");
            config
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config; using defaults: {err:#}");
            AppConfig::default()
        }
    }
}

/// Parse either the tabled layout (`[appearance]`, `[timeline]`, ...) or a
/// flat list of top-level keys.
pub fn parse_config(data: &str) -> Result<AppConfig> {
    let raw: toml::Table = toml::from_str(data).context("Parsing config TOML")?;
    let tabled = TABLE_NAMES
        .iter()
        .any(|name| raw.get(*name).map(toml::Value::is_table).unwrap_or(false));

    if tabled {
        let tables: ConfigTables = toml::from_str(data).context("Reading config tables")?;
        Ok(tables.into())
    } else {
        toml::from_str(data).context("Reading flat config")
    }
}

pub fn serialize_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(&ConfigTables::from(config)).context("Serializing config")
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Creating config directory {}", parent.display()))?;
    }
    let contents = serialize_config(config)?;
    fs::write(path, contents).with_context(|| format!("Writing config {}", path.display()))?;
    debug!(path = %path.display(), "Saved config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LogLevel, ThemeMode};

    #[test]
    fn tabled_config_fills_missing_fields_with_defaults() {
        let config = parse_config(
            r#"
            [appearance]
            theme = "night"
            font_size = 30

            [timeline]
            chars_per_tick = 2

            [logging]
            log_level = "info"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.theme, ThemeMode::Night);
        assert_eq!(config.font_size, 30);
        assert_eq!(config.chars_per_tick, 2);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.tick_interval_ms, AppConfig::default().tick_interval_ms);
        assert_eq!(config.clips_dir, AppConfig::default().clips_dir);
    }

    #[test]
    fn flat_config_is_still_accepted() {
        let config = parse_config("font_size = 18\nvolume = 0.5\n").expect("valid config");
        assert_eq!(config.font_size, 18);
        assert_eq!(config.volume, 0.5);
        assert_eq!(config.theme, ThemeMode::Day);
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = AppConfig::default();
        config.theme = ThemeMode::Night;
        config.saving_flash_secs = 3.5;
        config.key_reset = "ctrl+n".to_string();

        let text = serialize_config(&config).expect("serialize");
        assert!(text.contains("[timeline]"));
        assert_eq!(parse_config(&text).expect("parse"), config);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!(
            "sketchpad-lessons-bad-config-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "font_size = \"large\"").unwrap();
        assert_eq!(load_config(&path), AppConfig::default());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn timeline_settings_are_clamped() {
        let mut config = AppConfig::default();
        config.tick_interval_ms = 1;
        config.chars_per_tick = 0;
        config.saving_flash_secs = -2.0;
        assert_eq!(config.tick_interval().as_millis(), 20);
        let timeline = config.timeline_config();
        assert_eq!(timeline.chars_per_tick, 1);
        assert!(timeline.saving_flash.is_zero());
    }

    #[test]
    fn oversized_durations_are_capped() {
        let config = parse_config(
            r#"
            [timeline]
            saving_flash_secs = 1e30

            [audio]
            audio_timeout_secs = 1e19
            silent_clip_secs = 1e30
            "#,
        )
        .expect("valid config");

        assert_eq!(config.timeline_config().saving_flash.as_secs(), 60);
        assert_eq!(config.audio_timeout().as_secs(), 3600);
        assert_eq!(config.silent_clip_duration().as_secs(), 600);
    }
}
