use super::defaults;
use super::models::{AppConfig, LogLevel, ThemeMode};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub(super) struct ConfigTables {
    #[serde(default)]
    appearance: AppearanceConfig,
    #[serde(default)]
    timeline: TimelineTable,
    #[serde(default)]
    audio: AudioConfig,
    #[serde(default)]
    lessons: LessonsConfig,
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    keys: KeysConfig,
}

impl From<ConfigTables> for AppConfig {
    fn from(tables: ConfigTables) -> Self {
        AppConfig {
            theme: tables.appearance.theme,
            font_size: tables.appearance.font_size,
            line_spacing: tables.appearance.line_spacing,
            margin_horizontal: tables.appearance.margin_horizontal,
            margin_vertical: tables.appearance.margin_vertical,
            window_width: tables.appearance.window_width,
            window_height: tables.appearance.window_height,
            tick_interval_ms: tables.timeline.tick_interval_ms,
            chars_per_tick: tables.timeline.chars_per_tick,
            dot_ticks: tables.timeline.dot_ticks,
            saving_flash_secs: tables.timeline.saving_flash_secs,
            audio_timeout_secs: tables.audio.audio_timeout_secs,
            clips_dir: tables.audio.clips_dir,
            volume: tables.audio.volume,
            silent_clip_secs: tables.audio.silent_clip_secs,
            lessons_dir: tables.lessons.lessons_dir,
            cache_dir: tables.lessons.cache_dir,
            log_level: tables.logging.log_level,
            key_start: tables.keys.key_start,
            key_reset: tables.keys.key_reset,
            key_safe_quit: tables.keys.key_safe_quit,
        }
    }
}

impl From<&AppConfig> for ConfigTables {
    fn from(config: &AppConfig) -> Self {
        ConfigTables {
            appearance: AppearanceConfig {
                theme: config.theme,
                font_size: config.font_size,
                line_spacing: config.line_spacing,
                margin_horizontal: config.margin_horizontal,
                margin_vertical: config.margin_vertical,
                window_width: config.window_width,
                window_height: config.window_height,
            },
            timeline: TimelineTable {
                tick_interval_ms: config.tick_interval_ms,
                chars_per_tick: config.chars_per_tick,
                dot_ticks: config.dot_ticks,
                saving_flash_secs: config.saving_flash_secs,
            },
            audio: AudioConfig {
                audio_timeout_secs: config.audio_timeout_secs,
                clips_dir: config.clips_dir.clone(),
                volume: config.volume,
                silent_clip_secs: config.silent_clip_secs,
            },
            lessons: LessonsConfig {
                lessons_dir: config.lessons_dir.clone(),
                cache_dir: config.cache_dir.clone(),
            },
            logging: LoggingConfig {
                log_level: config.log_level,
            },
            keys: KeysConfig {
                key_start: config.key_start.clone(),
                key_reset: config.key_reset.clone(),
                key_safe_quit: config.key_safe_quit.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct AppearanceConfig {
    #[serde(default)]
    theme: ThemeMode,
    #[serde(default = "defaults::default_font_size")]
    font_size: u32,
    #[serde(default = "defaults::default_line_spacing")]
    line_spacing: f32,
    #[serde(default = "defaults::default_margin_horizontal")]
    margin_horizontal: u16,
    #[serde(default = "defaults::default_margin_vertical")]
    margin_vertical: u16,
    #[serde(default = "defaults::default_window_width")]
    window_width: f32,
    #[serde(default = "defaults::default_window_height")]
    window_height: f32,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        AppearanceConfig {
            theme: ThemeMode::default(),
            font_size: defaults::default_font_size(),
            line_spacing: defaults::default_line_spacing(),
            margin_horizontal: defaults::default_margin_horizontal(),
            margin_vertical: defaults::default_margin_vertical(),
            window_width: defaults::default_window_width(),
            window_height: defaults::default_window_height(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct TimelineTable {
    #[serde(default = "defaults::default_tick_interval_ms")]
    tick_interval_ms: u64,
    #[serde(default = "defaults::default_chars_per_tick")]
    chars_per_tick: usize,
    #[serde(default = "defaults::default_dot_ticks")]
    dot_ticks: u32,
    #[serde(default = "defaults::default_saving_flash_secs")]
    saving_flash_secs: f32,
}

impl Default for TimelineTable {
    fn default() -> Self {
        TimelineTable {
            tick_interval_ms: defaults::default_tick_interval_ms(),
            chars_per_tick: defaults::default_chars_per_tick(),
            dot_ticks: defaults::default_dot_ticks(),
            saving_flash_secs: defaults::default_saving_flash_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct AudioConfig {
    #[serde(default = "defaults::default_audio_timeout_secs")]
    audio_timeout_secs: f32,
    #[serde(default = "defaults::default_clips_dir")]
    clips_dir: String,
    #[serde(default = "defaults::default_volume")]
    volume: f32,
    #[serde(default = "defaults::default_silent_clip_secs")]
    silent_clip_secs: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            audio_timeout_secs: defaults::default_audio_timeout_secs(),
            clips_dir: defaults::default_clips_dir(),
            volume: defaults::default_volume(),
            silent_clip_secs: defaults::default_silent_clip_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LessonsConfig {
    #[serde(default = "defaults::default_lessons_dir")]
    lessons_dir: String,
    #[serde(default = "defaults::default_cache_dir")]
    cache_dir: String,
}

impl Default for LessonsConfig {
    fn default() -> Self {
        LessonsConfig {
            lessons_dir: defaults::default_lessons_dir(),
            cache_dir: defaults::default_cache_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct LoggingConfig {
    #[serde(default = "defaults::default_log_level")]
    log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            log_level: defaults::default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, serde::Serialize)]
struct KeysConfig {
    #[serde(default = "defaults::default_key_start")]
    key_start: String,
    #[serde(default = "defaults::default_key_reset")]
    key_reset: String,
    #[serde(default = "defaults::default_key_safe_quit")]
    key_safe_quit: String,
}

impl Default for KeysConfig {
    fn default() -> Self {
        KeysConfig {
            key_start: defaults::default_key_start(),
            key_reset: defaults::default_key_reset(),
            key_safe_quit: defaults::default_key_safe_quit(),
        }
    }
}
