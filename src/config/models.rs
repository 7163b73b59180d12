use lesson_core::TimelineConfig;
use serde::Deserialize;
use std::time::Duration;

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub theme: ThemeMode,
    #[serde(default = "crate::config::defaults::default_font_size")]
    pub font_size: u32,
    #[serde(default = "crate::config::defaults::default_line_spacing")]
    pub line_spacing: f32,
    #[serde(default = "crate::config::defaults::default_margin_horizontal")]
    pub margin_horizontal: u16,
    #[serde(default = "crate::config::defaults::default_margin_vertical")]
    pub margin_vertical: u16,
    #[serde(default = "crate::config::defaults::default_window_width")]
    pub window_width: f32,
    #[serde(default = "crate::config::defaults::default_window_height")]
    pub window_height: f32,
    #[serde(default = "crate::config::defaults::default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_chars_per_tick")]
    pub chars_per_tick: usize,
    #[serde(default = "crate::config::defaults::default_dot_ticks")]
    pub dot_ticks: u32,
    #[serde(default = "crate::config::defaults::default_saving_flash_secs")]
    pub saving_flash_secs: f32,
    #[serde(default = "crate::config::defaults::default_audio_timeout_secs")]
    pub audio_timeout_secs: f32,
    #[serde(default = "crate::config::defaults::default_clips_dir")]
    pub clips_dir: String,
    #[serde(default = "crate::config::defaults::default_volume")]
    pub volume: f32,
    #[serde(default = "crate::config::defaults::default_silent_clip_secs")]
    pub silent_clip_secs: f32,
    #[serde(default = "crate::config::defaults::default_lessons_dir")]
    pub lessons_dir: String,
    #[serde(default = "crate::config::defaults::default_cache_dir")]
    pub cache_dir: String,
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "crate::config::defaults::default_key_start")]
    pub key_start: String,
    #[serde(default = "crate::config::defaults::default_key_reset")]
    pub key_reset: String,
    #[serde(default = "crate::config::defaults::default_key_safe_quit")]
    pub key_safe_quit: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            theme: ThemeMode::default(),
            font_size: crate::config::defaults::default_font_size(),
            line_spacing: crate::config::defaults::default_line_spacing(),
            margin_horizontal: crate::config::defaults::default_margin_horizontal(),
            margin_vertical: crate::config::defaults::default_margin_vertical(),
            window_width: crate::config::defaults::default_window_width(),
            window_height: crate::config::defaults::default_window_height(),
            tick_interval_ms: crate::config::defaults::default_tick_interval_ms(),
            chars_per_tick: crate::config::defaults::default_chars_per_tick(),
            dot_ticks: crate::config::defaults::default_dot_ticks(),
            saving_flash_secs: crate::config::defaults::default_saving_flash_secs(),
            audio_timeout_secs: crate::config::defaults::default_audio_timeout_secs(),
            clips_dir: crate::config::defaults::default_clips_dir(),
            volume: crate::config::defaults::default_volume(),
            silent_clip_secs: crate::config::defaults::default_silent_clip_secs(),
            lessons_dir: crate::config::defaults::default_lessons_dir(),
            cache_dir: crate::config::defaults::default_cache_dir(),
            log_level: crate::config::defaults::default_log_level(),
            key_start: crate::config::defaults::default_key_start(),
            key_reset: crate::config::defaults::default_key_reset(),
            key_safe_quit: crate::config::defaults::default_key_safe_quit(),
        }
    }
}

const MAX_SAVING_FLASH: Duration = Duration::from_secs(60);
const MAX_AUDIO_TIMEOUT: Duration = Duration::from_secs(3600);
const MAX_SILENT_CLIP: Duration = Duration::from_secs(600);

impl AppConfig {
    /// Tick cadence, clamped to the 20..=500 ms range the typewriter reads well at.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.clamp(20, 500))
    }

    pub fn timeline_config(&self) -> TimelineConfig {
        TimelineConfig {
            chars_per_tick: self.chars_per_tick.max(1),
            dot_ticks: self.dot_ticks.max(1),
            saving_flash: bounded_secs(self.saving_flash_secs, MAX_SAVING_FLASH),
        }
    }

    pub fn audio_timeout(&self) -> Duration {
        bounded_secs(self.audio_timeout_secs, MAX_AUDIO_TIMEOUT).max(Duration::from_secs(1))
    }

    pub fn silent_clip_duration(&self) -> Duration {
        bounded_secs(self.silent_clip_secs, MAX_SILENT_CLIP)
    }
}

/// Seconds as a `Duration` in `0..=max`; negative or non-finite input reads as zero.
fn bounded_secs(value: f32, max: Duration) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::try_from_secs_f32(value).map_or(max, |secs| secs.min(max))
    } else {
        Duration::ZERO
    }
}

/// Theme mode.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeMode {
    #[default]
    Day,
    Night,
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
