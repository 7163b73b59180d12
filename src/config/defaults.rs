use lesson_core::timeline::constants::{
    DEFAULT_CHARS_PER_TICK, DEFAULT_DOT_TICKS, DEFAULT_SAVING_FLASH, DEFAULT_TICK_INTERVAL,
};

pub(crate) fn default_font_size() -> u32 {
    26
}

pub(crate) fn default_line_spacing() -> f32 {
    1.3
}

pub(crate) fn default_margin_horizontal() -> u16 {
    80
}

pub(crate) fn default_margin_vertical() -> u16 {
    24
}

pub(crate) fn default_window_width() -> f32 {
    1024.0
}

pub(crate) fn default_window_height() -> f32 {
    768.0
}

pub(crate) fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL.as_millis() as u64
}

pub(crate) fn default_chars_per_tick() -> usize {
    DEFAULT_CHARS_PER_TICK
}

pub(crate) fn default_dot_ticks() -> u32 {
    DEFAULT_DOT_TICKS
}

pub(crate) fn default_saving_flash_secs() -> f32 {
    DEFAULT_SAVING_FLASH.as_secs_f32()
}

pub(crate) fn default_audio_timeout_secs() -> f32 {
    120.0
}

pub(crate) fn default_clips_dir() -> String {
    "assets/clips".to_string()
}

pub(crate) fn default_volume() -> f32 {
    1.0
}

pub(crate) fn default_silent_clip_secs() -> f32 {
    4.0
}

pub(crate) fn default_lessons_dir() -> String {
    "lessons".to_string()
}

pub(crate) fn default_cache_dir() -> String {
    ".cache".to_string()
}

pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Debug
}

pub(crate) fn default_key_start() -> String {
    "space".to_string()
}

pub(crate) fn default_key_reset() -> String {
    "n".to_string()
}

pub(crate) fn default_key_safe_quit() -> String {
    "q".to_string()
}
