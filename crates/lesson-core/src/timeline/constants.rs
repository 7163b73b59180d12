//! Hand-tuned timings of the built-in lesson and the timeline defaults.

use std::time::Duration;

pub const P1_WAITING_SECS: f32 = 8.0;
pub const P1_ANALYZING_SECS: f32 = 2.0;
pub const P1_NEXT_DELAY_SECS: f32 = 10.0;
pub const P2_NEXT_DELAY_SECS: f32 = 10.0;
pub const P3_WAITING_SECS: f32 = 6.0;
pub const P3_ANALYZING_SECS: f32 = 2.0;
pub const P3_NEXT_DELAY_SECS: f32 = 8.0;
pub const DEFAULT_NEXT_DELAY_SECS: f32 = 10.0;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(70);
pub const DEFAULT_CHARS_PER_TICK: usize = 1;
pub const DEFAULT_DOT_TICKS: u32 = 4;
pub const DEFAULT_SAVING_FLASH: Duration = Duration::from_secs(2);

/// Longest single delay a lesson may schedule.
pub const MAX_STEP_SECS: f32 = 3600.0;
pub const MAX_STEP: Duration = Duration::from_secs(3600);

pub const MIN_DOTS: u8 = 1;
pub const MAX_DOTS: u8 = 3;
