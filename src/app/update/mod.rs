use lesson_core::ClipId;
use std::time::Instant;

mod appearance;
mod core;
mod lesson;

/// Describes work that must be performed outside the pure reducer.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Effect {
    PlayClip {
        paragraph: usize,
        clip: ClipId,
        generation: u64,
    },
    StopAudio,
    WakeAt(Instant),
    SaveProgress,
    SaveConfig,
    QuitSafely,
}
