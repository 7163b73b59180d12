use lesson_core::{AudioOutcome, LessonEntry};
use iced::keyboard::{Key, Modifiers};
use std::time::Instant;

/// Messages emitted by the UI and the runtime.
#[derive(Debug, Clone)]
pub enum Message {
    StartLesson,
    ResetLesson,
    LessonSelected(LessonEntry),
    ToggleTheme,
    SafeQuit,
    Tick(Instant),
    Wake(Instant),
    AudioFinished {
        paragraph: usize,
        generation: u64,
        outcome: AudioOutcome,
    },
    KeyPressed {
        key: Key,
        modifiers: Modifiers,
    },
    PollSystemSignals,
}
