//! Core of the lesson player: markup parsing, typewriter reveal, lesson
//! documents, the audio completion contract, and the lesson timeline.
//!
//! Nothing in this crate talks to a window or an audio device.

pub mod audio;
pub mod catalog;
pub mod markup;
pub mod reveal;
pub mod script;
pub mod timeline;

pub use audio::{AudioBridge, AudioOutcome, ClipId, Completion, SilentBridge, with_timeout};
pub use catalog::{LessonEntry, list_lessons};
pub use markup::{Fragment, Segment, parse};
pub use reveal::{reveal_all, revealed_length, visible_fragments};
pub use script::{Cue, LessonScript, ParagraphKind, load_script};
pub use timeline::{
    Frame, IndicatorKind, IndicatorState, LessonRun, LessonTimeline, ParagraphFrame,
    ParagraphPhase, TimelineAction, TimelineConfig, TimelineEvent,
};
