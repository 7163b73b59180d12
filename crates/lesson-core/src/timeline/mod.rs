//! The lesson timeline: a tick-driven typewriter over the lesson paragraphs,
//! narration playback requests, and status indicators scheduled relative to
//! narration completion.
//!
//! All mutation goes through [`LessonTimeline::handle`], which maps a
//! [`TimelineEvent`] to a list of [`TimelineAction`]s for the caller to carry
//! out. Deferred work lives in a [`DeferredQueue`] keyed to `Instant`
//! deadlines; every entry and every playback request is stamped with the run
//! generation so that anything outliving a reset is dropped on arrival.

pub mod constants;
mod deferred;
mod state;
mod transitions;

pub use deferred::{DeferredAction, DeferredQueue};
pub use state::{
    AudioState, IndicatorKind, IndicatorState, LessonRun, ParagraphPhase, ParagraphState,
};
pub use transitions::{TimelineAction, TimelineEvent};

use crate::audio::AudioOutcome;
use crate::markup::Segment;
use crate::reveal::reveal_all;
use crate::script::{Cue, LessonScript, ParagraphKind};
use constants::{DEFAULT_CHARS_PER_TICK, DEFAULT_DOT_TICKS, DEFAULT_SAVING_FLASH};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineConfig {
    pub chars_per_tick: usize,
    pub dot_ticks: u32,
    pub saving_flash: Duration,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            chars_per_tick: DEFAULT_CHARS_PER_TICK,
            dot_ticks: DEFAULT_DOT_TICKS,
            saving_flash: DEFAULT_SAVING_FLASH,
        }
    }
}

pub struct LessonTimeline {
    pub(crate) title: String,
    pub(crate) cues: Vec<Cue>,
    pub(crate) config: TimelineConfig,
    pub(crate) run: LessonRun,
    pub(crate) deferred: DeferredQueue,
}

/// Read model handed to the renderer each frame.
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub title: &'a str,
    pub running: bool,
    pub paragraphs: Vec<ParagraphFrame<'a>>,
    pub indicators: Vec<(IndicatorKind, IndicatorState)>,
}

#[derive(Debug, Clone)]
pub struct ParagraphFrame<'a> {
    pub index: usize,
    pub kind: ParagraphKind,
    pub phase: ParagraphPhase,
    pub segments: &'a [Segment],
    pub revealed: Vec<usize>,
}

impl LessonTimeline {
    pub fn new(script: &LessonScript, config: TimelineConfig) -> Self {
        let cues = script.compile();
        let run = LessonRun::new(cues.len(), 0);
        Self {
            title: script.title.clone(),
            cues,
            config,
            run,
            deferred: DeferredQueue::new(),
        }
    }

    pub fn handle(&mut self, event: TimelineEvent) -> Vec<TimelineAction> {
        transitions::transition(self, event)
    }

    pub fn start(&mut self, now: Instant) -> Vec<TimelineAction> {
        self.handle(TimelineEvent::Start { now })
    }

    pub fn reset(&mut self) -> Vec<TimelineAction> {
        self.handle(TimelineEvent::Reset)
    }

    pub fn tick(&mut self, now: Instant) -> Vec<TimelineAction> {
        self.handle(TimelineEvent::Tick { now })
    }

    pub fn wake(&mut self, now: Instant) -> Vec<TimelineAction> {
        self.handle(TimelineEvent::Wake { now })
    }

    pub fn audio_finished(
        &mut self,
        paragraph: usize,
        generation: u64,
        outcome: AudioOutcome,
        now: Instant,
    ) -> Vec<TimelineAction> {
        self.handle(TimelineEvent::AudioFinished {
            paragraph,
            generation,
            outcome,
            now,
        })
    }

    /// Swap in a different lesson. The generation always advances, so
    /// completions still in flight from the previous lesson are dropped.
    pub fn replace_script(&mut self, script: &LessonScript) -> Vec<TimelineAction> {
        let actions = self.reset();
        let generation = self.run.generation.wrapping_add(1);
        self.deferred.cancel_all();
        self.title = script.title.clone();
        self.cues = script.compile();
        self.run = LessonRun::new(self.cues.len(), generation);
        actions
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn run(&self) -> &LessonRun {
        &self.run
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn is_running(&self) -> bool {
        self.run.running
    }

    /// True while anything needs the periodic tick.
    pub fn needs_tick(&self) -> bool {
        self.run.is_typing() || self.run.any_indicator_visible()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deferred.next_deadline()
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    pub fn frame(&self) -> Frame<'_> {
        let paragraphs = self
            .cues
            .iter()
            .zip(self.run.paragraphs.iter())
            .enumerate()
            .filter(|(_, (_, state))| state.phase != ParagraphPhase::Pending)
            .map(|(index, (cue, state))| ParagraphFrame {
                index,
                kind: cue.kind,
                phase: state.phase,
                segments: &cue.segments,
                revealed: reveal_all(&cue.segments, state.revealed),
            })
            .collect();

        let indicators = IndicatorKind::ALL
            .iter()
            .map(|kind| (*kind, *self.run.indicator(*kind)))
            .collect();

        Frame {
            title: &self.title,
            running: self.run.running,
            paragraphs,
            indicators,
        }
    }
}
