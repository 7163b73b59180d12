use super::constants::{MAX_DOTS, MIN_DOTS};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Waiting,
    Analyzing,
    Saving,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 3] = [
        IndicatorKind::Waiting,
        IndicatorKind::Analyzing,
        IndicatorKind::Saving,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IndicatorKind::Waiting => "waiting",
            IndicatorKind::Analyzing => "analyzing answer",
            IndicatorKind::Saving => "saving progress",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndicatorState {
    pub visible: bool,
    pub dots_phase: u8,
    pub(crate) ticks: u32,
}

impl Default for IndicatorState {
    fn default() -> Self {
        Self {
            visible: false,
            dots_phase: MIN_DOTS,
            ticks: 0,
        }
    }
}

impl IndicatorState {
    pub(crate) fn show(&mut self) {
        self.visible = true;
        self.dots_phase = MIN_DOTS;
        self.ticks = 0;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }

    pub(crate) fn tick(&mut self, dot_ticks: u32) {
        if !self.visible {
            return;
        }
        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % dot_ticks.max(1) == 0 {
            self.dots_phase = if self.dots_phase >= MAX_DOTS {
                MIN_DOTS
            } else {
                self.dots_phase + 1
            };
        }
    }

    /// Status line with the animated ellipsis, e.g. `"waiting.."`.
    pub fn text(&self, kind: IndicatorKind) -> String {
        format!("{}{}", kind.label(), ".".repeat(self.dots_phase as usize))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphPhase {
    #[default]
    Pending,
    Typing,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioState {
    #[default]
    Idle,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ParagraphState {
    pub phase: ParagraphPhase,
    pub revealed: usize,
    pub audio: AudioState,
    pub next_scheduled: bool,
}

/// Everything mutable about one execution of the lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonRun {
    pub running: bool,
    pub generation: u64,
    pub paragraphs: Vec<ParagraphState>,
    pub waiting: IndicatorState,
    pub analyzing: IndicatorState,
    pub saving: IndicatorState,
    pub saving_flashed: bool,
    pub finish_pending: bool,
}

impl LessonRun {
    pub(crate) fn new(paragraph_count: usize, generation: u64) -> Self {
        Self {
            running: false,
            generation,
            paragraphs: vec![ParagraphState::default(); paragraph_count],
            waiting: IndicatorState::default(),
            analyzing: IndicatorState::default(),
            saving: IndicatorState::default(),
            saving_flashed: false,
            finish_pending: false,
        }
    }

    pub fn indicator(&self, kind: IndicatorKind) -> &IndicatorState {
        match kind {
            IndicatorKind::Waiting => &self.waiting,
            IndicatorKind::Analyzing => &self.analyzing,
            IndicatorKind::Saving => &self.saving,
        }
    }

    pub(crate) fn indicator_mut(&mut self, kind: IndicatorKind) -> &mut IndicatorState {
        match kind {
            IndicatorKind::Waiting => &mut self.waiting,
            IndicatorKind::Analyzing => &mut self.analyzing,
            IndicatorKind::Saving => &mut self.saving,
        }
    }

    pub fn any_indicator_visible(&self) -> bool {
        IndicatorKind::ALL
            .iter()
            .any(|kind| self.indicator(*kind).visible)
    }

    pub fn is_typing(&self) -> bool {
        self.paragraphs
            .iter()
            .any(|p| p.phase == ParagraphPhase::Typing)
    }
}
