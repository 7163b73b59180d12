use super::super::state::App;
use super::Effect;
use crate::cache::{load_progress, save_progress};
use lesson_core::{AudioOutcome, LessonEntry, TimelineAction, load_script};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

impl App {
    pub(super) fn handle_start_lesson(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        info!(title = %self.timeline.title(), "Start requested");
        self.load_error = None;
        let actions = self.timeline.start(now);
        self.apply_timeline_actions(actions, effects);
    }

    pub(super) fn handle_reset_lesson(&mut self, effects: &mut Vec<Effect>) {
        info!(title = %self.timeline.title(), "Reset requested");
        let actions = self.timeline.reset();
        self.apply_timeline_actions(actions, effects);
    }

    pub(super) fn handle_tick(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        let actions = self.timeline.tick(now);
        self.apply_timeline_actions(actions, effects);
    }

    pub(super) fn handle_wake(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        let actions = self.timeline.wake(now);
        self.apply_timeline_actions(actions, effects);
    }

    pub(super) fn handle_audio_finished(
        &mut self,
        paragraph: usize,
        generation: u64,
        outcome: AudioOutcome,
        now: Instant,
        effects: &mut Vec<Effect>,
    ) {
        let actions = self
            .timeline
            .audio_finished(paragraph, generation, outcome, now);
        self.apply_timeline_actions(actions, effects);
    }

    pub(super) fn handle_lesson_selected(&mut self, entry: LessonEntry, effects: &mut Vec<Effect>) {
        if self.selected_lesson.as_ref() == Some(&entry) {
            debug!(path = %entry.path.display(), "Lesson already selected");
            return;
        }

        let script = match load_script(&entry.path) {
            Ok(script) => script,
            Err(err) => {
                warn!(path = %entry.path.display(), "Failed to load lesson: {err:#}");
                self.load_error = Some(format!("Could not load {}: {err:#}", entry.title));
                return;
            }
        };

        let actions = self.timeline.replace_script(&script);
        self.apply_timeline_actions(actions, effects);
        self.lesson_path = Some(entry.path.clone());
        self.progress = load_progress(Path::new(&self.config.cache_dir), &self.progress_key());
        info!(
            title = %script.title,
            paragraphs = script.paragraphs.len(),
            completed_runs = self.progress.completed_runs,
            "Switched lesson"
        );
        self.selected_lesson = Some(entry);
        self.load_error = None;
    }

    fn apply_timeline_actions(&mut self, actions: Vec<TimelineAction>, effects: &mut Vec<Effect>) {
        for action in actions {
            match action {
                TimelineAction::PlayClip {
                    paragraph,
                    clip,
                    generation,
                } => effects.push(Effect::PlayClip {
                    paragraph,
                    clip,
                    generation,
                }),
                TimelineAction::StopAudio => effects.push(Effect::StopAudio),
                TimelineAction::WakeAt(at) => effects.push(Effect::WakeAt(at)),
                TimelineAction::SaveProgress => {
                    let title = self.timeline.title().to_string();
                    self.progress.record_completion(&title);
                    effects.push(Effect::SaveProgress);
                }
                TimelineAction::RunFinished => {
                    info!(
                        title = %self.timeline.title(),
                        completed_runs = self.progress.completed_runs,
                        "Lesson complete"
                    );
                }
            }
        }
    }

    pub(super) fn persist_progress(&self) {
        let key = self.progress_key();
        if let Err(err) = save_progress(Path::new(&self.config.cache_dir), &key, &self.progress) {
            warn!(key = %key, "Failed to save lesson progress: {err:#}");
        }
    }
}
