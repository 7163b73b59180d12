use super::deferred::DeferredAction;
use super::state::{AudioState, IndicatorKind, LessonRun, ParagraphPhase};
use super::LessonTimeline;
use crate::audio::{AudioOutcome, ClipId};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub enum TimelineEvent {
    Start {
        now: Instant,
    },
    Reset,
    Tick {
        now: Instant,
    },
    AudioFinished {
        paragraph: usize,
        generation: u64,
        outcome: AudioOutcome,
        now: Instant,
    },
    Wake {
        now: Instant,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineAction {
    PlayClip {
        paragraph: usize,
        clip: ClipId,
        generation: u64,
    },
    StopAudio,
    WakeAt(Instant),
    SaveProgress,
    RunFinished,
}

pub(super) fn transition(timeline: &mut LessonTimeline, event: TimelineEvent) -> Vec<TimelineAction> {
    let mut actions = Vec::new();
    match event {
        TimelineEvent::Start { now } => on_start(timeline, now, &mut actions),
        TimelineEvent::Reset => cancel_run(timeline, &mut actions),
        TimelineEvent::Tick { now } => on_tick(timeline, now, &mut actions),
        TimelineEvent::AudioFinished {
            paragraph,
            generation,
            outcome,
            now,
        } => on_audio_finished(timeline, paragraph, generation, outcome, now, &mut actions),
        TimelineEvent::Wake { now } => fire_due(timeline, now, &mut actions),
    }
    actions
}

fn on_start(timeline: &mut LessonTimeline, now: Instant, actions: &mut Vec<TimelineAction>) {
    cancel_run(timeline, actions);
    timeline.run.running = true;
    info!(
        title = %timeline.title,
        generation = timeline.run.generation,
        paragraphs = timeline.cues.len(),
        "Starting lesson run"
    );
    start_paragraph(timeline, 0, now, actions);
}

/// Drop every deferred action and reinitialize the run. A run already in its
/// initial state is left untouched so repeated resets are idempotent.
fn cancel_run(timeline: &mut LessonTimeline, actions: &mut Vec<TimelineAction>) {
    let pristine = LessonRun::new(timeline.cues.len(), timeline.run.generation);
    if timeline.run == pristine && timeline.deferred.is_empty() {
        debug!(generation = timeline.run.generation, "Run already reset");
        return;
    }

    let audio_active = timeline
        .run
        .paragraphs
        .iter()
        .any(|p| p.audio == AudioState::Playing);
    if timeline.run.running || audio_active {
        actions.push(TimelineAction::StopAudio);
    }

    let cancelled = timeline.deferred.cancel_all();
    let generation = timeline.run.generation.wrapping_add(1);
    info!(
        cancelled,
        previous = timeline.run.generation,
        generation,
        "Reset lesson run"
    );
    timeline.run = LessonRun::new(timeline.cues.len(), generation);
}

fn on_tick(timeline: &mut LessonTimeline, now: Instant, actions: &mut Vec<TimelineAction>) {
    let last = timeline.cues.len().saturating_sub(1);
    let step = timeline.config.chars_per_tick.max(1);
    let mut completed_last = false;

    for (idx, (state, cue)) in timeline
        .run
        .paragraphs
        .iter_mut()
        .zip(timeline.cues.iter())
        .enumerate()
    {
        if state.phase != ParagraphPhase::Typing {
            continue;
        }
        state.revealed = (state.revealed + step).min(cue.total_len);
        if state.revealed >= cue.total_len {
            state.phase = ParagraphPhase::Complete;
            debug!(paragraph = idx, chars = cue.total_len, "Paragraph fully typed");
            if idx == last {
                completed_last = true;
            }
        }
    }

    if completed_last && timeline.run.running && !timeline.run.saving_flashed {
        flash_saving(timeline, now, actions);
    }

    let dot_ticks = timeline.config.dot_ticks;
    for kind in IndicatorKind::ALL {
        timeline.run.indicator_mut(kind).tick(dot_ticks);
    }

    fire_due(timeline, now, actions);
}

fn on_audio_finished(
    timeline: &mut LessonTimeline,
    paragraph: usize,
    generation: u64,
    outcome: AudioOutcome,
    now: Instant,
    actions: &mut Vec<TimelineAction>,
) {
    if generation != timeline.run.generation {
        debug!(
            paragraph,
            generation,
            current = timeline.run.generation,
            "Ignoring audio completion from a previous run"
        );
        return;
    }
    if !timeline.run.running {
        debug!(paragraph, "Ignoring audio completion while no run is active");
        return;
    }
    let Some(state) = timeline.run.paragraphs.get_mut(paragraph) else {
        warn!(paragraph, "Audio completion for unknown paragraph");
        return;
    };
    if state.next_scheduled || state.audio != AudioState::Playing {
        debug!(paragraph, "Ignoring duplicate audio completion");
        return;
    }

    match &outcome {
        AudioOutcome::Finished => debug!(paragraph, "Narration finished"),
        AudioOutcome::Failed(reason) => {
            warn!(paragraph, %reason, "Narration failed; continuing the lesson")
        }
        AudioOutcome::TimedOut => {
            warn!(paragraph, "Narration never reported completion; continuing the lesson")
        }
    }

    state.audio = AudioState::Finished;
    state.next_scheduled = true;

    let cue = &timeline.cues[paragraph];
    let review = cue.review;
    let next_delay = cue.next_delay;

    if let Some((waiting, analyzing)) = review {
        timeline.run.indicator_mut(IndicatorKind::Waiting).show();
        defer(
            timeline,
            now,
            waiting,
            DeferredAction::HideIndicator(IndicatorKind::Waiting),
            actions,
        );
        defer(
            timeline,
            now,
            waiting,
            DeferredAction::ShowIndicator(IndicatorKind::Analyzing),
            actions,
        );
        defer(
            timeline,
            now,
            waiting.saturating_add(analyzing),
            DeferredAction::HideIndicator(IndicatorKind::Analyzing),
            actions,
        );
    }

    let next = paragraph + 1;
    if next < timeline.cues.len() {
        info!(
            paragraph,
            next,
            delay_ms = next_delay.as_millis() as u64,
            "Scheduling next paragraph"
        );
        defer(
            timeline,
            now,
            next_delay,
            DeferredAction::StartParagraph(next),
            actions,
        );
    }
    finish_if_settled(timeline, actions);
}

fn start_paragraph(
    timeline: &mut LessonTimeline,
    paragraph: usize,
    now: Instant,
    actions: &mut Vec<TimelineAction>,
) {
    if !timeline.run.running {
        return;
    }
    let Some(cue) = timeline.cues.get(paragraph) else {
        warn!(paragraph, "Cannot start unknown paragraph");
        return;
    };
    let clip = cue.clip.clone();
    let generation = timeline.run.generation;

    let state = &mut timeline.run.paragraphs[paragraph];
    state.phase = ParagraphPhase::Typing;
    state.revealed = 0;
    state.audio = AudioState::Playing;
    info!(paragraph, generation, "Paragraph started");

    match clip {
        Some(clip) => actions.push(TimelineAction::PlayClip {
            paragraph,
            clip,
            generation,
        }),
        None => on_audio_finished(
            timeline,
            paragraph,
            generation,
            AudioOutcome::Finished,
            now,
            actions,
        ),
    }
}

fn flash_saving(timeline: &mut LessonTimeline, now: Instant, actions: &mut Vec<TimelineAction>) {
    timeline.run.saving_flashed = true;
    timeline.run.indicator_mut(IndicatorKind::Saving).show();
    actions.push(TimelineAction::SaveProgress);
    let flash = timeline.config.saving_flash;
    defer(
        timeline,
        now,
        flash,
        DeferredAction::HideIndicator(IndicatorKind::Saving),
        actions,
    );
    defer(timeline, now, flash, DeferredAction::FinishRun, actions);
}

fn fire_due(timeline: &mut LessonTimeline, now: Instant, actions: &mut Vec<TimelineAction>) {
    for (generation, action) in timeline.deferred.drain_due(now) {
        if generation != timeline.run.generation {
            debug!(
                ?action,
                generation,
                current = timeline.run.generation,
                "Dropping stale deferred action"
            );
            continue;
        }
        match action {
            DeferredAction::ShowIndicator(kind) => {
                debug!(?kind, "Showing indicator");
                timeline.run.indicator_mut(kind).show();
            }
            DeferredAction::HideIndicator(kind) => {
                debug!(?kind, "Hiding indicator");
                timeline.run.indicator_mut(kind).hide();
            }
            DeferredAction::StartParagraph(paragraph) => {
                start_paragraph(timeline, paragraph, now, actions);
            }
            DeferredAction::FinishRun => {
                timeline.run.finish_pending = true;
            }
        }
    }
    finish_if_settled(timeline, actions);
}

/// End the run once the saving flash is over, the final narration has
/// reported back, and no indicator or deferred action remains.
fn finish_if_settled(timeline: &mut LessonTimeline, actions: &mut Vec<TimelineAction>) {
    let run = &timeline.run;
    if !run.finish_pending || !run.running {
        return;
    }
    let narration_done = run
        .paragraphs
        .last()
        .is_none_or(|p| p.audio == AudioState::Finished);
    if !narration_done || run.any_indicator_visible() || !timeline.deferred.is_empty() {
        debug!(narration_done, "Holding run open for the final paragraph");
        return;
    }
    timeline.run.finish_pending = false;
    timeline.run.running = false;
    info!(generation = timeline.run.generation, "Lesson run finished");
    actions.push(TimelineAction::RunFinished);
}

fn defer(
    timeline: &mut LessonTimeline,
    now: Instant,
    delay: Duration,
    action: DeferredAction,
    actions: &mut Vec<TimelineAction>,
) {
    let Some(due) = now.checked_add(delay) else {
        warn!(?action, delay_secs = delay.as_secs(), "Deferred action out of range; skipping");
        return;
    };
    timeline
        .deferred
        .schedule(due, timeline.run.generation, action);
    let wake = TimelineAction::WakeAt(due);
    if !actions.contains(&wake) {
        actions.push(wake);
    }
}

#[cfg(test)]
mod tests {
    use super::super::{LessonTimeline, TimelineConfig};
    use super::*;
    use crate::script::{LessonScript, ParagraphKind, ParagraphSource, ReviewTiming};
    use crate::timeline::constants::MAX_STEP;

    fn secs(value: u64) -> Duration {
        Duration::from_secs(value)
    }

    fn builtin_timeline() -> LessonTimeline {
        LessonTimeline::new(&LessonScript::builtin(), TimelineConfig::default())
    }

    fn short_script() -> LessonScript {
        LessonScript {
            title: "short".to_string(),
            paragraphs: vec![
                ParagraphSource {
                    kind: ParagraphKind::Narration,
                    text: "ab".to_string(),
                    clip: Some("one".to_string()),
                    review: Some(ReviewTiming {
                        waiting_secs: 1.0,
                        analyzing_secs: 1.0,
                    }),
                    next_delay_secs: 2.0,
                },
                ParagraphSource {
                    kind: ParagraphKind::Feedback,
                    text: "cd".to_string(),
                    clip: Some("two".to_string()),
                    review: None,
                    next_delay_secs: 0.0,
                },
            ],
        }
    }

    fn play_clips(actions: &[TimelineAction]) -> Vec<usize> {
        actions
            .iter()
            .filter_map(|action| match action {
                TimelineAction::PlayClip { paragraph, .. } => Some(*paragraph),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_types_first_paragraph_and_plays_its_clip() {
        let mut timeline = builtin_timeline();
        let t0 = Instant::now();
        let actions = timeline.start(t0);

        assert!(timeline.is_running());
        assert_eq!(play_clips(&actions), vec![0]);
        assert_eq!(timeline.run().paragraphs[0].phase, ParagraphPhase::Typing);

        timeline.tick(t0 + Duration::from_millis(70));
        timeline.tick(t0 + Duration::from_millis(140));
        assert_eq!(timeline.run().paragraphs[0].revealed, 2);
        assert_eq!(timeline.run().paragraphs[1].phase, ParagraphPhase::Pending);
    }

    #[test]
    fn narration_end_drives_indicators_and_next_paragraph() {
        let mut timeline = builtin_timeline();
        let t0 = Instant::now();
        timeline.start(t0);
        let generation = timeline.run().generation;

        let actions = timeline.audio_finished(0, generation, AudioOutcome::Finished, t0);
        assert!(actions.contains(&TimelineAction::WakeAt(t0 + secs(8))));
        assert!(actions.contains(&TimelineAction::WakeAt(t0 + secs(10))));
        assert!(timeline.run().waiting.visible);
        assert!(!timeline.run().analyzing.visible);

        timeline.wake(t0 + Duration::from_millis(7_999));
        assert!(timeline.run().waiting.visible);
        assert!(!timeline.run().analyzing.visible);

        timeline.wake(t0 + secs(8));
        assert!(!timeline.run().waiting.visible);
        assert!(timeline.run().analyzing.visible);

        timeline.wake(t0 + secs(9));
        assert!(timeline.run().analyzing.visible);
        assert_eq!(timeline.run().paragraphs[1].phase, ParagraphPhase::Pending);

        let actions = timeline.wake(t0 + secs(10));
        assert!(!timeline.run().analyzing.visible);
        assert_eq!(timeline.run().paragraphs[1].phase, ParagraphPhase::Typing);
        assert_eq!(timeline.run().paragraphs[1].revealed, 0);
        assert_eq!(play_clips(&actions), vec![1]);
    }

    #[test]
    fn reset_during_waiting_cancels_everything() {
        let mut timeline = builtin_timeline();
        let t0 = Instant::now();
        timeline.start(t0);
        let generation = timeline.run().generation;
        timeline.audio_finished(0, generation, AudioOutcome::Finished, t0);
        timeline.wake(t0 + secs(5));
        assert!(timeline.run().waiting.visible);

        let actions = timeline.reset();
        assert_eq!(actions, vec![TimelineAction::StopAudio]);
        assert_eq!(timeline.pending_deferred(), 0);
        assert!(!timeline.is_running());

        for at in [8, 10, 20] {
            let actions = timeline.wake(t0 + secs(at));
            assert!(actions.is_empty());
            assert!(!timeline.run().any_indicator_visible());
            assert_eq!(timeline.run().paragraphs[1].phase, ParagraphPhase::Pending);
        }
    }

    #[test]
    fn reset_is_idempotent() {
        let mut timeline = builtin_timeline();
        let t0 = Instant::now();
        timeline.start(t0);
        let generation = timeline.run().generation;
        timeline.audio_finished(0, generation, AudioOutcome::Finished, t0);

        timeline.reset();
        let once = timeline.run().clone();
        let actions = timeline.reset();
        assert!(actions.is_empty());
        assert_eq!(timeline.run(), &once);
        assert_eq!(timeline.pending_deferred(), 0);
    }

    #[test]
    fn duplicate_completion_does_not_double_schedule() {
        let mut timeline = builtin_timeline();
        let t0 = Instant::now();
        timeline.start(t0);
        let generation = timeline.run().generation;

        timeline.audio_finished(0, generation, AudioOutcome::Finished, t0);
        let pending = timeline.pending_deferred();
        let actions =
            timeline.audio_finished(0, generation, AudioOutcome::Finished, t0 + secs(1));
        assert!(actions.is_empty());
        assert_eq!(timeline.pending_deferred(), pending);

        let actions = timeline.wake(t0 + secs(30));
        assert_eq!(play_clips(&actions), vec![1]);
        assert_eq!(timeline.pending_deferred(), 0);
    }

    #[test]
    fn completion_from_previous_run_is_ignored() {
        let mut timeline = builtin_timeline();
        let t0 = Instant::now();
        timeline.start(t0);
        let stale = timeline.run().generation;

        let actions = timeline.start(t0 + secs(1));
        assert!(actions.contains(&TimelineAction::StopAudio));
        assert_ne!(timeline.run().generation, stale);

        let actions = timeline.audio_finished(0, stale, AudioOutcome::Finished, t0 + secs(2));
        assert!(actions.is_empty());
        assert!(!timeline.run().waiting.visible);
        assert_eq!(timeline.pending_deferred(), 0);
    }

    #[test]
    fn failed_narration_still_advances() {
        let mut timeline = builtin_timeline();
        let t0 = Instant::now();
        timeline.start(t0);
        let generation = timeline.run().generation;

        timeline.audio_finished(
            0,
            generation,
            AudioOutcome::Failed("clip not found".to_string()),
            t0,
        );
        assert!(timeline.run().waiting.visible);
        let actions = timeline.wake(t0 + secs(10));
        assert_eq!(play_clips(&actions), vec![1]);
    }

    #[test]
    fn third_paragraph_uses_its_own_review_timing() {
        let mut timeline = builtin_timeline();
        let t0 = Instant::now();
        timeline.start(t0);
        let generation = timeline.run().generation;

        timeline.audio_finished(0, generation, AudioOutcome::Finished, t0);
        timeline.wake(t0 + secs(10));
        timeline.audio_finished(1, generation, AudioOutcome::Finished, t0 + secs(12));
        assert!(!timeline.run().waiting.visible);
        timeline.wake(t0 + secs(22));
        assert_eq!(timeline.run().paragraphs[2].phase, ParagraphPhase::Typing);

        let t3 = t0 + secs(30);
        timeline.audio_finished(2, generation, AudioOutcome::TimedOut, t3);
        assert!(timeline.run().waiting.visible);
        timeline.wake(t3 + secs(6));
        assert!(!timeline.run().waiting.visible);
        assert!(timeline.run().analyzing.visible);
        timeline.wake(t3 + secs(8));
        assert!(!timeline.run().analyzing.visible);
        assert_eq!(timeline.run().paragraphs[3].phase, ParagraphPhase::Typing);
    }

    #[test]
    fn final_paragraph_flashes_saving_once_then_finishes() {
        let config = TimelineConfig {
            saving_flash: secs(2),
            ..TimelineConfig::default()
        };
        let mut timeline = LessonTimeline::new(&short_script(), config);
        let t0 = Instant::now();
        timeline.start(t0);
        let generation = timeline.run().generation;
        timeline.tick(t0);
        timeline.tick(t0);
        assert_eq!(timeline.run().paragraphs[0].phase, ParagraphPhase::Complete);
        assert!(!timeline.run().saving.visible);

        timeline.audio_finished(0, generation, AudioOutcome::Finished, t0);
        timeline.wake(t0 + secs(2));
        assert_eq!(timeline.run().paragraphs[1].phase, ParagraphPhase::Typing);

        let t1 = t0 + secs(3);
        timeline.tick(t1);
        let actions = timeline.tick(t1);
        assert!(actions.contains(&TimelineAction::SaveProgress));
        assert!(timeline.run().saving.visible);
        assert!(timeline.run().saving_flashed);

        let actions = timeline.tick(t1 + Duration::from_millis(70));
        assert!(!actions.contains(&TimelineAction::SaveProgress));

        timeline.audio_finished(1, generation, AudioOutcome::Finished, t1);
        assert!(timeline.is_running());

        let actions = timeline.wake(t1 + secs(2));
        assert!(actions.contains(&TimelineAction::RunFinished));
        assert!(!timeline.run().saving.visible);
        assert!(!timeline.is_running());
    }

    #[test]
    fn run_waits_for_final_narration_and_its_review() {
        let mut script = short_script();
        script.paragraphs[1].review = Some(ReviewTiming {
            waiting_secs: 3.0,
            analyzing_secs: 1.0,
        });
        let mut timeline = LessonTimeline::new(&script, TimelineConfig::default());
        let t0 = Instant::now();
        timeline.start(t0);
        let generation = timeline.run().generation;
        timeline.audio_finished(0, generation, AudioOutcome::Finished, t0);
        timeline.wake(t0 + secs(2));
        assert_eq!(timeline.run().paragraphs[1].phase, ParagraphPhase::Typing);

        let t1 = t0 + secs(3);
        timeline.tick(t1);
        timeline.tick(t1);
        assert!(timeline.run().saving_flashed);

        let actions = timeline.wake(t1 + secs(2));
        assert!(!actions.contains(&TimelineAction::RunFinished));
        assert!(timeline.is_running());
        assert!(timeline.run().finish_pending);

        let t2 = t1 + secs(5);
        let actions = timeline.audio_finished(1, generation, AudioOutcome::Finished, t2);
        assert!(!actions.contains(&TimelineAction::RunFinished));
        assert!(timeline.run().waiting.visible);

        timeline.wake(t2 + secs(3));
        assert!(timeline.run().analyzing.visible);
        assert!(timeline.is_running());

        let actions = timeline.wake(t2 + secs(4));
        assert!(actions.contains(&TimelineAction::RunFinished));
        assert!(!timeline.run().any_indicator_visible());
        assert!(!timeline.is_running());
    }

    #[test]
    fn oversized_delay_is_clamped_instead_of_overflowing() {
        let mut script = short_script();
        script.paragraphs[0].next_delay_secs = 1e19;
        let mut timeline = LessonTimeline::new(&script, TimelineConfig::default());
        let t0 = Instant::now();
        timeline.start(t0);
        let generation = timeline.run().generation;

        let actions = timeline.audio_finished(0, generation, AudioOutcome::Finished, t0);
        assert!(actions.contains(&TimelineAction::WakeAt(t0 + MAX_STEP)));
        assert!(timeline.run().paragraphs[0].next_scheduled);
    }

    #[test]
    fn paragraph_without_clip_counts_as_narrated() {
        let mut script = short_script();
        script.paragraphs[0].clip = None;
        let mut timeline = LessonTimeline::new(&script, TimelineConfig::default());
        let t0 = Instant::now();
        let actions = timeline.start(t0);
        assert!(play_clips(&actions).is_empty());
        assert!(timeline.run().waiting.visible);
        assert_eq!(timeline.run().paragraphs[0].audio, AudioState::Finished);
        assert!(timeline.run().paragraphs[0].next_scheduled);
    }

    #[test]
    fn replacing_the_script_invalidates_in_flight_audio() {
        let mut timeline = builtin_timeline();
        let t0 = Instant::now();
        timeline.start(t0);
        let old = timeline.run().generation;

        let actions = timeline.replace_script(&short_script());
        assert_eq!(actions, vec![TimelineAction::StopAudio]);
        assert_eq!(timeline.title(), "short");
        assert_eq!(timeline.run().paragraphs.len(), 2);

        timeline.start(t0 + secs(1));
        assert_ne!(timeline.run().generation, old);
        let actions = timeline.audio_finished(0, old, AudioOutcome::Finished, t0 + secs(2));
        assert!(actions.is_empty());
        assert!(!timeline.run().paragraphs[0].next_scheduled);
    }

    #[test]
    fn frame_reports_revealed_segments() {
        let mut timeline = builtin_timeline();
        let t0 = Instant::now();
        assert!(timeline.frame().paragraphs.is_empty());
        timeline.start(t0);
        for _ in 0..3 {
            timeline.tick(t0);
        }
        let frame = timeline.frame();
        assert_eq!(frame.paragraphs.len(), 1);
        assert_eq!(frame.paragraphs[0].revealed.iter().sum::<usize>(), 3);
        assert_eq!(frame.indicators.len(), 3);
    }
}
