use crate::audio::bridge_from_config;
use crate::cache::{LessonProgress, lesson_key, load_progress};
use crate::config::AppConfig;
use iced::Task;
use lesson_core::{AudioBridge, LessonEntry, LessonScript, LessonTimeline, list_lessons};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::messages::Message;

pub(crate) const MIN_FONT_SIZE: u32 = 12;
pub(crate) const MAX_FONT_SIZE: u32 = 72;

/// Core application state.
pub struct App {
    pub(super) config: AppConfig,
    pub(super) timeline: LessonTimeline,
    pub(super) lesson_path: Option<PathBuf>,
    pub(super) lessons: Vec<LessonEntry>,
    pub(super) selected_lesson: Option<LessonEntry>,
    pub(super) audio: Arc<dyn AudioBridge>,
    pub(super) progress: LessonProgress,
    pub(super) load_error: Option<String>,
}

impl App {
    pub(super) fn bootstrap(
        script: LessonScript,
        config: AppConfig,
        lesson_path: Option<PathBuf>,
    ) -> (App, Task<Message>) {
        let audio = bridge_from_config(&config);
        let app = Self::with_audio(script, config, lesson_path, audio);
        tracing::info!(
            title = %app.timeline.title(),
            lessons = app.lessons.len(),
            completed_runs = app.progress.completed_runs,
            "Initialized app state"
        );
        (app, Task::none())
    }

    pub(super) fn with_audio(
        script: LessonScript,
        mut config: AppConfig,
        lesson_path: Option<PathBuf>,
        audio: Arc<dyn AudioBridge>,
    ) -> App {
        config.font_size = config.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        config.line_spacing = config.line_spacing.clamp(0.8, 2.5);

        let timeline = LessonTimeline::new(&script, config.timeline_config());
        let lessons = list_lessons(Path::new(&config.lessons_dir));
        let selected_lesson = lesson_path
            .as_ref()
            .and_then(|path| lessons.iter().find(|entry| &entry.path == path).cloned());
        let progress = load_progress(
            Path::new(&config.cache_dir),
            &lesson_key(lesson_path.as_deref()),
        );

        App {
            config,
            timeline,
            lesson_path,
            lessons,
            selected_lesson,
            audio,
            progress,
            load_error: None,
        }
    }

    pub(super) fn progress_key(&self) -> String {
        lesson_key(self.lesson_path.as_deref())
    }
}
