mod messages;
mod state;
mod update;
mod view;

pub use state::App;

use crate::config::AppConfig;
use lesson_core::LessonScript;
use iced::{Size, Theme, window};
use std::path::PathBuf;

/// Launch the player with the lesson to show first.
pub fn run_app(
    script: LessonScript,
    config: AppConfig,
    lesson_path: Option<PathBuf>,
) -> iced::Result {
    let window_settings = window::Settings {
        size: Size::new(config.window_width, config.window_height),
        ..window::Settings::default()
    };

    iced::application("Sketchpad Lessons", App::update, App::view)
        .window(window_settings)
        .subscription(App::subscription)
        .theme(|app: &App| {
            if matches!(app.config.theme, crate::config::ThemeMode::Night) {
                Theme::Dark
            } else {
                Theme::Light
            }
        })
        .run_with(move || App::bootstrap(script, config, lesson_path))
}
