use super::super::super::messages::Message;
use super::super::super::state::App;
use super::super::Effect;
use std::time::Instant;
use tracing::info;

impl App {
    pub(super) fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::StartLesson => self.handle_start_lesson(Instant::now(), &mut effects),
            Message::ResetLesson => self.handle_reset_lesson(&mut effects),
            Message::LessonSelected(entry) => self.handle_lesson_selected(entry, &mut effects),
            Message::ToggleTheme => self.handle_toggle_theme(&mut effects),
            Message::SafeQuit => {
                info!("Safe quit requested");
                effects.push(Effect::QuitSafely);
            }
            Message::Tick(now) => self.handle_tick(now, &mut effects),
            Message::Wake(now) => self.handle_wake(now, &mut effects),
            Message::AudioFinished {
                paragraph,
                generation,
                outcome,
            } => self.handle_audio_finished(
                paragraph,
                generation,
                outcome,
                Instant::now(),
                &mut effects,
            ),
            Message::KeyPressed { key, modifiers } => {
                if let Some(shortcut) = self.shortcut_message_for_key(key, modifiers) {
                    effects.extend(self.reduce(shortcut));
                }
            }
            Message::PollSystemSignals => {
                if crate::take_sigint_requested() {
                    info!("Received Ctrl+C; quitting");
                    effects.push(Effect::QuitSafely);
                }
            }
        }

        effects
    }
}
