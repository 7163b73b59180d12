use super::super::super::messages::Message;
use super::super::super::state::App;
use super::super::Effect;
use crate::config::{CONFIG_PATH, save_config};
use iced::Event;
use iced::Task;
use iced::event;
use iced::keyboard;
use iced::window;
use lesson_core::with_timeout;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

impl App {
    pub(super) fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::PlayClip {
                paragraph,
                clip,
                generation,
            } => {
                info!(paragraph, %clip, generation, "Requesting narration clip");
                let completion = with_timeout(self.audio.play(&clip), self.config.audio_timeout());
                Task::perform(completion, move |outcome| Message::AudioFinished {
                    paragraph,
                    generation,
                    outcome,
                })
            }
            Effect::StopAudio => {
                self.audio.stop();
                Task::none()
            }
            Effect::WakeAt(at) => {
                debug!(
                    in_ms = at.saturating_duration_since(Instant::now()).as_millis() as u64,
                    "Scheduling wake-up"
                );
                Task::perform(
                    async move {
                        tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await;
                        Instant::now()
                    },
                    Message::Wake,
                )
            }
            Effect::SaveProgress => {
                self.persist_progress();
                Task::none()
            }
            Effect::SaveConfig => {
                if let Err(err) = save_config(Path::new(CONFIG_PATH), &self.config) {
                    warn!(path = CONFIG_PATH, "Failed to save config: {err:#}");
                }
                Task::none()
            }
            Effect::QuitSafely => {
                info!("Quitting");
                self.audio.stop();
                iced::exit()
            }
        }
    }
}

pub(super) fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    _window_id: window::Id,
) -> Option<Message> {
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            Some(Message::KeyPressed { key, modifiers })
        }
        _ => None,
    }
}
