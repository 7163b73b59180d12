use super::super::state::App;
use super::Effect;
use crate::config::ThemeMode;
use tracing::info;

impl App {
    pub(super) fn handle_toggle_theme(&mut self, effects: &mut Vec<Effect>) {
        let next = match self.config.theme {
            ThemeMode::Night => ThemeMode::Day,
            ThemeMode::Day => ThemeMode::Night,
        };
        info!(night_mode = matches!(next, ThemeMode::Night), "Toggled theme");
        self.config.theme = next;
        effects.push(Effect::SaveConfig);
    }
}
