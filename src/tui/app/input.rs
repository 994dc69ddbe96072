use super::{App, Connectivity, Mode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

impl App {
    /// Handle one key event. Returns `Ok(true)` when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }
        match self.mode {
            Mode::Form => self.handle_form_key(key),
            Mode::Results => self.handle_results_key(key),
        }
        Ok(false)
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if self.connectivity != Connectivity::Healthy {
                    self.probe_connectivity();
                }
            }
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Left => self.form.cycle(false),
            KeyCode::Right => self.form.cycle(true),
            KeyCode::Char(ch) => self.form.push_char(ch),
            KeyCode::Backspace => self.form.pop_char(),
            KeyCode::Esc => self.form.clear_focused(),
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_add(20);
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(20);
            }
            // New trip: back to the form, abandoning the stream if one is
            // still running.
            KeyCode::Esc | KeyCode::Char('n') => self.back_to_form(),
            _ => {}
        }
    }
}
