//! Keyboard handling for the interactive timer.
//!
//! Keys are turned into [`Intent`]s without touching the session, so the
//! mapping can be tested without a terminal.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pomocycle_core::notify::{refusal_message, toggle_notifications, ToggleOutcome};
use pomocycle_core::{DurationField, Notifier, Settings};

/// What the run loop should do in response to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Toggle,
    Reset,
    ResetCycle,
    Skip,
    /// Save the edited settings.
    Apply(Settings),
    Quit,
}

/// A duration being typed in the settings overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    pub field: DurationField,
    pub buffer: String,
}

/// Settings overlay: a working copy of the settings until Enter saves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub draft: Settings,
    pub editing: Option<TextField>,
}

impl Overlay {
    fn new(current: Settings) -> Self {
        Self {
            draft: current,
            editing: None,
        }
    }
}

pub struct App {
    overlay: Option<Overlay>,
    alert: Option<String>,
    notifier: Arc<dyn Notifier>,
}

impl App {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            overlay: None,
            alert: None,
            notifier,
        }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Message to show until the next key press.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Handle one key. `current` are the settings in effect, used to seed
    /// the overlay when it opens.
    pub fn handle_key(&mut self, key: KeyEvent, current: &Settings) -> Option<Intent> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Intent::Quit);
        }
        self.alert = None;

        if let Some(overlay) = self.overlay.as_mut() {
            if let Some(text) = overlay.editing.as_mut() {
                match key.code {
                    KeyCode::Char(c) => text.buffer.push(c),
                    KeyCode::Backspace => {
                        text.buffer.pop();
                    }
                    KeyCode::Enter => {
                        let TextField { field, buffer } = text.clone();
                        overlay.draft.set_minutes(field, &buffer);
                        overlay.editing = None;
                    }
                    KeyCode::Esc => overlay.editing = None,
                    _ => {}
                }
                return None;
            }
        }

        match key.code {
            KeyCode::Char(' ') => return Some(Intent::Toggle),
            KeyCode::Char('r') | KeyCode::Char('R') => return Some(Intent::Reset),
            KeyCode::Char('s') | KeyCode::Char('S') => return Some(Intent::Skip),
            KeyCode::Char('c') | KeyCode::Char('C') => return Some(Intent::ResetCycle),
            KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Intent::Quit),
            _ => {}
        }

        match self.overlay.clone() {
            None => {
                if key.code == KeyCode::Char(',') {
                    self.overlay = Some(Overlay::new(*current));
                }
                None
            }
            Some(overlay) => self.overlay_key(key.code, overlay),
        }
    }

    fn overlay_key(&mut self, code: KeyCode, mut overlay: Overlay) -> Option<Intent> {
        let draft = &mut overlay.draft;
        match code {
            KeyCode::Esc => {
                self.overlay = None;
                return None;
            }
            KeyCode::Enter => {
                self.overlay = None;
                return Some(Intent::Apply(overlay.draft));
            }
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'f' => overlay.editing = Some(editor(DurationField::Focus, draft)),
                'b' => overlay.editing = Some(editor(DurationField::ShortBreak, draft)),
                'l' => overlay.editing = Some(editor(DurationField::LongBreak, draft)),
                'm' => draft.sound_enabled = !draft.sound_enabled,
                'a' => draft.auto_start_breaks = !draft.auto_start_breaks,
                'p' => draft.auto_start_pomodoros = !draft.auto_start_pomodoros,
                'd' => draft.dark_mode = !draft.dark_mode,
                'n' => {
                    let enable = !draft.notifications_enabled;
                    if let ToggleOutcome::Refused(permission) =
                        toggle_notifications(draft, enable, self.notifier.as_ref())
                    {
                        self.alert = Some(refusal_message(permission).to_string());
                    }
                }
                _ => {}
            },
            _ => {}
        }
        self.overlay = Some(overlay);
        None
    }
}

fn editor(field: DurationField, draft: &Settings) -> TextField {
    TextField {
        field,
        buffer: draft.minutes(field).to_string(),
    }
}
