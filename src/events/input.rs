//! Key presses and binding strings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A key press reduced to what bindings care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub code: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
}

impl From<KeyEvent> for InputEvent {
    fn from(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
            alt: event.modifiers.contains(KeyModifiers::ALT),
        }
    }
}

impl InputEvent {
    /// Get the character if this is a plain character input.
    pub fn char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.ctrl && !self.alt => Some(c),
            _ => None,
        }
    }

    /// Check if this matches a key binding string (e.g. `"Ctrl+c"`, `"Enter"`, `"q"`).
    ///
    /// Single-letter bindings ignore case.
    pub fn matches(&self, binding: &str) -> bool {
        let mut ctrl = false;
        let mut alt = false;
        let mut key = binding;

        if binding.len() > 1 {
            for part in binding.split('+') {
                match part.to_lowercase().as_str() {
                    "ctrl" => ctrl = true,
                    "alt" => alt = true,
                    _ => key = part,
                }
            }
        }

        if self.ctrl != ctrl || self.alt != alt {
            return false;
        }

        match (key.to_lowercase().as_str(), self.code) {
            ("enter", KeyCode::Enter) => true,
            ("esc" | "escape", KeyCode::Esc) => true,
            ("backspace", KeyCode::Backspace) => true,
            ("tab", KeyCode::Tab) => true,
            ("space", KeyCode::Char(' ')) => true,
            ("up", KeyCode::Up) => true,
            ("down", KeyCode::Down) => true,
            ("pageup", KeyCode::PageUp) => true,
            ("pagedown", KeyCode::PageDown) => true,
            ("home", KeyCode::Home) => true,
            ("end", KeyCode::End) => true,
            (k, KeyCode::Char(c)) if k.chars().count() == 1 => {
                k.chars().next().is_some_and(|b| b.eq_ignore_ascii_case(&c))
            }
            _ => false,
        }
    }
}
