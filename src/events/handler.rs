//! Event handler for processing input events.

use super::InputEvent;
use crate::config::KeyBindings;
use crate::error::{Error, Result};
use crate::state::{Action, InputMode};
use crate::tracker::Phase;
use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use std::time::Duration;

/// Snapshot of the state that changes how keys are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerSnapshot {
    pub input_mode: InputMode,
    pub phase: Phase,
    pub show_help: bool,
}

/// Handles terminal events and produces actions.
pub struct EventHandler {
    /// Key bindings.
    keybindings: KeyBindings,
    /// Maximum time to wait for input before yielding a redraw.
    tick_rate: Duration,
    /// Terminal event stream, opened on first use.
    events: Option<EventStream>,
    /// State-dependent context for key handling.
    snapshot: HandlerSnapshot,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new(keybindings: KeyBindings, tick_rate: Duration) -> Self {
        Self {
            keybindings,
            tick_rate,
            events: None,
            snapshot: HandlerSnapshot::default(),
        }
    }

    /// Update the snapshot used for state-aware key handling.
    pub fn update_snapshot(&mut self, snapshot: HandlerSnapshot) {
        self.snapshot = snapshot;
    }

    /// Wait for the next action. Yields `None` on every tick without input.
    pub async fn next(&mut self) -> Result<Option<Action>> {
        let events = self.events.get_or_insert_with(EventStream::new);

        let event = tokio::select! {
            _ = tokio::time::sleep(self.tick_rate) => return Ok(None),
            maybe_event = events.next() => maybe_event,
        };

        match event {
            Some(Ok(event)) => Ok(self.handle_event(event)),
            Some(Err(e)) => Err(Error::Io(e)),
            None => Err(Error::terminal("input stream closed")),
        }
    }

    /// Translate a terminal event.
    pub fn handle_event(&self, event: CrosstermEvent) -> Option<Action> {
        match event {
            CrosstermEvent::Key(key) => self.handle_key(key),
            // Terminal will automatically redraw
            _ => None,
        }
    }

    /// Handle a key event and return an optional action.
    pub fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let input = InputEvent::from(key);
        if input.matches("Ctrl+c") {
            return Some(Action::Quit);
        }

        if self.snapshot.show_help {
            return Some(Action::ToggleHelp);
        }

        match self.snapshot.input_mode {
            InputMode::Normal => self.handle_normal_mode(input),
            InputMode::Search => self.handle_search_mode(input),
        }
    }

    fn handle_normal_mode(&self, input: InputEvent) -> Option<Action> {
        if input.matches(&self.keybindings.quit) {
            return Some(Action::Quit);
        }
        if input.matches(&self.keybindings.help) {
            return Some(Action::ToggleHelp);
        }

        match self.snapshot.phase {
            Phase::Selecting => self.handle_selecting(input),
            Phase::Tracking => self.handle_tracking(input),
        }
    }

    fn handle_selecting(&self, input: InputEvent) -> Option<Action> {
        let kb = &self.keybindings;

        if input.matches(&kb.toggle) {
            return Some(Action::ToggleSelected);
        }
        if input.matches(&kb.confirm) {
            return Some(Action::Confirm);
        }
        if input.matches(&kb.search) {
            return Some(Action::SetInputMode(InputMode::Search));
        }
        if input.matches(&kb.retry) {
            return Some(Action::RetryCatalog);
        }
        if input.matches(&kb.up) || input.code == KeyCode::Up {
            return Some(Action::ScrollUp);
        }
        if input.matches(&kb.down) || input.code == KeyCode::Down {
            return Some(Action::ScrollDown);
        }

        match input.code {
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Home => Some(Action::GoToTop),
            KeyCode::End => Some(Action::GoToBottom),
            KeyCode::Esc => Some(Action::ClearSearch),
            _ => None,
        }
    }

    fn handle_tracking(&self, input: InputEvent) -> Option<Action> {
        if input.matches(&self.keybindings.back) || input.code == KeyCode::Backspace {
            return Some(Action::Back);
        }
        None
    }

    fn handle_search_mode(&self, input: InputEvent) -> Option<Action> {
        match input.code {
            KeyCode::Esc => Some(Action::ClearSearch),
            KeyCode::Enter => Some(Action::SetInputMode(InputMode::Normal)),
            KeyCode::Backspace => Some(Action::SearchPop),
            KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::Down => Some(Action::ScrollDown),
            _ => input.char().map(Action::SearchPush),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn handler(snapshot: HandlerSnapshot) -> EventHandler {
        let mut handler = EventHandler::new(KeyBindings::default(), Duration::from_millis(250));
        handler.update_snapshot(snapshot);
        handler
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_selecting_keys() {
        let handler = handler(HandlerSnapshot::default());
        assert_eq!(
            handler.handle_key(press(KeyCode::Char(' '))),
            Some(Action::ToggleSelected)
        );
        assert_eq!(handler.handle_key(press(KeyCode::Enter)), Some(Action::Confirm));
        assert_eq!(handler.handle_key(press(KeyCode::Char('j'))), Some(Action::ScrollDown));
        assert_eq!(handler.handle_key(press(KeyCode::Up)), Some(Action::ScrollUp));
        assert_eq!(
            handler.handle_key(press(KeyCode::Char('/'))),
            Some(Action::SetInputMode(InputMode::Search))
        );
        assert_eq!(handler.handle_key(press(KeyCode::Char('r'))), Some(Action::RetryCatalog));
        assert_eq!(handler.handle_key(press(KeyCode::Char('q'))), Some(Action::Quit));
    }

    #[test]
    fn test_tracking_keys() {
        let handler = handler(HandlerSnapshot {
            phase: Phase::Tracking,
            ..Default::default()
        });
        assert_eq!(handler.handle_key(press(KeyCode::Esc)), Some(Action::Back));
        assert_eq!(handler.handle_key(press(KeyCode::Backspace)), Some(Action::Back));
        assert_eq!(handler.handle_key(press(KeyCode::Char(' '))), None);
        assert_eq!(handler.handle_key(press(KeyCode::Enter)), None);
    }

    #[test]
    fn test_search_mode_captures_text() {
        let handler = handler(HandlerSnapshot {
            input_mode: InputMode::Search,
            ..Default::default()
        });
        assert_eq!(
            handler.handle_key(press(KeyCode::Char('q'))),
            Some(Action::SearchPush('q'))
        );
        assert_eq!(handler.handle_key(press(KeyCode::Backspace)), Some(Action::SearchPop));
        assert_eq!(handler.handle_key(press(KeyCode::Esc)), Some(Action::ClearSearch));
        assert_eq!(
            handler.handle_key(press(KeyCode::Enter)),
            Some(Action::SetInputMode(InputMode::Normal))
        );
    }

    #[test]
    fn test_help_overlay_swallows_keys() {
        let handler = handler(HandlerSnapshot {
            show_help: true,
            ..Default::default()
        });
        assert_eq!(handler.handle_key(press(KeyCode::Enter)), Some(Action::ToggleHelp));
        assert_eq!(
            handler.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }
}
