//! UI rendering using ratatui.
//!
//! This module contains all TUI components and rendering logic.

mod layout;
mod theme;
mod widgets;

pub use layout::Layout;
pub use theme::Palette;
pub use widgets::{HelpPanel, PriceBoard, SearchBar, StatusBar, SymbolList};

use crate::config::{Config, KeyBindings};
use crate::state::AppState;
use crate::tracker::{Phase, SessionController};
use ratatui::Frame;

/// Main UI renderer.
pub struct Ui {
    palette: Palette,
    keybindings: KeyBindings,
}

impl Ui {
    /// Create a renderer from the UI-related configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            palette: Palette::from_config(&config.theme, config.ui.unicode_symbols),
            keybindings: config.keybindings.clone(),
        }
    }

    /// Render the entire UI.
    pub fn render(&self, frame: &mut Frame, session: &SessionController<AppState>) {
        let state = session.listener();
        let layout = Layout::new(frame.area());

        StatusBar::render(frame, layout.status_area, session);

        match session.phase() {
            Phase::Selecting => {
                let (search_area, list_area) = layout.split_search();
                SearchBar::render(
                    frame,
                    search_area,
                    session.search_query(),
                    state.is_editing(),
                    &self.palette,
                );
                SymbolList::render(
                    frame,
                    list_area,
                    session,
                    &self.palette,
                    &self.keybindings.retry,
                );
            }
            Phase::Tracking => {
                PriceBoard::render(frame, layout.main_area, &state.price_rows, &self.palette);
            }
        }

        widgets::render_info(frame, layout.info_area, &state.info, state.error.is_some());

        if state.show_help {
            HelpPanel::render(frame, frame.area(), &self.keybindings);
        }

        if let Some(notification) = &state.notification {
            widgets::render_notification(frame, layout.notification_area, notification);
        }
    }
}
