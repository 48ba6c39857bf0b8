//! Layout management for the TUI.

use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// UI layout areas.
pub struct Layout {
    /// Status bar area (top).
    pub status_area: Rect,
    /// Main content area.
    pub main_area: Rect,
    /// Info line area (bottom).
    pub info_area: Rect,
    /// Notification area (overlaid).
    pub notification_area: Rect,
}

impl Layout {
    /// Create a new layout from the terminal area.
    pub fn new(area: Rect) -> Self {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(0),    // Main content
                Constraint::Length(1), // Info line
            ])
            .split(area);

        // Notification area sits just above the info line
        let notification_area = Rect {
            x: area.x + area.width / 4,
            y: chunks[2].y.saturating_sub(3),
            width: area.width / 2,
            height: 3.min(area.height),
        };

        Self {
            status_area: chunks[0],
            main_area: chunks[1],
            info_area: chunks[2],
            notification_area,
        }
    }

    /// Split the main area into the search line and the symbol list.
    pub fn split_search(&self) -> (Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(self.main_area);
        (chunks[0], chunks[1])
    }
}

/// Create a centered popup area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_fills_terminal() {
        let layout = Layout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.info_area.y, 23);
        assert_eq!(layout.main_area.height, 22);

        let (search, list) = layout.split_search();
        assert_eq!(search.height, 3);
        assert_eq!(list.height, 19);
    }

    #[test]
    fn test_tiny_terminal_does_not_underflow() {
        let layout = Layout::new(Rect::new(0, 0, 10, 2));
        assert!(layout.notification_area.height <= 2);
    }
}
