//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::{AppState, MAX_SELECTION};
use crate::tracker::{Phase, SessionController};

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, session: &SessionController<AppState>) {
        let state = session.listener();

        let phase = match session.phase() {
            Phase::Selecting => Span::styled(" Selecting ", Style::default().fg(Color::Yellow)),
            Phase::Tracking => Span::styled(" Tracking ", Style::default().fg(Color::Green)),
        };

        let selection = session.selection();
        let selected_style = if selection.is_full() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let selected = Span::styled(
            format!(" {}/{} selected ", selection.count(), MAX_SELECTION),
            selected_style,
        );

        let loading = if session.catalog_state().is_loading() {
            Span::styled(
                " Loading... ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::raw("")
        };

        let updated = match (session.phase(), state.last_price_update) {
            (Phase::Tracking, Some(at)) => Span::styled(
                format!(
                    " Updated {} ",
                    at.with_timezone(&chrono::Local).format("%H:%M:%S")
                ),
                Style::default().fg(Color::Gray),
            ),
            _ => Span::raw(""),
        };

        let help_hint = Span::styled(" Press ? for help ", Style::default().fg(Color::Gray));

        let left_content = vec![
            Span::styled(
                " Pairwatch ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("|"),
            phase,
            Span::raw("|"),
            selected,
            loading,
            updated,
        ];

        let status_line = Line::from(left_content);

        // Right-align the help hint
        let left_len = status_line.width();
        let right_len = help_hint.width();
        let padding = (area.width as usize).saturating_sub(left_len + right_len);

        let mut full_line = status_line.spans;
        full_line.push(Span::raw(" ".repeat(padding)));
        full_line.push(help_hint);

        let paragraph =
            Paragraph::new(Line::from(full_line)).style(Style::default().bg(Color::DarkGray));

        frame.render_widget(paragraph, area);
    }
}
