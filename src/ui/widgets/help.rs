//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;
use crate::config::KeyBindings;

/// Help panel showing keybindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect, keys: &KeyBindings) {
        let popup_area = centered_rect(60, 80, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let navigation = format!("{}/{}", keys.up, keys.down);
        let help_text = vec![
            section("Selecting"),
            Line::from(""),
            binding(&navigation, "Move up/down (arrows, PgUp/PgDn, Home/End)"),
            binding(&keys.toggle, "Check/uncheck symbol"),
            binding(&keys.search, "Search"),
            binding(&keys.confirm, "Start tracking selected symbols"),
            binding(&keys.retry, "Reload coin list"),
            binding("Esc", "Clear search"),
            Line::from(""),
            section("Search"),
            Line::from(""),
            binding("Enter", "Keep query"),
            binding("Esc", "Clear query"),
            Line::from(""),
            section("Tracking"),
            Line::from(""),
            binding(&keys.back, "Back to selection"),
            Line::from(""),
            section("General"),
            Line::from(""),
            binding(&keys.help, "Toggle help"),
            binding(&keys.quit, "Quit"),
        ];

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn binding<'a>(key: &str, description: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<7}", key), Style::default().fg(Color::Cyan)),
        Span::raw(description),
    ])
}
