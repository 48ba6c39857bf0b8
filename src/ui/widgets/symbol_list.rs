//! Search line and checkbox list of the selecting screen.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::state::{AppState, CatalogStatus};
use crate::tracker::SessionController;
use crate::ui::Palette;

/// Search input line.
pub struct SearchBar;

impl SearchBar {
    /// Render the search line.
    pub fn render(frame: &mut Frame, area: Rect, query: &str, editing: bool, palette: &Palette) {
        let (border_style, text) = if editing {
            (
                Style::default().fg(Color::Yellow),
                Line::from(vec![
                    Span::raw(query),
                    Span::styled("_", Style::default().fg(Color::Yellow)),
                ]),
            )
        } else if query.is_empty() {
            (
                Style::default().fg(palette.border),
                Line::from(Span::styled(
                    "Press / to search",
                    Style::default().fg(Color::DarkGray),
                )),
            )
        } else {
            (Style::default().fg(palette.border), Line::from(query))
        };

        let paragraph = Paragraph::new(text).block(
            Block::default()
                .title(" Search ")
                .borders(Borders::ALL)
                .border_style(border_style),
        );

        frame.render_widget(paragraph, area);
    }
}

/// Checkbox list of the symbols matching the search.
pub struct SymbolList;

impl SymbolList {
    /// Render the symbol list.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        session: &SessionController<AppState>,
        palette: &Palette,
        retry_key: &str,
    ) {
        let visible = session.visible();
        let total = session.catalog().map_or(0, |c| c.len());

        let block = Block::default()
            .title(format!(" Symbols ({}/{}) ", visible.len(), total))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.border));

        let message = match &session.catalog_state().status {
            CatalogStatus::Pending | CatalogStatus::Loading => Some(vec![Line::from(Span::styled(
                "Loading coin list...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ))]),
            CatalogStatus::Failed(cause) => Some(vec![
                Line::from(Span::styled(
                    format!("Error: {cause}"),
                    Style::default().fg(Color::Red),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Press {retry_key} to retry"),
                    Style::default().fg(Color::DarkGray),
                )),
            ]),
            CatalogStatus::Ready(_) if visible.is_empty() => {
                Some(vec![Line::from(Span::styled(
                    format!("No symbols match '{}'", session.search_query()),
                    Style::default().fg(Color::DarkGray),
                ))])
            }
            CatalogStatus::Ready(_) => None,
        };

        if let Some(lines) = message {
            frame.render_widget(Paragraph::new(lines).block(block), area);
            return;
        }

        let selection = session.selection();
        let items: Vec<ListItem> = visible
            .iter()
            .map(|symbol| {
                let checked = selection.contains(symbol);
                let style = if checked {
                    Style::default()
                        .fg(palette.up)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", palette.checkbox(checked)), style),
                    Span::styled(symbol.as_str(), style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(if palette.unicode { "▶ " } else { "> " });

        let mut state = ListState::default();
        state.select(Some(session.listener().cursor.min(visible.len() - 1)));

        frame.render_stateful_widget(list, area, &mut state);
    }
}
