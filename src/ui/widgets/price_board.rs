//! Live price table of the tracking screen.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
};

use crate::state::PriceRow;
use crate::ui::Palette;

/// Price board widget.
pub struct PriceBoard;

impl PriceBoard {
    /// Render one row per tracked symbol, in selection order.
    pub fn render(frame: &mut Frame, area: Rect, rows: &[PriceRow], palette: &Palette) {
        let header_cells = ["Symbol", "Price", "", "Updated"].iter().map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        let table_rows = rows.iter().map(|row| {
            let color = palette.direction_color(row.direction);

            let price = match &row.price {
                Some(price) => Cell::from(price.as_str()).style(Style::default().fg(color)),
                None => Cell::from("Loading...").style(
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ),
            };

            let updated = row
                .updated_at
                .map(|at| {
                    at.with_timezone(&chrono::Local)
                        .format("%H:%M:%S")
                        .to_string()
                })
                .unwrap_or_default();

            Row::new(vec![
                Cell::from(row.symbol.as_str())
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                price,
                Cell::from(palette.direction_marker(row.direction))
                    .style(Style::default().fg(color)),
                Cell::from(updated).style(Style::default().fg(Color::DarkGray)),
            ])
            .height(1)
        });

        let table = Table::new(
            table_rows,
            [
                Constraint::Length(16),
                Constraint::Length(20),
                Constraint::Length(2),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(format!(" Prices ({}) ", rows.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        );

        frame.render_widget(table, area);
    }
}
