//! Colours resolved from the theme configuration.

use crate::config::ThemeConfig;
use crate::state::Direction;
use ratatui::style::Color;
use tracing::warn;

/// Resolved colours and symbols used by the widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub up: Color,
    pub down: Color,
    pub neutral: Color,
    pub border: Color,
    /// Use arrows and box characters instead of plain ASCII.
    pub unicode: bool,
}

impl Palette {
    /// Build a palette, falling back to the default for unparsable colours.
    pub fn from_config(theme: &ThemeConfig, unicode: bool) -> Self {
        let fallback = ThemeConfig::default();
        Self {
            up: parse_color(&theme.up, &fallback.up),
            down: parse_color(&theme.down, &fallback.down),
            neutral: parse_color(&theme.neutral, &fallback.neutral),
            border: parse_color(&theme.border, &fallback.border),
            unicode,
        }
    }

    /// Colour of a price moving in `direction`.
    pub fn direction_color(&self, direction: Direction) -> Color {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Unchanged | Direction::Initial => self.neutral,
        }
    }

    /// Marker shown next to a price moving in `direction`.
    pub fn direction_marker(&self, direction: Direction) -> &'static str {
        match (direction, self.unicode) {
            (Direction::Up, true) => "▲",
            (Direction::Up, false) => "+",
            (Direction::Down, true) => "▼",
            (Direction::Down, false) => "-",
            (Direction::Unchanged, _) => "=",
            (Direction::Initial, _) => "",
        }
    }

    /// Check mark for a list entry.
    pub fn checkbox(&self, checked: bool) -> &'static str {
        match (checked, self.unicode) {
            (true, true) => "[✓]",
            (true, false) => "[x]",
            (false, _) => "[ ]",
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default(), true)
    }
}

fn parse_color(value: &str, fallback: &str) -> Color {
    value.parse().unwrap_or_else(|_| {
        warn!(value, "Invalid theme colour, using default");
        fallback.parse().unwrap_or(Color::Reset)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colours_are_parsed() {
        let palette = Palette::default();
        assert_eq!(palette.up, Color::Rgb(0x66, 0xbb, 0x6a));
        assert_eq!(palette.down, Color::Rgb(0xef, 0x53, 0x50));
    }

    #[test]
    fn test_invalid_colour_falls_back() {
        let theme = ThemeConfig {
            up: "not-a-colour".to_string(),
            down: "red".to_string(),
            ..Default::default()
        };
        let palette = Palette::from_config(&theme, false);
        assert_eq!(palette.up, Color::Rgb(0x66, 0xbb, 0x6a));
        assert_eq!(palette.down, Color::Red);
    }

    #[test]
    fn test_direction_styling() {
        let palette = Palette::default();
        assert_eq!(palette.direction_color(Direction::Up), palette.up);
        assert_eq!(palette.direction_color(Direction::Down), palette.down);
        assert_eq!(palette.direction_color(Direction::Initial), palette.neutral);
        assert_eq!(palette.direction_color(Direction::Unchanged), palette.neutral);

        let ascii = Palette::from_config(&ThemeConfig::default(), false);
        assert_eq!(ascii.direction_marker(Direction::Up), "+");
        assert_eq!(ascii.checkbox(true), "[x]");
    }
}
