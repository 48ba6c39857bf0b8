//! Price observations and their directional classification.

use super::Symbol;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Direction of a price relative to the previous observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// First observation of the symbol in this session.
    #[default]
    Initial,
    /// Higher than the previous observation.
    Up,
    /// Lower than the previous observation.
    Down,
    /// Equal to the previous observation.
    Unchanged,
}

impl Direction {
    /// Classify `current` against the previous observation, if any.
    pub fn classify(previous: Option<f64>, current: f64) -> Self {
        match previous {
            None => Self::Initial,
            Some(prev) if current > prev => Self::Up,
            Some(prev) if current < prev => Self::Down,
            Some(_) => Self::Unchanged,
        }
    }

    /// Whether the direction is displayed with the neutral colour.
    pub fn is_neutral(&self) -> bool {
        matches!(self, Self::Initial | Self::Unchanged)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initial => write!(f, "Initial"),
            Self::Up => write!(f, "Up"),
            Self::Down => write!(f, "Down"),
            Self::Unchanged => write!(f, "Unchanged"),
        }
    }
}

/// A price as returned by the exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    /// Symbol the price belongs to.
    pub symbol: Symbol,
    /// Last traded price.
    pub price: f64,
}

impl PriceQuote {
    pub fn new(symbol: impl Into<Symbol>, price: f64) -> Self {
        Self {
            symbol: symbol.into(),
            price,
        }
    }
}

/// A classified price delivered to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    /// Symbol the price belongs to.
    pub symbol: Symbol,
    /// Raw price.
    pub price: f64,
    /// Price rendered with [`format_price`].
    pub formatted: String,
    /// Direction against the previous observation.
    pub direction: Direction,
    /// When the update was applied.
    pub observed_at: DateTime<Utc>,
}

impl PriceUpdate {
    pub fn new(symbol: impl Into<Symbol>, price: f64, direction: Direction) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            formatted: format_price(price),
            direction,
            observed_at: Utc::now(),
        }
    }
}

/// Last seen price per symbol for the running tracking session.
///
/// A missing entry means the symbol has not been observed yet.
#[derive(Debug, Clone, Default)]
pub struct PriceObservation {
    prices: HashMap<Symbol, f64>,
}

impl PriceObservation {
    /// Create an empty observation table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `price` and make it the new baseline for `symbol`.
    pub fn observe(&mut self, symbol: &str, price: f64) -> Direction {
        let direction = Direction::classify(self.get(symbol), price);
        self.prices.insert(symbol.to_string(), price);
        direction
    }

    /// Last seen price for `symbol`.
    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.prices.get(symbol).copied()
    }

    /// Number of observed symbols.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether nothing has been observed yet.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Render a price for display.
///
/// Up to eight fractional digits with trailing zeros and a dangling decimal
/// point trimmed. Prices whose integer part has fewer than four digits keep
/// all eight fractional digits.
pub fn format_price(price: f64) -> String {
    let full = format!("{price:.8}");
    let trimmed = full.trim_end_matches('0').trim_end_matches('.');
    let integer_digits = trimmed.split('.').next().map_or(0, str::len);

    if integer_digits < 4 {
        full
    } else {
        trimmed.to_string()
    }
}
