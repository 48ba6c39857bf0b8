//! The user's chosen symbols.

use super::Symbol;
use crate::error::Rejection;

/// Maximum number of symbols that can be tracked at once.
pub const MAX_SELECTION: usize = 10;

/// Result of trying to add a symbol to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The selection changed.
    Accepted,
    /// The selection was left untouched.
    Rejected(Rejection),
}

impl ToggleOutcome {
    /// Whether the toggle was applied.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Ordered set of selected symbols, capped at [`MAX_SELECTION`].
///
/// Insertion order is kept for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    symbols: Vec<Symbol>,
}

impl Selection {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `symbol` unless the selection is full or already holds it.
    pub fn toggle_on(&mut self, symbol: impl Into<Symbol>) -> ToggleOutcome {
        let symbol = symbol.into();

        if self.contains(&symbol) {
            return ToggleOutcome::Rejected(Rejection::AlreadySelected);
        }
        if self.symbols.len() >= MAX_SELECTION {
            return ToggleOutcome::Rejected(Rejection::AtCapacity);
        }

        self.symbols.push(symbol);
        ToggleOutcome::Accepted
    }

    /// Remove `symbol`. Returns whether it was present.
    pub fn toggle_off(&mut self, symbol: &str) -> bool {
        let before = self.symbols.len();
        self.symbols.retain(|s| s != symbol);
        self.symbols.len() != before
    }

    /// Whether `symbol` is selected.
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// Number of selected symbols.
    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Whether no more symbols can be added.
    pub fn is_full(&self) -> bool {
        self.symbols.len() >= MAX_SELECTION
    }

    /// Selected symbols in insertion order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}
