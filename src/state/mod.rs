//! State for Pairwatch.
//!
//! Core session data (catalog, selection, price observations) plus the
//! presentation-side state that is fed through session callbacks.

mod app_state;
mod catalog_state;
mod price_state;
mod selection;

pub use app_state::{AppState, InputMode, PriceRow};
pub use catalog_state::{Catalog, CatalogState, CatalogStatus, Symbol, filter};
pub use price_state::{Direction, PriceObservation, PriceQuote, PriceUpdate, format_price};
pub use selection::{MAX_SELECTION, Selection, ToggleOutcome};

use chrono::{DateTime, Utc};

/// Actions produced by user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Navigation
    SetInputMode(InputMode),
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // Search
    SearchPush(char),
    SearchPop,
    ClearSearch,

    // Session
    ToggleSelected,
    Confirm,
    Back,
    RetryCatalog,

    // UI actions
    ToggleHelp,

    // Quit
    Quit,
}

/// A notification to display to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
    pub created_at: DateTime<Utc>,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl Notification {
    fn with_level(message: impl Into<String>, level: NotificationLevel, duration_secs: u64) -> Self {
        Self {
            message: message.into(),
            level,
            duration_secs,
            created_at: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Info, 3)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Warning, 5)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(message, NotificationLevel::Error, 10)
    }

    /// Whether the notification has been shown long enough.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.created_at).num_seconds() >= self.duration_secs as i64
    }
}
