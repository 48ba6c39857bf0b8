//! Presentation-side state fed by session callbacks.

use super::{Catalog, Direction, MAX_SELECTION, Notification, PriceUpdate, Symbol};
use crate::tracker::SessionListener;
use chrono::{DateTime, Utc};

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// One line of the price board.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    /// Tracked symbol.
    pub symbol: Symbol,
    /// Formatted price, `None` until the first quote arrives.
    pub price: Option<String>,
    /// Direction of the last update.
    pub direction: Direction,
    /// When the row was last updated.
    pub updated_at: Option<DateTime<Utc>>,
}

impl PriceRow {
    fn loading(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            price: None,
            direction: Direction::Initial,
            updated_at: None,
        }
    }
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current input mode.
    pub input_mode: InputMode,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Current notification.
    pub notification: Option<Notification>,
    /// Catalog error message, if loading failed.
    pub error: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Cursor into the visible symbol list.
    pub cursor: usize,
    /// Info line shown under the symbol list.
    pub info: String,
    /// Number of selected symbols.
    pub selected_count: usize,
    /// Size of the loaded catalog.
    pub catalog_size: Option<usize>,
    /// Rows of the price board, in selection order.
    pub price_rows: Vec<PriceRow>,
    /// Time of the last price update.
    pub last_price_update: Option<DateTime<Utc>>,
    quote_asset: String,
}

impl AppState {
    /// Create a new application state.
    pub fn new(quote_asset: impl Into<String>) -> Self {
        Self {
            info: "Loading coin list...".to_string(),
            quote_asset: quote_asset.into(),
            ..Default::default()
        }
    }

    /// Check if the user is typing a search query.
    pub fn is_editing(&self) -> bool {
        self.input_mode == InputMode::Search
    }

    /// Move the cursor by `delta` rows within a list of `len` entries.
    pub fn move_cursor(&mut self, delta: i32, len: usize) {
        let current = self.cursor as i64;
        let max_index = len.saturating_sub(1) as i64;
        self.cursor = (current + delta as i64).clamp(0, max_index) as usize;
    }

    /// Jump to the first row.
    pub fn go_to_top(&mut self) {
        self.cursor = 0;
    }

    /// Jump to the last row of a list of `len` entries.
    pub fn go_to_bottom(&mut self, len: usize) {
        self.cursor = len.saturating_sub(1);
    }

    /// Keep the cursor inside a list of `len` entries.
    pub fn clamp_cursor(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Show a notification.
    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    /// Drop the notification once its display time has passed.
    pub fn expire_notification(&mut self, now: DateTime<Utc>) {
        if self
            .notification
            .as_ref()
            .is_some_and(|n| n.is_expired(now))
        {
            self.notification = None;
        }
    }
}

impl SessionListener for AppState {
    fn on_catalog_ready(&mut self, catalog: &Catalog) {
        self.catalog_size = Some(catalog.len());
        self.error = None;
        self.cursor = 0;
        self.info = format!(
            "Total {} {} pairs found. You can select up to {} coins.",
            catalog.len(),
            self.quote_asset,
            MAX_SELECTION
        );
    }

    fn on_catalog_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
        self.info = format!("Error: {message}");
    }

    fn on_selection_changed(&mut self, count: usize) {
        self.selected_count = count;
        self.info = format!("Selected coins: {count}/{MAX_SELECTION}");
    }

    fn on_price_update(&mut self, update: &PriceUpdate) {
        if let Some(row) = self.price_rows.iter_mut().find(|r| r.symbol == update.symbol) {
            row.price = Some(update.formatted.clone());
            row.direction = update.direction;
            row.updated_at = Some(update.observed_at);
            self.last_price_update = Some(update.observed_at);
        }
    }

    fn on_tracking_started(&mut self, symbols: &[Symbol]) {
        self.input_mode = InputMode::Normal;
        self.price_rows = symbols.iter().map(|s| PriceRow::loading(s)).collect();
        self.last_price_update = None;
    }

    fn on_tracking_stopped(&mut self) {
        self.price_rows.clear();
        self.last_price_update = None;
        self.cursor = 0;
        self.info = "Loading coin list...".to_string();
    }
}
