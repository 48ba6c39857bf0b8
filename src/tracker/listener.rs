//! Callbacks from the session to the presentation layer.

use crate::state::{Catalog, PriceUpdate, Symbol};

/// Receives session notifications.
///
/// All callbacks run on the task that owns the
/// [`SessionController`](super::SessionController), never on a background
/// worker.
pub trait SessionListener: Send {
    /// The catalog finished loading.
    fn on_catalog_ready(&mut self, catalog: &Catalog);

    /// The catalog could not be loaded.
    fn on_catalog_error(&mut self, message: &str);

    /// The number of selected symbols changed.
    fn on_selection_changed(&mut self, count: usize);

    /// A tracked symbol received a new classified price.
    fn on_price_update(&mut self, update: &PriceUpdate);

    /// Tracking started for `symbols`, in selection order.
    fn on_tracking_started(&mut self, _symbols: &[Symbol]) {}

    /// Tracking stopped and the session went back to selection.
    fn on_tracking_stopped(&mut self) {}
}
