//! Selection and price-tracking session.
//!
//! The [`SessionController`] owns the catalog, the selection and the price
//! observations. Background work (catalog fetch, price polling) never
//! mutates them directly; it posts [`SessionEvent`]s on a channel that the
//! controller drains on its own task.

mod controller;
mod listener;
mod poller;

pub use controller::SessionController;
pub use listener::SessionListener;
pub use poller::PricePoller;

use crate::error::FetchError;
use crate::state::{Catalog, PriceQuote};

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Browsing the catalog and picking symbols.
    #[default]
    Selecting,
    /// Watching live prices of the confirmed selection.
    Tracking,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Selecting => write!(f, "Selecting"),
            Self::Tracking => write!(f, "Tracking"),
        }
    }
}

/// Results posted by background tasks.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A catalog fetch completed.
    CatalogLoaded(Result<Catalog, FetchError>),
    /// One poll cycle returned prices.
    PricesFetched {
        /// Tracking session the batch belongs to.
        generation: u64,
        /// Cycle counter within that session, starting at 1.
        cycle: u64,
        /// Prices in exchange order.
        quotes: Vec<PriceQuote>,
    },
}
