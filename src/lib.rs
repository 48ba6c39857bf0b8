//! # Pairwatch - live exchange prices in the terminal
//!
//! Pick up to ten USDT trading pairs from the Binance catalog and watch
//! their prices refresh, coloured by the direction of the last move.
//!
//! ## Architecture
//!
//! - **API**: exchange client behind the [`api::MarketData`] trait
//! - **State**: catalog, selection, price observations and presentation state
//! - **Tracker**: session controller, price poller and listener callbacks
//! - **Events**: input handling and key bindings
//! - **UI**: layout and rendering logic
//! - **App**: terminal lifecycle and the main event loop
//! - **Config**: configuration management

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod state;
pub mod tracker;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use tracker::{Phase, SessionController, SessionEvent, SessionListener};
