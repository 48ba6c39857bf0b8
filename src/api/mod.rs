//! Exchange API integration.
//!
//! This module provides a high-level interface to the exchange's public
//! market-data endpoints, handling rate limiting and data conversion.

mod client;
mod converter;
pub mod wire;

pub use client::{ExchangeClient, MarketData};
pub use converter::DataConverter;

#[cfg(test)]
pub use client::MockMarketData;
