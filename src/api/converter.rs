//! Data conversion utilities for API responses.

use super::wire::{ExchangeInfo, TickerPrice};
use crate::error::FetchError;
use crate::state::{Catalog, PriceQuote};

/// Converts API responses to internal state types.
pub struct DataConverter;

impl DataConverter {
    /// Keep the symbols quoted in `quote_asset` whose status is `trading_status`.
    pub fn convert_catalog(info: ExchangeInfo, quote_asset: &str, trading_status: &str) -> Catalog {
        Catalog::from_symbols(
            info.symbols
                .into_iter()
                .filter(|s| s.symbol.ends_with(quote_asset) && s.status == trading_status)
                .map(|s| s.symbol),
        )
    }

    /// Parse a ticker batch. A single unreadable price rejects the batch.
    pub fn convert_prices(tickers: Vec<TickerPrice>) -> Result<Vec<PriceQuote>, FetchError> {
        tickers.into_iter().map(Self::convert_price).collect()
    }

    fn convert_price(ticker: TickerPrice) -> Result<PriceQuote, FetchError> {
        let price: f64 = ticker.price.trim().parse().map_err(|_| {
            FetchError::malformed(format!(
                "invalid price {:?} for {}",
                ticker.price, ticker.symbol
            ))
        })?;

        if !price.is_finite() {
            return Err(FetchError::malformed(format!(
                "non-finite price for {}",
                ticker.symbol
            )));
        }

        Ok(PriceQuote::new(ticker.symbol, price))
    }
}
