//! Exchange REST response shapes.
//!
//! Only the fields the tracker consumes are modelled; everything else in the
//! payload is ignored by serde.

use serde::Deserialize;

/// Response of `GET /api/v3/exchangeInfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

/// One entry of the exchange symbol metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
}

/// One entry of `GET /api/v3/ticker/price`.
///
/// The exchange sends prices as decimal strings.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerPrice {
    pub symbol: String,
    pub price: String,
}
