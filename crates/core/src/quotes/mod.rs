//! Quotes module - the market price seam used by performance reads.
//!
//! The engine never constructs a market data client on its own. Callers inject
//! a [`QuoteSource`]; production wiring wraps a market-data provider in
//! [`ProviderQuoteSource`], tests substitute fixed prices.

mod client;
mod errors;
mod model;
mod quotes_traits;

pub use client::ProviderQuoteSource;
pub use errors::QuoteError;
pub use model::MarketQuote;
pub use quotes_traits::QuoteSource;
