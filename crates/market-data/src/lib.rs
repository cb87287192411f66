//! Stockfolio Market Data Crate
//!
//! This crate fetches market prices from external quote providers. It knows
//! nothing about portfolios or positions: callers hand it a ticker symbol and
//! receive a [`Quote`] or a [`MarketDataError`].
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +----------------------+
//! |   Domain Layer   | --> |  MarketDataProvider  |  (trait)
//! +------------------+     +----------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |  YahooProvider   |  (Yahoo Finance)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |     Quote        |  (market data)
//!                          +------------------+
//! ```
//!
//! Retries, rate limiting and caching are deliberately absent: every lookup
//! is a single provider call bounded by the provider's request timeout.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{AssetProfile, Quote};
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
