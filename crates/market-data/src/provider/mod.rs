//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - The Yahoo Finance implementation used in production
//!
//! The domain layer never talks to a provider directly. It depends on its own
//! quote-source seam and wraps a provider behind it, so tests can swap in
//! fixed prices without touching the network.

mod traits;

pub mod yahoo;

pub use traits::MarketDataProvider;
