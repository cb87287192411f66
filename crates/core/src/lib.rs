//! Stockfolio Core - cost-basis accounting and performance engine.
//!
//! This crate holds the domain rules: how buys merge into positions, how
//! performance is computed and rolled up, and who may touch what. It is
//! database-agnostic and defines the repository traits implemented by the
//! `storage-sqlite` crate, plus the quote-source seam used to price assets.

pub mod assets;
pub mod constants;
pub mod errors;
pub mod ownership;
pub mod portfolio;
pub mod portfolios;
pub mod quotes;
pub mod utils;

pub use assets::*;
pub use ownership::{ensure_owned_by, Ownable, Principal};
pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
