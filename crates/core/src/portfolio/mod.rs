//! Portfolio analytics built on top of the ledger.

pub mod performance;

pub use performance::*;
