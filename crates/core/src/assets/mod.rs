//! Assets module - positions, their ledger, and the buy merge rules.

mod assets_model;
mod assets_service;
mod assets_traits;
mod position;

#[cfg(test)]
mod assets_model_tests;

pub use assets_model::{normalize_symbol, Asset, AssetTransaction, AssetUpdate, NewBuy};
pub use assets_service::AssetService;
pub use assets_traits::{AssetRepositoryTrait, AssetServiceTrait};
pub use position::{apply_buy_to_position, Position};
