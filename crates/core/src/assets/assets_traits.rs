//! Asset repository and service traits.

use async_trait::async_trait;

use super::assets_model::{Asset, AssetTransaction, AssetUpdate, NewBuy};
use crate::errors::Result;
use crate::ownership::Principal;

/// Trait defining the contract for Asset repository operations.
///
/// The repository is the only component that mutates positions, and it does
/// so exclusively through [`AssetRepositoryTrait::apply_buy`].
#[async_trait]
pub trait AssetRepositoryTrait: Send + Sync {
    /// Applies a validated buy to `(portfolio_id, buy.symbol)` as one atomic
    /// unit: look up the position under the store's exclusive write lock,
    /// create or merge it, and append the ledger transaction.
    async fn apply_buy(&self, portfolio_id: &str, buy: NewBuy) -> Result<Asset>;

    /// Renames an asset's symbol. A symbol already held in the same portfolio
    /// fails with `Error::Conflict`.
    async fn rename_symbol(&self, asset_id: &str, symbol: &str) -> Result<Asset>;

    /// Retrieves an asset (with its portfolio owner) by ID.
    fn get_by_id(&self, asset_id: &str) -> Result<Asset>;

    /// Lists a portfolio's assets ordered by symbol.
    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Asset>>;

    /// Lists every asset in portfolios owned by `owner_id`.
    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Asset>>;

    /// Ledger of an asset in canonical `(created_at, id)` order.
    fn list_transactions(&self, asset_id: &str) -> Result<Vec<AssetTransaction>>;
}

/// Trait defining the contract for Asset service operations.
#[async_trait]
pub trait AssetServiceTrait: Send + Sync {
    /// Records a buy in a portfolio the actor owns and returns the resulting
    /// position.
    async fn apply_buy(
        &self,
        portfolio_id: &str,
        buy: NewBuy,
        actor: &Principal,
    ) -> Result<Asset>;

    /// Applies client edits. Derived fields are rejected.
    async fn update_asset(
        &self,
        asset_id: &str,
        update: AssetUpdate,
        actor: &Principal,
    ) -> Result<Asset>;

    fn get_asset(&self, asset_id: &str, actor: &Principal) -> Result<Asset>;

    fn list_assets(&self, actor: &Principal) -> Result<Vec<Asset>>;

    fn list_portfolio_assets(&self, portfolio_id: &str, actor: &Principal) -> Result<Vec<Asset>>;

    fn get_transactions(&self, asset_id: &str, actor: &Principal)
        -> Result<Vec<AssetTransaction>>;
}
