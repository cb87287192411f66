use log::debug;
use std::sync::Arc;

use super::assets_model::{Asset, AssetTransaction, AssetUpdate, NewBuy};
use super::assets_traits::{AssetRepositoryTrait, AssetServiceTrait};
use crate::errors::Result;
use crate::ownership::{ensure_owned_by, Principal};
use crate::portfolios::PortfolioRepositoryTrait;

/// Service owning the buy path and asset edits.
pub struct AssetService {
    repository: Arc<dyn AssetRepositoryTrait>,
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
}

impl AssetService {
    pub fn new(
        repository: Arc<dyn AssetRepositoryTrait>,
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            portfolio_repository,
        }
    }

    fn owned_asset(&self, asset_id: &str, actor: &Principal) -> Result<Asset> {
        let asset = self.repository.get_by_id(asset_id)?;
        ensure_owned_by(&asset, actor)?;
        Ok(asset)
    }
}

#[async_trait::async_trait]
impl AssetServiceTrait for AssetService {
    async fn apply_buy(
        &self,
        portfolio_id: &str,
        mut buy: NewBuy,
        actor: &Principal,
    ) -> Result<Asset> {
        // Reject bad input before touching the store.
        buy.validate()?;

        let portfolio = self.portfolio_repository.get_by_id(portfolio_id)?;
        ensure_owned_by(&portfolio, actor)?;

        debug!(
            "Applying buy of {} {} @ {} to portfolio {}",
            buy.quantity, buy.symbol, buy.price, portfolio.id
        );
        self.repository.apply_buy(&portfolio.id, buy).await
    }

    async fn update_asset(
        &self,
        asset_id: &str,
        mut update: AssetUpdate,
        actor: &Principal,
    ) -> Result<Asset> {
        update.validate()?;
        let asset = self.owned_asset(asset_id, actor)?;

        match update.symbol {
            Some(symbol) if symbol != asset.symbol => {
                self.repository.rename_symbol(&asset.id, &symbol).await
            }
            _ => Ok(asset),
        }
    }

    fn get_asset(&self, asset_id: &str, actor: &Principal) -> Result<Asset> {
        self.owned_asset(asset_id, actor)
    }

    fn list_assets(&self, actor: &Principal) -> Result<Vec<Asset>> {
        self.repository.list_by_owner(&actor.user_id)
    }

    fn list_portfolio_assets(&self, portfolio_id: &str, actor: &Principal) -> Result<Vec<Asset>> {
        let portfolio = self.portfolio_repository.get_by_id(portfolio_id)?;
        ensure_owned_by(&portfolio, actor)?;
        self.repository.list_by_portfolio(&portfolio.id)
    }

    fn get_transactions(
        &self,
        asset_id: &str,
        actor: &Principal,
    ) -> Result<Vec<AssetTransaction>> {
        let asset = self.owned_asset(asset_id, actor)?;
        self.repository.list_transactions(&asset.id)
    }
}
