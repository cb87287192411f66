use log::{debug, info};
use std::sync::Arc;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioUpdate};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::errors::Result;
use crate::ownership::{ensure_owned_by, Principal};

/// Service for managing portfolios
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
}

impl PortfolioService {
    pub fn new(repository: Arc<dyn PortfolioRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl PortfolioServiceTrait for PortfolioService {
    async fn create_portfolio(
        &self,
        mut new_portfolio: NewPortfolio,
        actor: &Principal,
    ) -> Result<Portfolio> {
        new_portfolio.validate()?;
        debug!(
            "Creating portfolio '{}' for user {}",
            new_portfolio.name, actor.user_id
        );
        self.repository.create(&actor.user_id, new_portfolio).await
    }

    async fn update_portfolio(
        &self,
        portfolio_id: &str,
        mut update: PortfolioUpdate,
        actor: &Principal,
    ) -> Result<Portfolio> {
        update.validate()?;
        let existing = self.repository.get_by_id(portfolio_id)?;
        ensure_owned_by(&existing, actor)?;
        self.repository.update(portfolio_id, update).await
    }

    async fn delete_portfolio(&self, portfolio_id: &str, actor: &Principal) -> Result<()> {
        let existing = self.repository.get_by_id(portfolio_id)?;
        ensure_owned_by(&existing, actor)?;
        self.repository.delete(portfolio_id).await?;
        info!("Deleted portfolio {} and its positions", portfolio_id);
        Ok(())
    }

    fn get_portfolio(&self, portfolio_id: &str, actor: &Principal) -> Result<Portfolio> {
        let portfolio = self.repository.get_by_id(portfolio_id)?;
        ensure_owned_by(&portfolio, actor)?;
        Ok(portfolio)
    }

    fn list_portfolios(&self, actor: &Principal) -> Result<Vec<Portfolio>> {
        self.repository.list_by_owner(&actor.user_id)
    }
}
