//! Portfolio repository and service traits.
//!
//! These traits define the contract for portfolio operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::portfolios_model::{NewPortfolio, Portfolio, PortfolioUpdate};
use crate::errors::Result;
use crate::ownership::Principal;

/// Trait defining the contract for Portfolio repository operations.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    /// Creates a portfolio owned by `owner_id`.
    ///
    /// A duplicate `(owner, name)` pair fails with `Error::Conflict`.
    async fn create(&self, owner_id: &str, new_portfolio: NewPortfolio) -> Result<Portfolio>;

    /// Updates name and/or base currency.
    async fn update(&self, portfolio_id: &str, update: PortfolioUpdate) -> Result<Portfolio>;

    /// Deletes a portfolio together with its assets and their transactions.
    ///
    /// Returns the number of deleted portfolio rows.
    async fn delete(&self, portfolio_id: &str) -> Result<usize>;

    /// Retrieves a portfolio by its ID.
    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio>;

    /// Lists the portfolios owned by `owner_id`, oldest first.
    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Portfolio>>;
}

/// Trait defining the contract for Portfolio service operations.
///
/// Every operation is scoped to the acting principal.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    async fn create_portfolio(
        &self,
        new_portfolio: NewPortfolio,
        actor: &Principal,
    ) -> Result<Portfolio>;

    async fn update_portfolio(
        &self,
        portfolio_id: &str,
        update: PortfolioUpdate,
        actor: &Principal,
    ) -> Result<Portfolio>;

    async fn delete_portfolio(&self, portfolio_id: &str, actor: &Principal) -> Result<()>;

    /// Retrieves a portfolio, failing with `PermissionDenied` for non-owners.
    fn get_portfolio(&self, portfolio_id: &str, actor: &Principal) -> Result<Portfolio>;

    fn list_portfolios(&self, actor: &Principal) -> Result<Vec<Portfolio>>;
}
