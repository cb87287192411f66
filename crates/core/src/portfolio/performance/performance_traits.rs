use async_trait::async_trait;

use super::performance_model::{
    AcquisitionPerformanceOutcome, AssetPerformanceOutcome, AssetPerformanceReport,
    PortfolioPerformance, PortfolioSetPerformance, TransactionPerformance,
};
use crate::errors::Result;
use crate::ownership::Principal;

/// Read-side operations over the ledger and the quote source.
///
/// Ownership and store failures abort a call. Quote failures never do: they
/// degrade into per-asset `NoData` results.
#[async_trait]
pub trait PerformanceServiceTrait: Send + Sync {
    /// Per-transaction rows for an asset; empty when there is no ledger or no
    /// usable price.
    async fn transaction_performance(
        &self,
        asset_id: &str,
        actor: &Principal,
    ) -> Result<Vec<TransactionPerformance>>;

    async fn asset_performance(
        &self,
        asset_id: &str,
        actor: &Principal,
    ) -> Result<AssetPerformanceOutcome>;

    /// Asset with its performance and reconciled ledger.
    async fn asset_detail(&self, asset_id: &str, actor: &Principal)
        -> Result<AssetPerformanceReport>;

    async fn portfolio_performance(
        &self,
        portfolio_id: &str,
        actor: &Principal,
    ) -> Result<PortfolioPerformance>;

    /// Aggregation over all of the actor's portfolios.
    async fn dashboard(&self, actor: &Principal) -> Result<PortfolioSetPerformance>;

    /// Return since the first purchase of the asset.
    async fn acquisition_performance(
        &self,
        asset_id: &str,
        actor: &Principal,
    ) -> Result<AcquisitionPerformanceOutcome>;
}
