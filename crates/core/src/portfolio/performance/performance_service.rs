use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use rust_decimal::Decimal;

use super::calculator::{
    acquisition_performance, asset_performance, ledger_only_transactions,
    reconcile_transactions, summarize_assets, summarize_portfolios, transaction_performance,
    NO_TRANSACTIONS_REASON,
};
use super::performance_model::{
    AcquisitionPerformanceOutcome, AssetPerformanceOutcome, AssetPerformanceReport,
    AssetPerformanceSummary, PortfolioPerformance, PortfolioSetPerformance, PortfolioSummary,
    TransactionPerformance,
};
use super::performance_traits::PerformanceServiceTrait;
use crate::assets::{Asset, AssetRepositoryTrait, AssetTransaction};
use crate::errors::Result;
use crate::ownership::{ensure_owned_by, Principal};
use crate::portfolios::{Portfolio, PortfolioRepositoryTrait};
use crate::quotes::{QuoteError, QuoteSource};

type PriceMap = HashMap<String, std::result::Result<Decimal, QuoteError>>;

/// An asset together with its ledger in canonical order.
struct LoadedAsset {
    asset: Asset,
    ledger: Vec<AssetTransaction>,
}

/// Composes the calculator with the ledger store and the quote source.
pub struct PerformanceService {
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    asset_repository: Arc<dyn AssetRepositoryTrait>,
    quote_source: Arc<dyn QuoteSource>,
}

impl PerformanceService {
    pub fn new(
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        asset_repository: Arc<dyn AssetRepositoryTrait>,
        quote_source: Arc<dyn QuoteSource>,
    ) -> Self {
        Self {
            portfolio_repository,
            asset_repository,
            quote_source,
        }
    }

    fn owned_portfolio(&self, portfolio_id: &str, actor: &Principal) -> Result<Portfolio> {
        let portfolio = self.portfolio_repository.get_by_id(portfolio_id)?;
        ensure_owned_by(&portfolio, actor)?;
        Ok(portfolio)
    }

    fn owned_asset(&self, asset_id: &str, actor: &Principal) -> Result<LoadedAsset> {
        let asset = self.asset_repository.get_by_id(asset_id)?;
        ensure_owned_by(&asset, actor)?;
        self.load(asset)
    }

    fn load(&self, asset: Asset) -> Result<LoadedAsset> {
        let mut ledger = self.asset_repository.list_transactions(&asset.id)?;
        AssetTransaction::sort_canonical(&mut ledger);
        Ok(LoadedAsset { asset, ledger })
    }

    fn load_portfolio_assets(&self, portfolio_id: &str) -> Result<Vec<LoadedAsset>> {
        self.asset_repository
            .list_by_portfolio(portfolio_id)?
            .into_iter()
            .map(|asset| self.load(asset))
            .collect()
    }

    /// Fetches one current price per distinct symbol, concurrently.
    ///
    /// Assets without transactions are skipped since they can't produce
    /// performance anyway.
    async fn fetch_prices<'a, I>(&self, loaded: I) -> PriceMap
    where
        I: IntoIterator<Item = &'a LoadedAsset>,
    {
        let symbols: BTreeSet<&str> = loaded
            .into_iter()
            .filter(|l| !l.ledger.is_empty())
            .map(|l| l.asset.symbol.as_str())
            .collect();

        let lookups = symbols.into_iter().map(|symbol| async move {
            let price = self.quote_source.current_price(symbol).await;
            if let Err(e) = &price {
                warn!("Price unavailable for {}: {}", symbol, e);
            }
            (symbol.to_string(), price)
        });

        join_all(lookups).await.into_iter().collect()
    }

    fn evaluate(loaded: &LoadedAsset, prices: &PriceMap) -> AssetPerformanceOutcome {
        let symbol = &loaded.asset.symbol;
        if loaded.ledger.is_empty() {
            return AssetPerformanceOutcome::no_data(symbol, NO_TRANSACTIONS_REASON);
        }
        match prices.get(symbol) {
            Some(Ok(price)) => asset_performance(symbol, &loaded.ledger, *price),
            Some(Err(e)) => AssetPerformanceOutcome::no_data(symbol, e.to_string()),
            None => AssetPerformanceOutcome::no_data(
                symbol,
                QuoteError::MissingPrice(symbol.clone()).to_string(),
            ),
        }
    }

    fn report(loaded: LoadedAsset, outcome: &AssetPerformanceOutcome) -> AssetPerformanceReport {
        match outcome {
            AssetPerformanceOutcome::Data(performance) => AssetPerformanceReport {
                transactions: reconcile_transactions(&loaded.ledger, &performance.transactions),
                performance: Some(AssetPerformanceSummary::from(performance)),
                performance_error: None,
                asset: loaded.asset,
            },
            AssetPerformanceOutcome::NoData { reason, .. } => AssetPerformanceReport {
                transactions: ledger_only_transactions(&loaded.ledger),
                performance: None,
                performance_error: Some(reason.clone()),
                asset: loaded.asset,
            },
        }
    }

    fn summary(
        portfolio: &Portfolio,
        outcomes: &[AssetPerformanceOutcome],
    ) -> PortfolioSummary {
        PortfolioSummary {
            id: portfolio.id.clone(),
            name: portfolio.name.clone(),
            base_currency: portfolio.base_currency.clone(),
            created_at: portfolio.created_at,
            totals: summarize_assets(outcomes),
            asset_count: outcomes.len(),
            assets_without_data: outcomes.iter().filter(|o| o.performance().is_none()).count(),
        }
    }
}

#[async_trait]
impl PerformanceServiceTrait for PerformanceService {
    async fn transaction_performance(
        &self,
        asset_id: &str,
        actor: &Principal,
    ) -> Result<Vec<TransactionPerformance>> {
        let loaded = self.owned_asset(asset_id, actor)?;
        if loaded.ledger.is_empty() {
            return Ok(Vec::new());
        }
        match self.quote_source.current_price(&loaded.asset.symbol).await {
            Ok(price) => Ok(transaction_performance(&loaded.ledger, price).unwrap_or_else(|| {
                warn!("Performance of {} is out of range", loaded.asset.symbol);
                Vec::new()
            })),
            Err(e) => {
                warn!("Price unavailable for {}: {}", loaded.asset.symbol, e);
                Ok(Vec::new())
            }
        }
    }

    async fn asset_performance(
        &self,
        asset_id: &str,
        actor: &Principal,
    ) -> Result<AssetPerformanceOutcome> {
        let loaded = self.owned_asset(asset_id, actor)?;
        let prices = self.fetch_prices([&loaded]).await;
        Ok(Self::evaluate(&loaded, &prices))
    }

    async fn asset_detail(
        &self,
        asset_id: &str,
        actor: &Principal,
    ) -> Result<AssetPerformanceReport> {
        let loaded = self.owned_asset(asset_id, actor)?;
        let prices = self.fetch_prices([&loaded]).await;
        let outcome = Self::evaluate(&loaded, &prices);
        Ok(Self::report(loaded, &outcome))
    }

    async fn portfolio_performance(
        &self,
        portfolio_id: &str,
        actor: &Principal,
    ) -> Result<PortfolioPerformance> {
        let portfolio = self.owned_portfolio(portfolio_id, actor)?;
        let loaded = self.load_portfolio_assets(&portfolio.id)?;
        let prices = self.fetch_prices(&loaded).await;

        let outcomes: Vec<AssetPerformanceOutcome> =
            loaded.iter().map(|l| Self::evaluate(l, &prices)).collect();
        let totals = summarize_assets(&outcomes);
        debug!(
            "Portfolio {}: {} assets, cost {}, P/L {}",
            portfolio.id,
            outcomes.len(),
            totals.total_cost,
            totals.total_profit_loss
        );

        let assets = loaded
            .into_iter()
            .zip(outcomes.iter())
            .map(|(l, outcome)| Self::report(l, outcome))
            .collect();

        Ok(PortfolioPerformance {
            portfolio,
            totals,
            assets,
        })
    }

    async fn dashboard(&self, actor: &Principal) -> Result<PortfolioSetPerformance> {
        let portfolios = self.portfolio_repository.list_by_owner(&actor.user_id)?;
        let mut loaded_by_portfolio = Vec::with_capacity(portfolios.len());
        for portfolio in portfolios {
            let loaded = self.load_portfolio_assets(&portfolio.id)?;
            loaded_by_portfolio.push((portfolio, loaded));
        }

        let prices = self
            .fetch_prices(loaded_by_portfolio.iter().flat_map(|(_, loaded)| loaded))
            .await;

        let summaries = loaded_by_portfolio
            .iter()
            .map(|(portfolio, loaded)| {
                let outcomes: Vec<AssetPerformanceOutcome> =
                    loaded.iter().map(|l| Self::evaluate(l, &prices)).collect();
                Self::summary(portfolio, &outcomes)
            })
            .collect();

        Ok(summarize_portfolios(summaries))
    }

    async fn acquisition_performance(
        &self,
        asset_id: &str,
        actor: &Principal,
    ) -> Result<AcquisitionPerformanceOutcome> {
        let loaded = self.owned_asset(asset_id, actor)?;
        let symbol = loaded.asset.symbol.clone();

        let Some(first) = loaded.ledger.first() else {
            return Ok(AcquisitionPerformanceOutcome::NoData {
                symbol,
                reason: NO_TRANSACTIONS_REASON.to_string(),
            });
        };

        let acquisition_date = first.created_at.date();
        let (historical, current) = futures::join!(
            self.quote_source.price_at_or_after(&symbol, acquisition_date),
            self.quote_source.current_price(&symbol)
        );

        let current_price = match current {
            Ok(price) => price,
            Err(e) => {
                warn!("Price unavailable for {}: {}", symbol, e);
                return Ok(AcquisitionPerformanceOutcome::NoData {
                    symbol,
                    reason: e.to_string(),
                });
            }
        };
        let historical_close = historical
            .map_err(|e| debug!("No history for {} since {}: {}", symbol, acquisition_date, e))
            .ok();

        Ok(AcquisitionPerformanceOutcome::Data(acquisition_performance(
            &symbol,
            first,
            historical_close,
            current_price,
        )))
    }
}
