use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use stockfolio_core::{
    assets::{AssetService, AssetServiceTrait},
    portfolio::performance::{PerformanceService, PerformanceServiceTrait},
    portfolios::{PortfolioService, PortfolioServiceTrait},
    quotes::{ProviderQuoteSource, QuoteSource},
};
use stockfolio_market_data::YahooProvider;
use stockfolio_storage_sqlite::{
    assets::AssetRepository,
    db::{self, write_actor},
    portfolios::PortfolioRepository,
};

use crate::{auth::JwtVerifier, config::Config};

pub struct AppState {
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub asset_service: Arc<dyn AssetServiceTrait>,
    pub performance_service: Arc<dyn PerformanceServiceTrait>,
    pub quote_source: Arc<dyn QuoteSource>,
    pub auth: Arc<JwtVerifier>,
}

pub fn init_tracing() {
    let log_format = std::env::var("SF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Wires the production state: SQLite storage and Yahoo Finance quotes.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = YahooProvider::new()?.with_timeout(config.quote_timeout);
    let quote_source: Arc<dyn QuoteSource> = Arc::new(ProviderQuoteSource::new(Arc::new(provider)));
    build_state_with_quote_source(config, quote_source).await
}

/// Wires the state around an explicit quote source.
pub async fn build_state_with_quote_source(
    config: &Config,
    quote_source: Arc<dyn QuoteSource>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let portfolio_repository = Arc::new(PortfolioRepository::new(pool.clone(), writer.clone()));
    let asset_repository = Arc::new(AssetRepository::new(pool.clone(), writer.clone()));

    let portfolio_service = Arc::new(PortfolioService::new(portfolio_repository.clone()));
    let asset_service = Arc::new(AssetService::new(
        asset_repository.clone(),
        portfolio_repository.clone(),
    ));
    let performance_service = Arc::new(PerformanceService::new(
        portfolio_repository,
        asset_repository,
        quote_source.clone(),
    ));

    Ok(Arc::new(AppState {
        portfolio_service,
        asset_service,
        performance_service,
        quote_source,
        auth: Arc::new(JwtVerifier::new(&config.jwt_secret)),
    }))
}
