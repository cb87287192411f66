use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use stockfolio_core::{
    assets::Asset,
    portfolio::performance::{PortfolioPerformance, PortfolioSetPerformance},
    portfolios::{NewPortfolio, Portfolio, PortfolioUpdate},
};

use crate::{auth::AuthenticatedUser, error::ApiResult, main_lib::AppState, models::NewAssetRequest};

async fn list_portfolios(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> ApiResult<Json<Vec<Portfolio>>> {
    let portfolios = state.portfolio_service.list_portfolios(&actor)?;
    Ok(Json(portfolios))
}

async fn create_portfolio(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<NewPortfolio>,
) -> ApiResult<(StatusCode, Json<Portfolio>)> {
    let portfolio = state
        .portfolio_service
        .create_portfolio(payload, &actor)
        .await?;
    Ok((StatusCode::CREATED, Json(portfolio)))
}

async fn get_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> ApiResult<Json<PortfolioPerformance>> {
    let performance = state
        .performance_service
        .portfolio_performance(&id, &actor)
        .await?;
    Ok(Json(performance))
}

async fn update_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<PortfolioUpdate>,
) -> ApiResult<Json<Portfolio>> {
    let portfolio = state
        .portfolio_service
        .update_portfolio(&id, payload, &actor)
        .await?;
    Ok(Json(portfolio))
}

async fn delete_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> ApiResult<StatusCode> {
    state.portfolio_service.delete_portfolio(&id, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn buy_into_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<NewAssetRequest>,
) -> ApiResult<(StatusCode, Json<Asset>)> {
    let asset = state
        .asset_service
        .apply_buy(&id, payload.into_buy(), &actor)
        .await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> ApiResult<Json<PortfolioSetPerformance>> {
    let summary = state.performance_service.dashboard(&actor).await?;
    Ok(Json(summary))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolios", get(list_portfolios).post(create_portfolio))
        .route("/portfolios/dashboard", get(dashboard))
        .route(
            "/portfolios/{id}",
            get(get_portfolio)
                .put(update_portfolio)
                .delete(delete_portfolio),
        )
        .route("/portfolios/{id}/assets", post(buy_into_portfolio))
}
