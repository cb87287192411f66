use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use stockfolio_core::{
    assets::{Asset, AssetUpdate},
    portfolio::performance::{AcquisitionPerformanceOutcome, AssetPerformanceReport},
};

use crate::{auth::AuthenticatedUser, error::ApiResult, main_lib::AppState, models::NewAssetRequest};

async fn list_assets(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> ApiResult<Json<Vec<Asset>>> {
    let assets = state.asset_service.list_assets(&actor)?;
    Ok(Json(assets))
}

async fn create_asset(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<NewAssetRequest>,
) -> ApiResult<(StatusCode, Json<Asset>)> {
    let portfolio_id = payload.portfolio_id()?;
    let asset = state
        .asset_service
        .apply_buy(&portfolio_id, payload.into_buy(), &actor)
        .await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

async fn get_asset(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> ApiResult<Json<AssetPerformanceReport>> {
    let report = state.performance_service.asset_detail(&id, &actor).await?;
    Ok(Json(report))
}

async fn update_asset(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<AssetUpdate>,
) -> ApiResult<Json<Asset>> {
    let asset = state
        .asset_service
        .update_asset(&id, payload, &actor)
        .await?;
    Ok(Json(asset))
}

async fn acquisition_performance(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> ApiResult<Json<AcquisitionPerformanceOutcome>> {
    let outcome = state
        .performance_service
        .acquisition_performance(&id, &actor)
        .await?;
    Ok(Json(outcome))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assets", get(list_assets).post(create_asset))
        .route(
            "/assets/{id}",
            get(get_asset).put(update_asset).patch(update_asset),
        )
        .route(
            "/assets/{id}/acquisition-performance",
            get(acquisition_performance),
        )
}
