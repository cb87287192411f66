use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use stockfolio_core::assets::normalize_symbol;

use crate::{
    auth::AuthenticatedUser,
    error::ApiResult,
    main_lib::AppState,
    models::{QuoteNotFound, QuoteQuery},
};

/// Current price and display name for a symbol. Unlike performance reads,
/// a failed lookup is reported to the client as 404.
async fn get_quote(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(_actor): AuthenticatedUser,
    Query(query): Query<QuoteQuery>,
) -> ApiResult<Response> {
    let symbol = normalize_symbol(query.symbol.as_deref().unwrap_or_default())?;

    match state.quote_source.quote(&symbol).await {
        Ok(quote) => Ok(Json(quote).into_response()),
        Err(err) => {
            tracing::info!("Quote lookup failed: {}", err);
            let body = QuoteNotFound {
                error: "Could not fetch price".to_string(),
                symbol,
            };
            Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/market/quote", get(get_quote))
}
