use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use stockfolio_core::quotes::{QuoteError, QuoteSource};
use stockfolio_server::{
    api::app_router, auth::JwtVerifier, build_state_with_quote_source, config::Config,
};
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &str = "integration-secret";

struct FixedQuotes(HashMap<String, Decimal>);

#[async_trait]
impl QuoteSource for FixedQuotes {
    async fn current_price(&self, symbol: &str) -> Result<Decimal, QuoteError> {
        self.0
            .get(symbol)
            .copied()
            .ok_or_else(|| QuoteError::SymbolNotFound(symbol.to_string()))
    }

    async fn price_at_or_after(
        &self,
        symbol: &str,
        _date: NaiveDate,
    ) -> Result<Decimal, QuoteError> {
        self.current_price(symbol).await
    }
}

struct TestApp {
    router: Router,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            listen_addr: "127.0.0.1:0".parse().unwrap(),
            db_path: dir.path().join("app.db").to_string_lossy().into_owned(),
            cors_allow_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            quote_timeout: Duration::from_secs(5),
            jwt_secret: SECRET.to_string(),
        };
        let quotes = FixedQuotes(HashMap::from([
            ("AAPL".to_string(), dec!(160)),
            ("MSFT".to_string(), dec!(300)),
        ]));
        let state = build_state_with_quote_source(&config, Arc::new(quotes))
            .await
            .unwrap();
        Self {
            router: app_router(state, &config),
            _dir: dir,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            let token = JwtVerifier::new(SECRET)
                .issue(user, Duration::from_secs(300))
                .unwrap();
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_portfolio(&self, user: &str, name: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/portfolios",
                Some(user),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn buy(&self, user: &str, portfolio: &str, symbol: &str, quantity: f64, price: f64) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                &format!("/api/v1/portfolios/{portfolio}/assets"),
                Some(user),
                Some(json!({ "symbol": symbol, "quantity": quantity, "average_price": price })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

fn approx(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap_or(f64::NAN);
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {value}"
    );
}

#[tokio::test]
async fn requests_without_a_token_are_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app.send(Method::GET, "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, "/api/v1/portfolios", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn buys_merge_and_portfolio_reports_performance() {
    let app = TestApp::new().await;
    let portfolio = app.create_portfolio("alice", "Main").await;

    app.buy("alice", &portfolio, "aapl", 10.0, 100.0).await;
    let merged = app.buy("alice", &portfolio, "AAPL", 5.0, 120.0).await;
    assert_eq!(merged["symbol"], "AAPL");
    approx(&merged["quantity"], 15.0);
    approx(&merged["average_price"], 106.6667);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/portfolios/{portfolio}"),
            Some("alice"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    approx(&body["total_cost"], 1600.0);
    approx(&body["current_value"], 2400.0);
    approx(&body["total_profit_loss"], 800.0);
    approx(&body["performance_pct"], 50.0);

    let assets = body["assets"].as_array().unwrap();
    assert_eq!(assets.len(), 1);
    let transactions = assets[0]["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    approx(&transactions[0]["price"], 100.0);
    approx(&transactions[0]["profit_loss"], 600.0);
    approx(&transactions[1]["price"], 120.0);
    assert!(transactions[1]["id"].is_string());
}

#[tokio::test]
async fn other_users_cannot_read_or_buy_into_a_portfolio() {
    let app = TestApp::new().await;
    let portfolio = app.create_portfolio("alice", "Main").await;

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/v1/portfolios/{portfolio}"),
            Some("mallory"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/assets",
            Some("mallory"),
            Some(json!({
                "portfolio": portfolio,
                "symbol": "AAPL",
                "quantity": 1,
                "average_price": 1
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(Method::GET, "/api/v1/portfolios", Some("mallory"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn invalid_buys_and_derived_field_edits_are_rejected() {
    let app = TestApp::new().await;
    let portfolio = app.create_portfolio("alice", "Main").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/assets",
            Some("alice"),
            Some(json!({
                "portfolio": portfolio,
                "symbol": "AAPL",
                "quantity": 0,
                "average_price": 10
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], json!(["quantity"]));

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/assets",
            Some("alice"),
            Some(json!({ "symbol": "AAPL", "quantity": 1, "average_price": 10 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], json!(["portfolio"]));

    let asset = app.buy("alice", &portfolio, "MSFT", 2.0, 250.0).await;
    let asset_id = asset["id"].as_str().unwrap();

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/assets/{asset_id}"),
            Some("alice"),
            Some(json!({ "quantity": 100 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"], json!(["quantity"]));

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/assets/{asset_id}"),
            Some("alice"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    approx(&body["quantity"], 2.0);
    approx(&body["total_profit_loss"], 100.0);
}

#[tokio::test]
async fn dashboard_skips_assets_without_quotes() {
    let app = TestApp::new().await;
    let growth = app.create_portfolio("alice", "Growth").await;
    let income = app.create_portfolio("alice", "Income").await;

    app.buy("alice", &growth, "AAPL", 10.0, 100.0).await;
    app.buy("alice", &income, "MSFT", 1.0, 200.0).await;
    app.buy("alice", &income, "NOPE", 3.0, 50.0).await;

    let (status, body) = app
        .send(Method::GET, "/api/v1/portfolios/dashboard", Some("alice"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_portfolios"], 2);
    approx(&body["total_investment_cost"], 1200.0);
    approx(&body["total_profit_loss"], 700.0);
    approx(&body["total_current_value"], 1900.0);

    let income_line = body["portfolios"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == income.as_str())
        .unwrap();
    assert_eq!(income_line["asset_count"], 2);
    assert_eq!(income_line["assets_without_data"], 1);
}

#[tokio::test]
async fn market_quote_endpoint() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(Method::GET, "/api/v1/market/quote?symbol=msft", Some("alice"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "MSFT");
    approx(&body["price"], 300.0);

    let (status, _) = app
        .send(Method::GET, "/api/v1/market/quote", Some("alice"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(Method::GET, "/api/v1/market/quote?symbol=NOPE", Some("alice"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["symbol"], "NOPE");
}
