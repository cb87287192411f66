//! Adapter from a market-data provider to the engine's quote seam.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;

use stockfolio_market_data::MarketDataProvider;

use super::errors::QuoteError;
use super::model::MarketQuote;
use super::quotes_traits::QuoteSource;

/// Window searched forward from the requested date when the market was closed.
const HISTORY_LOOKAHEAD_DAYS: u64 = 10;

/// [`QuoteSource`] backed by a [`MarketDataProvider`].
pub struct ProviderQuoteSource {
    provider: Arc<dyn MarketDataProvider>,
}

impl ProviderQuoteSource {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl QuoteSource for ProviderQuoteSource {
    async fn current_price(&self, symbol: &str) -> Result<Decimal, QuoteError> {
        let quote = self
            .provider
            .get_latest_quote(symbol)
            .await
            .map_err(|e| QuoteError::from_market_data(symbol, e))?;

        if quote.close <= Decimal::ZERO {
            return Err(QuoteError::MissingPrice(symbol.to_string()));
        }
        debug!(
            "Quote for {} from {}: {}",
            symbol,
            self.provider.id(),
            quote.close
        );
        Ok(quote.close)
    }

    async fn price_at_or_after(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Decimal, QuoteError> {
        let start = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| QuoteError::MissingPrice(symbol.to_string()))?
            .and_utc();
        let end = date
            .checked_add_days(Days::new(HISTORY_LOOKAHEAD_DAYS))
            .and_then(|d| d.and_hms_opt(23, 59, 59))
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now)
            .min(Utc::now());

        if end < start {
            return Err(QuoteError::MissingPrice(symbol.to_string()));
        }

        let quotes = self
            .provider
            .get_historical_quotes(symbol, start, end)
            .await
            .map_err(|e| QuoteError::from_market_data(symbol, e))?;

        quotes
            .iter()
            .filter(|q| q.timestamp.date_naive() >= date && q.close > Decimal::ZERO)
            .min_by_key(|q| q.timestamp)
            .map(|q| q.close)
            .ok_or_else(|| QuoteError::MissingPrice(symbol.to_string()))
    }

    async fn quote(&self, symbol: &str) -> Result<MarketQuote, QuoteError> {
        let (price, profile) = futures::join!(
            self.current_price(symbol),
            self.provider.get_profile(symbol)
        );
        let price = price?;

        let name = match profile {
            Ok(profile) => profile.name,
            Err(e) => {
                warn!("Profile lookup failed for {}: {}", symbol, e);
                None
            }
        }
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| symbol.to_string());

        Ok(MarketQuote {
            symbol: symbol.to_string(),
            name,
            price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use rust_decimal_macros::dec;
    use stockfolio_market_data::{AssetProfile, MarketDataError, Quote};

    struct StubProvider {
        latest: Option<Decimal>,
        history: Vec<(DateTime<Utc>, Decimal)>,
    }

    #[async_trait]
    impl MarketDataProvider for StubProvider {
        fn id(&self) -> &'static str {
            "STUB"
        }

        async fn get_latest_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
            self.latest
                .map(|close| Quote::new(symbol, Utc::now(), close, "STUB"))
                .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
        }

        async fn get_historical_quotes(
            &self,
            symbol: &str,
            _start: DateTime<Utc>,
            _end: DateTime<Utc>,
        ) -> Result<Vec<Quote>, MarketDataError> {
            Ok(self
                .history
                .iter()
                .map(|(ts, close)| Quote::new(symbol, *ts, *close, "STUB"))
                .collect())
        }

        async fn get_profile(&self, _symbol: &str) -> Result<AssetProfile, MarketDataError> {
            Ok(AssetProfile {
                name: Some("Apple Inc.".to_string()),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_price_at_or_after_picks_first_trading_day() {
        let provider = StubProvider {
            latest: Some(dec!(190)),
            history: vec![
                (Utc.with_ymd_and_hms(2024, 1, 3, 14, 30, 0).unwrap(), dec!(184.25)),
                (Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap(), dec!(185.64)),
                (Utc.with_ymd_and_hms(2023, 12, 29, 14, 30, 0).unwrap(), dec!(192.53)),
            ],
        };
        let source = ProviderQuoteSource::new(Arc::new(provider));
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let price = source.price_at_or_after("AAPL", date).await.unwrap();
        assert_eq!(price, dec!(185.64));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_unavailable() {
        let provider = StubProvider {
            latest: None,
            history: vec![],
        };
        let source = ProviderQuoteSource::new(Arc::new(provider));

        let err = source.current_price("NOPE").await.unwrap_err();
        assert_eq!(err, QuoteError::SymbolNotFound("NOPE".to_string()));
    }

    #[tokio::test]
    async fn test_quote_uses_profile_name() {
        let provider = StubProvider {
            latest: Some(dec!(190.5)),
            history: vec![],
        };
        let source = ProviderQuoteSource::new(Arc::new(provider));

        let quote = source.quote("AAPL").await.unwrap();
        assert_eq!(quote.name, "Apple Inc.");
        assert_eq!(quote.price, dec!(190.5));
    }
}
