//! The market quote collaborator contract.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::errors::QuoteError;
use super::model::MarketQuote;

/// External source of market prices.
///
/// Symbols are passed already normalized (trimmed, upper-cased). One call per
/// logical lookup; implementations must not retry on their own.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Latest known price for `symbol`.
    async fn current_price(&self, symbol: &str) -> Result<Decimal, QuoteError>;

    /// First closing price on or after `date`.
    async fn price_at_or_after(&self, symbol: &str, date: NaiveDate)
        -> Result<Decimal, QuoteError>;

    /// Current price with a display name. Sources without name data report
    /// the symbol itself as the name.
    async fn quote(&self, symbol: &str) -> Result<MarketQuote, QuoteError> {
        let price = self.current_price(symbol).await?;
        Ok(MarketQuote {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price,
        })
    }
}
