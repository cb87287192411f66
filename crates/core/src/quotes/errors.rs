//! Quote-related error types.

use thiserror::Error;

use stockfolio_market_data::MarketDataError;

/// Reasons a quote source could not supply a usable price.
///
/// Every variant means the same thing to the performance engine: "price
/// unavailable". The distinction only matters for logging and for the direct
/// quote endpoint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No usable price for {0}")]
    MissingPrice(String),

    #[error("Provider error for {symbol}: {message}")]
    Provider { symbol: String, message: String },

    #[error("Quote request timed out for {0}")]
    Timeout(String),
}

impl QuoteError {
    /// Translate a provider failure for `symbol` into the engine's vocabulary.
    pub fn from_market_data(symbol: &str, err: MarketDataError) -> Self {
        match err {
            MarketDataError::SymbolNotFound(_) => QuoteError::SymbolNotFound(symbol.to_string()),
            MarketDataError::NoDataForRange | MarketDataError::ValidationFailed { .. } => {
                QuoteError::MissingPrice(symbol.to_string())
            }
            MarketDataError::Timeout { .. } => QuoteError::Timeout(symbol.to_string()),
            other => QuoteError::Provider {
                symbol: symbol.to_string(),
                message: other.to_string(),
            },
        }
    }

    /// The symbol the failed lookup was for.
    pub fn symbol(&self) -> &str {
        match self {
            QuoteError::SymbolNotFound(symbol)
            | QuoteError::MissingPrice(symbol)
            | QuoteError::Timeout(symbol) => symbol,
            QuoteError::Provider { symbol, .. } => symbol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_data_errors_collapse_to_quote_errors() {
        assert_eq!(
            QuoteError::from_market_data("AAPL", MarketDataError::NoDataForRange),
            QuoteError::MissingPrice("AAPL".to_string())
        );
        assert_eq!(
            QuoteError::from_market_data(
                "AAPL",
                MarketDataError::Timeout {
                    provider: "YAHOO".to_string()
                }
            ),
            QuoteError::Timeout("AAPL".to_string())
        );
        let err = QuoteError::from_market_data(
            "AAPL",
            MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: "boom".to_string(),
            },
        );
        assert_eq!(err.symbol(), "AAPL");
    }
}
