//! Request and response bodies that only exist at the HTTP boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockfolio_core::assets::NewBuy;
use stockfolio_core::errors::ValidationError;

/// Body of a buy request. `average_price` is the price paid per unit in this
/// buy; the name follows the asset resource it creates or extends.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAssetRequest {
    #[serde(default)]
    pub portfolio: Option<String>,
    pub symbol: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
}

impl NewAssetRequest {
    pub fn into_buy(self) -> NewBuy {
        NewBuy::new(self.symbol, self.quantity, self.average_price)
    }

    /// Portfolio named in the body, required when the URL does not carry one.
    pub fn portfolio_id(&self) -> Result<String, ValidationError> {
        self.portfolio
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ValidationError::MissingField("portfolio".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Body returned when no price could be obtained for a symbol.
#[derive(Debug, Serialize)]
pub struct QuoteNotFound {
    pub error: String,
    pub symbol: String,
}
