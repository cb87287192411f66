use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current price of a symbol together with its display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketQuote {
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
}
