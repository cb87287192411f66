//! Asset domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_AMOUNT_INTEGER_DIGITS, MAX_SYMBOL_LENGTH, STORAGE_DECIMAL_PRECISION};
use crate::errors::ValidationError;
use crate::ownership::Ownable;
use crate::{Error, Result};

/// Trims and upper-cases a ticker symbol so "aapl " and "AAPL" name the same
/// position.
pub fn normalize_symbol(raw: &str) -> Result<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "symbol".to_string(),
        )));
    }
    if symbol.chars().count() > MAX_SYMBOL_LENGTH {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Symbol cannot exceed {} characters",
            MAX_SYMBOL_LENGTH
        ))));
    }
    Ok(symbol)
}

/// A position held within a portfolio.
///
/// `quantity` and `average_price` are derived from the asset's transactions
/// and only change through a buy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub portfolio_id: String,
    /// Owner of the parent portfolio, loaded alongside the asset.
    #[serde(default, skip_serializing)]
    pub owner_id: String,
    pub symbol: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub created_at: NaiveDateTime,
}

impl Ownable for Asset {
    fn owning_user(&self) -> &str {
        &self.owner_id
    }

    fn ownership_label(&self) -> String {
        format!("Asset {}", self.id)
    }
}

/// Immutable ledger entry recording one buy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTransaction {
    pub id: String,
    pub asset_id: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub created_at: NaiveDateTime,
}

impl AssetTransaction {
    /// Canonical ledger order: creation time, ties broken by id.
    pub fn sort_canonical(transactions: &mut [AssetTransaction]) {
        transactions.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}

/// A buy of `quantity` units at `price` per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBuy {
    pub symbol: String,
    pub quantity: Decimal,
    pub price: Decimal,
}

impl NewBuy {
    pub fn new(symbol: impl Into<String>, quantity: Decimal, price: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            price,
        }
    }

    /// Validates the buy and normalizes its symbol in place.
    pub fn validate(&mut self) -> Result<()> {
        self.symbol = normalize_symbol(&self.symbol)?;
        validate_amount("quantity", self.quantity)?;
        validate_amount("price", self.price)?;
        Ok(())
    }
}

fn validate_amount(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::NonPositive(
            field.to_string(),
        )));
    }
    if value.normalize().scale() > STORAGE_DECIMAL_PRECISION {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Field '{}' cannot have more than {} decimal places",
            field, STORAGE_DECIMAL_PRECISION
        ))));
    }
    if value >= Decimal::from(10_i64.pow(MAX_AMOUNT_INTEGER_DIGITS)) {
        return Err(Error::Validation(ValidationError::OutOfRange(
            field.to_string(),
        )));
    }
    Ok(())
}

/// Client-supplied changes to an asset.
///
/// `quantity` and `average_price` are only present so that attempts to write
/// them can be detected and rejected; a key sent with any value, including
/// `null`, counts as an attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetUpdate {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub quantity: Option<Option<Decimal>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub average_price: Option<Option<Decimal>>,
}

impl AssetUpdate {
    /// Derived fields this update tries to set directly.
    pub fn blocked_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if self.quantity.is_some() {
            fields.push("quantity".to_string());
        }
        if self.average_price.is_some() {
            fields.push("average_price".to_string());
        }
        fields
    }

    /// Rejects writes to derived fields, then normalizes the symbol in place.
    pub fn validate(&mut self) -> Result<()> {
        let blocked = self.blocked_fields();
        if !blocked.is_empty() {
            return Err(Error::Validation(ValidationError::ReadOnlyFields(blocked)));
        }
        if let Some(symbol) = self.symbol.as_deref() {
            self.symbol = Some(normalize_symbol(symbol)?);
        }
        Ok(())
    }
}
