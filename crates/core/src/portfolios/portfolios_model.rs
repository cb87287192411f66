//! Portfolio domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BASE_CURRENCY, MAX_CURRENCY_CODE_LENGTH, MAX_PORTFOLIO_NAME_LENGTH};
use crate::errors::ValidationError;
use crate::ownership::Ownable;
use crate::{Error, Result};

/// Domain model representing a user's portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub base_currency: String,
    pub created_at: NaiveDateTime,
}

impl Ownable for Portfolio {
    fn owning_user(&self) -> &str {
        &self.owner_id
    }

    fn ownership_label(&self) -> String {
        format!("Portfolio {}", self.id)
    }
}

/// Input model for creating a new portfolio. The owner comes from the
/// authenticated principal, never from the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPortfolio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub base_currency: Option<String>,
}

impl NewPortfolio {
    /// Validates and normalizes the payload in place.
    pub fn validate(&mut self) -> Result<()> {
        self.name = validate_name(&self.name)?;
        self.base_currency = Some(match self.base_currency.as_deref() {
            Some(code) => normalize_currency(code)?,
            None => DEFAULT_BASE_CURRENCY.to_string(),
        });
        Ok(())
    }
}

/// Input model for editing a portfolio's name or base currency.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub base_currency: Option<String>,
}

impl PortfolioUpdate {
    /// Validates and normalizes the provided fields in place.
    pub fn validate(&mut self) -> Result<()> {
        if self.name.is_none() && self.base_currency.is_none() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Nothing to update".to_string(),
            )));
        }
        if let Some(name) = self.name.as_deref() {
            self.name = Some(validate_name(name)?);
        }
        if let Some(code) = self.base_currency.as_deref() {
            self.base_currency = Some(normalize_currency(code)?);
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "name".to_string(),
        )));
    }
    if trimmed.chars().count() > MAX_PORTFOLIO_NAME_LENGTH {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Portfolio name cannot exceed {} characters",
            MAX_PORTFOLIO_NAME_LENGTH
        ))));
    }
    Ok(trimmed.to_string())
}

/// Trims and upper-cases a currency code, rejecting malformed ones.
pub fn normalize_currency(code: &str) -> Result<String> {
    let code = code.trim().to_uppercase();
    let valid_length = (3..=MAX_CURRENCY_CODE_LENGTH).contains(&code.len());
    if !valid_length || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Invalid currency code '{}'",
            code
        ))));
    }
    Ok(code)
}
