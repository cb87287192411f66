//! Database models for assets and asset transactions.
//!
//! Decimal amounts are stored as TEXT so no precision is lost to SQLite's
//! floating point REAL type.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::StorageError;
use stockfolio_core::assets::{Asset, AssetTransaction, Position};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetDB {
    pub id: String,
    pub portfolio_id: String,
    pub symbol: String,
    pub quantity: String,
    pub average_price: String,
    pub created_at: NaiveDateTime,
}

impl AssetDB {
    /// Opens a new row for the first buy of `symbol` in a portfolio.
    pub fn open(portfolio_id: &str, symbol: &str, position: &Position, now: NaiveDateTime) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            portfolio_id: portfolio_id.to_string(),
            symbol: symbol.to_string(),
            quantity: position.quantity.to_string(),
            average_price: position.average_price.to_string(),
            created_at: now,
        }
    }

    pub fn position(&self) -> Result<Position, StorageError> {
        Ok(Position::new(
            Decimal::from_str(&self.quantity)?,
            Decimal::from_str(&self.average_price)?,
        ))
    }

    pub fn into_domain(self, owner_id: String) -> Result<Asset, StorageError> {
        let position = self.position()?;
        Ok(Asset {
            id: self.id,
            portfolio_id: self.portfolio_id,
            owner_id,
            symbol: self.symbol,
            quantity: position.quantity,
            average_price: position.average_price,
            created_at: self.created_at,
        })
    }
}

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetTransactionDB {
    pub id: String,
    pub asset_id: String,
    pub quantity: String,
    pub price: String,
    pub created_at: NaiveDateTime,
}

impl AssetTransactionDB {
    pub fn buy(asset_id: &str, quantity: Decimal, price: Decimal, now: NaiveDateTime) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            asset_id: asset_id.to_string(),
            quantity: quantity.normalize().to_string(),
            price: price.normalize().to_string(),
            created_at: now,
        }
    }
}

impl TryFrom<AssetTransactionDB> for AssetTransaction {
    type Error = StorageError;

    fn try_from(db: AssetTransactionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            id: db.id,
            asset_id: db.asset_id,
            quantity: Decimal::from_str(&db.quantity)?,
            price: Decimal::from_str(&db.price)?,
            created_at: db.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_text_survives_round_trip() {
        let now = chrono::Utc::now().naive_utc();
        let row = AssetTransactionDB::buy("asset-1", dec!(2.5000), dec!(101.1234), now);
        assert_eq!(row.quantity, "2.5");
        let tx = AssetTransaction::try_from(row).unwrap();
        assert_eq!(tx.price, dec!(101.1234));
    }

    #[test]
    fn test_malformed_decimal_is_reported() {
        let mut row = AssetDB::open(
            "p1",
            "AAPL",
            &Position::new(dec!(1), dec!(1)),
            chrono::Utc::now().naive_utc(),
        );
        row.quantity = "not-a-number".to_string();
        assert!(matches!(row.position(), Err(StorageError::Corrupt(_))));
    }
}
