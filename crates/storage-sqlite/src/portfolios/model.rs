//! Database model for portfolios.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use stockfolio_core::portfolios::{NewPortfolio, Portfolio};
use stockfolio_core::constants::DEFAULT_BASE_CURRENCY;

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub base_currency: String,
    pub created_at: NaiveDateTime,
}

impl PortfolioDB {
    /// Builds the row for a validated `NewPortfolio`, generating an id when
    /// the caller did not supply one.
    pub fn from_new(owner_id: &str, domain: NewPortfolio) -> Self {
        Self {
            id: domain
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::now_v7().to_string()),
            owner_id: owner_id.to_string(),
            name: domain.name,
            base_currency: domain
                .base_currency
                .unwrap_or_else(|| DEFAULT_BASE_CURRENCY.to_string()),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl From<PortfolioDB> for Portfolio {
    fn from(db: PortfolioDB) -> Self {
        Self {
            id: db.id,
            owner_id: db.owner_id,
            name: db.name,
            base_currency: db.base_currency,
            created_at: db.created_at,
        }
    }
}
