use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::model::PortfolioDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::{conflict_on_unique, IntoCore};
use crate::schema::portfolios;
use stockfolio_core::portfolios::{
    NewPortfolio, Portfolio, PortfolioRepositoryTrait, PortfolioUpdate,
};
use stockfolio_core::{Error, Result};

/// Repository for managing portfolio data in the database
pub struct PortfolioRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PortfolioRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn find_portfolio(conn: &mut SqliteConnection, portfolio_id: &str) -> Result<PortfolioDB> {
    portfolios::table
        .find(portfolio_id)
        .select(PortfolioDB::as_select())
        .first::<PortfolioDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::NotFound(format!("Portfolio {} not found", portfolio_id)))
}

fn duplicate_name(name: &str) -> String {
    format!("A portfolio named '{}' already exists", name)
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    async fn create(&self, owner_id: &str, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        let row = PortfolioDB::from_new(owner_id, new_portfolio);
        self.writer
            .exec(move |conn| {
                diesel::insert_into(portfolios::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(|e| conflict_on_unique(e, || duplicate_name(&row.name)))?;
                Ok(row.into())
            })
            .await
    }

    async fn update(&self, portfolio_id: &str, update: PortfolioUpdate) -> Result<Portfolio> {
        let portfolio_id = portfolio_id.to_string();
        self.writer
            .exec(move |conn| {
                let mut row = find_portfolio(conn, &portfolio_id)?;
                if let Some(name) = update.name {
                    row.name = name;
                }
                if let Some(code) = update.base_currency {
                    row.base_currency = code;
                }

                diesel::update(portfolios::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .map_err(|e| conflict_on_unique(e, || duplicate_name(&row.name)))?;

                Ok(row.into())
            })
            .await
    }

    async fn delete(&self, portfolio_id: &str) -> Result<usize> {
        let portfolio_id = portfolio_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(portfolios::table.find(portfolio_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)?;
        Ok(find_portfolio(&mut conn, portfolio_id)?.into())
    }

    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = portfolios::table
            .filter(portfolios::owner_id.eq(owner_id))
            .select(PortfolioDB::as_select())
            .order((portfolios::created_at.asc(), portfolios::id.asc()))
            .load::<PortfolioDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Portfolio::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use tempfile::tempdir;

    async fn setup() -> (PortfolioRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (PortfolioRepository::new(pool, writer), temp_dir)
    }

    fn new_portfolio(name: &str) -> NewPortfolio {
        NewPortfolio {
            id: None,
            name: name.to_string(),
            base_currency: Some("USD".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_by_owner() {
        let (repo, _dir) = setup().await;
        let first = repo.create("alice", new_portfolio("Growth")).await.unwrap();
        repo.create("alice", new_portfolio("Income")).await.unwrap();
        repo.create("bob", new_portfolio("Growth")).await.unwrap();

        let listed = repo.list_by_owner("alice").unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, first.id);
        assert!(listed.iter().all(|p| p.owner_id == "alice"));
    }

    #[tokio::test]
    async fn test_duplicate_name_for_same_owner_conflicts() {
        let (repo, _dir) = setup().await;
        repo.create("alice", new_portfolio("Growth")).await.unwrap();
        let err = repo
            .create("alice", new_portfolio("Growth"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (repo, _dir) = setup().await;
        let created = repo.create("alice", new_portfolio("Growth")).await.unwrap();

        let updated = repo
            .update(
                &created.id,
                PortfolioUpdate {
                    name: Some("Long term".to_string()),
                    base_currency: Some("EUR".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Long term");
        assert_eq!(updated.base_currency, "EUR");
        assert_eq!(updated.owner_id, "alice");

        assert_eq!(repo.delete(&created.id).await.unwrap(), 1);
        assert!(matches!(
            repo.get_by_id(&created.id).unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_update_missing_portfolio_is_not_found() {
        let (repo, _dir) = setup().await;
        let err = repo
            .update(
                "missing",
                PortfolioUpdate {
                    name: Some("X".to_string()),
                    base_currency: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
