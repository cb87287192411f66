use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use super::model::{AssetDB, AssetTransactionDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{conflict_on_unique, IntoCore};
use crate::schema::{asset_transactions, assets, portfolios};
use stockfolio_core::assets::{
    apply_buy_to_position, Asset, AssetRepositoryTrait, AssetTransaction, NewBuy,
};
use stockfolio_core::{Error, Result};

/// Repository for positions and their append-only buy ledger.
pub struct AssetRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AssetRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

fn into_assets(rows: Vec<(AssetDB, String)>) -> Result<Vec<Asset>> {
    rows.into_iter()
        .map(|(row, owner_id)| row.into_domain(owner_id).map_err(Error::from))
        .collect()
}

fn find_asset(conn: &mut SqliteConnection, asset_id: &str) -> Result<Asset> {
    let (row, owner_id) = assets::table
        .inner_join(portfolios::table)
        .filter(assets::id.eq(asset_id))
        .select((AssetDB::as_select(), portfolios::owner_id))
        .first::<(AssetDB, String)>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::NotFound(format!("Asset {} not found", asset_id)))?;
    Ok(row.into_domain(owner_id)?)
}

fn symbol_taken(symbol: &str) -> String {
    format!("Symbol {} is already held in this portfolio", symbol)
}

#[async_trait]
impl AssetRepositoryTrait for AssetRepository {
    async fn apply_buy(&self, portfolio_id: &str, buy: NewBuy) -> Result<Asset> {
        let portfolio_id = portfolio_id.to_string();
        // The single writer serializes every buy, including buys on unrelated
        // positions. SQLite takes a database-wide write lock anyway.
        self.writer
            .exec(move |conn| {
                let owner_id = portfolios::table
                    .find(&portfolio_id)
                    .select(portfolios::owner_id)
                    .first::<String>(conn)
                    .optional()
                    .into_core()?
                    .ok_or_else(|| {
                        Error::NotFound(format!("Portfolio {} not found", portfolio_id))
                    })?;

                let existing = assets::table
                    .filter(assets::portfolio_id.eq(&portfolio_id))
                    .filter(assets::symbol.eq(&buy.symbol))
                    .select(AssetDB::as_select())
                    .first::<AssetDB>(conn)
                    .optional()
                    .into_core()?;

                let before = existing
                    .as_ref()
                    .map(AssetDB::position)
                    .transpose()?;
                let after = apply_buy_to_position(before.as_ref(), buy.quantity, buy.price)?;
                let now = chrono::Utc::now().naive_utc();

                let row = match existing {
                    Some(mut row) => {
                        row.quantity = after.quantity.to_string();
                        row.average_price = after.average_price.to_string();
                        diesel::update(assets::table.find(&row.id))
                            .set((
                                assets::quantity.eq(&row.quantity),
                                assets::average_price.eq(&row.average_price),
                            ))
                            .execute(conn)
                            .into_core()?;
                        row
                    }
                    None => {
                        let row = AssetDB::open(&portfolio_id, &buy.symbol, &after, now);
                        diesel::insert_into(assets::table)
                            .values(&row)
                            .execute(conn)
                            .into_core()?;
                        row
                    }
                };

                diesel::insert_into(asset_transactions::table)
                    .values(&AssetTransactionDB::buy(&row.id, buy.quantity, buy.price, now))
                    .execute(conn)
                    .into_core()?;

                debug!(
                    "Recorded buy of {} {} at {} in portfolio {}",
                    buy.quantity, buy.symbol, buy.price, portfolio_id
                );
                Ok(row.into_domain(owner_id)?)
            })
            .await
    }

    async fn rename_symbol(&self, asset_id: &str, symbol: &str) -> Result<Asset> {
        let asset_id = asset_id.to_string();
        let symbol = symbol.to_string();
        self.writer
            .exec(move |conn| {
                let mut asset = find_asset(conn, &asset_id)?;
                diesel::update(assets::table.find(&asset_id))
                    .set(assets::symbol.eq(&symbol))
                    .execute(conn)
                    .map_err(|e| conflict_on_unique(e, || symbol_taken(&symbol)))?;
                asset.symbol = symbol;
                Ok(asset)
            })
            .await
    }

    fn get_by_id(&self, asset_id: &str) -> Result<Asset> {
        let mut conn = get_connection(&self.pool)?;
        find_asset(&mut conn, asset_id)
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Asset>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = assets::table
            .inner_join(portfolios::table)
            .filter(assets::portfolio_id.eq(portfolio_id))
            .select((AssetDB::as_select(), portfolios::owner_id))
            .order(assets::symbol.asc())
            .load::<(AssetDB, String)>(&mut conn)
            .into_core()?;
        into_assets(rows)
    }

    fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Asset>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = assets::table
            .inner_join(portfolios::table)
            .filter(portfolios::owner_id.eq(owner_id))
            .select((AssetDB::as_select(), portfolios::owner_id))
            .order((portfolios::created_at.asc(), assets::symbol.asc()))
            .load::<(AssetDB, String)>(&mut conn)
            .into_core()?;
        into_assets(rows)
    }

    fn list_transactions(&self, asset_id: &str) -> Result<Vec<AssetTransaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = asset_transactions::table
            .filter(asset_transactions::asset_id.eq(asset_id))
            .select(AssetTransactionDB::as_select())
            .order((
                asset_transactions::created_at.asc(),
                asset_transactions::id.asc(),
            ))
            .load::<AssetTransactionDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| AssetTransaction::try_from(row).map_err(Error::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use crate::portfolios::PortfolioRepository;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use stockfolio_core::portfolios::{NewPortfolio, PortfolioRepositoryTrait};
    use tempfile::tempdir;

    struct Fixture {
        assets: Arc<AssetRepository>,
        portfolios: PortfolioRepository,
        _dir: tempfile::TempDir,
    }

    async fn setup() -> Fixture {
        let dir = tempdir().expect("Failed to create temp directory");
        let db_path = dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        Fixture {
            assets: Arc::new(AssetRepository::new(pool.clone(), writer.clone())),
            portfolios: PortfolioRepository::new(pool, writer),
            _dir: dir,
        }
    }

    async fn portfolio(fixture: &Fixture, owner: &str, name: &str) -> String {
        fixture
            .portfolios
            .create(
                owner,
                NewPortfolio {
                    id: None,
                    name: name.to_string(),
                    base_currency: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_buys_merge_into_one_position() {
        let fixture = setup().await;
        let p1 = portfolio(&fixture, "alice", "Main").await;

        let first = fixture
            .assets
            .apply_buy(&p1, NewBuy::new("AAPL", dec!(10), dec!(100)))
            .await
            .unwrap();
        let second = fixture
            .assets
            .apply_buy(&p1, NewBuy::new("AAPL", dec!(5), dec!(120)))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.owner_id, "alice");
        assert_eq!(second.quantity, dec!(15));
        assert_eq!(second.average_price, dec!(106.6667));

        let ledger = fixture.assets.list_transactions(&second.id).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[0].price, dec!(100));
        assert_eq!(ledger[1].price, dec!(120));

        let reloaded = fixture.assets.get_by_id(&second.id).unwrap();
        assert_eq!(reloaded.quantity, second.quantity);
        assert_eq!(reloaded.average_price, second.average_price);
    }

    #[tokio::test]
    async fn test_same_symbol_in_two_portfolios_stays_separate() {
        let fixture = setup().await;
        let p1 = portfolio(&fixture, "alice", "One").await;
        let p2 = portfolio(&fixture, "alice", "Two").await;

        fixture
            .assets
            .apply_buy(&p1, NewBuy::new("MSFT", dec!(1), dec!(300)))
            .await
            .unwrap();
        fixture
            .assets
            .apply_buy(&p2, NewBuy::new("MSFT", dec!(3), dec!(310)))
            .await
            .unwrap();

        let in_p1 = fixture.assets.list_by_portfolio(&p1).unwrap();
        assert_eq!(in_p1.len(), 1);
        assert_eq!(in_p1[0].quantity, dec!(1));
        assert_eq!(fixture.assets.list_by_owner("alice").unwrap().len(), 2);
        assert!(fixture.assets.list_by_owner("bob").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_buy_into_missing_portfolio_writes_nothing() {
        let fixture = setup().await;
        let err = fixture
            .assets
            .apply_buy("missing", NewBuy::new("AAPL", dec!(1), dec!(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(fixture.assets.list_by_owner("alice").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_overflowing_buy_is_rejected_and_writer_keeps_running() {
        let fixture = setup().await;
        let p1 = portfolio(&fixture, "alice", "Main").await;
        let big = dec!(1000000000000000);

        let opened = fixture
            .assets
            .apply_buy(&p1, NewBuy::new("BIG", big, big))
            .await
            .unwrap();
        let err = fixture
            .assets
            .apply_buy(&p1, NewBuy::new("BIG", big, big))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(stockfolio_core::errors::ValidationError::OutOfRange(_))
        ));

        let reloaded = fixture.assets.get_by_id(&opened.id).unwrap();
        assert_eq!(reloaded.quantity, big);
        assert_eq!(fixture.assets.list_transactions(&opened.id).unwrap().len(), 1);

        let aapl = fixture
            .assets
            .apply_buy(&p1, NewBuy::new("AAPL", dec!(1), dec!(1)))
            .await
            .unwrap();
        assert_eq!(aapl.quantity, dec!(1));
    }

    #[tokio::test]
    async fn test_rename_to_held_symbol_conflicts() {
        let fixture = setup().await;
        let p1 = portfolio(&fixture, "alice", "Main").await;
        let aapl = fixture
            .assets
            .apply_buy(&p1, NewBuy::new("AAPL", dec!(1), dec!(100)))
            .await
            .unwrap();
        fixture
            .assets
            .apply_buy(&p1, NewBuy::new("MSFT", dec!(1), dec!(300)))
            .await
            .unwrap();

        let err = fixture
            .assets
            .rename_symbol(&aapl.id, "MSFT")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(fixture.assets.get_by_id(&aapl.id).unwrap().symbol, "AAPL");

        let renamed = fixture
            .assets
            .rename_symbol(&aapl.id, "AAPL.US")
            .await
            .unwrap();
        assert_eq!(renamed.symbol, "AAPL.US");
        assert_eq!(renamed.quantity, dec!(1));
    }

    #[tokio::test]
    async fn test_deleting_portfolio_cascades_to_assets_and_ledger() {
        let fixture = setup().await;
        let p1 = portfolio(&fixture, "alice", "Main").await;
        let asset = fixture
            .assets
            .apply_buy(&p1, NewBuy::new("AAPL", dec!(1), dec!(100)))
            .await
            .unwrap();

        fixture.portfolios.delete(&p1).await.unwrap();

        assert!(matches!(
            fixture.assets.get_by_id(&asset.id).unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(fixture.assets.list_transactions(&asset.id).unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_buys_are_not_lost() {
        let fixture = setup().await;
        let p1 = portfolio(&fixture, "alice", "Main").await;
        let buys = 25;

        let tasks: Vec<_> = (0..buys)
            .map(|_| {
                let repo = Arc::clone(&fixture.assets);
                let portfolio_id = p1.clone();
                tokio::spawn(async move {
                    repo.apply_buy(&portfolio_id, NewBuy::new("NVDA", dec!(2), dec!(50)))
                        .await
                })
            })
            .collect();
        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }

        let held = fixture.assets.list_by_portfolio(&p1).unwrap();
        assert_eq!(held.len(), 1);
        assert_eq!(held[0].quantity, Decimal::from(buys * 2));
        assert_eq!(held[0].average_price, dec!(50));
        assert_eq!(
            fixture.assets.list_transactions(&held[0].id).unwrap().len(),
            buys as usize
        );
    }
}
