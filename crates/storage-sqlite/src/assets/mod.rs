//! SQLite storage implementation for assets and their buy ledger.

mod model;
mod repository;

pub use model::{AssetDB, AssetTransactionDB};
pub use repository::AssetRepository;
