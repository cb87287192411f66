//! SQLite storage implementation for Stockfolio.
//!
//! This crate holds everything that touches Diesel: the connection pool,
//! embedded migrations, the single-writer actor, and the repositories that
//! implement the traits defined in `stockfolio-core`.
//!
//! ```text
//! core (domain, traits)
//!         │
//!         ▼
//! storage-sqlite (this crate)
//!         │
//!         ▼
//!     SQLite DB
//! ```
//!
//! Reads use pooled connections. Writes are funnelled through one actor that
//! wraps each job in `BEGIN IMMEDIATE`, so a position's read-merge-write can
//! never interleave with another buy.

pub mod db;
pub mod errors;
pub mod schema;

pub mod assets;
pub mod portfolios;

pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use stockfolio_core::errors::{DatabaseError, Error, Result};
