//! HTTP surface for Stockfolio: authentication, routing, and wiring of the
//! core services onto SQLite storage and a market quote provider.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod main_lib;
pub mod models;

pub use main_lib::{build_state, build_state_with_quote_source, init_tracing, AppState};
