//! offerdocs library entrypoint.
//!
//! Modules:
//! - `app`: startup, configuration, shared state
//! - `http`: Axum router and handlers
//! - `db`: migrations and SQLite queries
//! - `storage`: blob store trait and filesystem backend
//! - `models`: typed records used across layers
//! - `error`: API error kinds and their JSON rendering
//! - `util`: tracing setup, hashing and input checks

pub mod app;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod storage;
pub mod util;
