//! Data storage layer
//!
//! Provides the SQLite transactional store and shared data types:
//! - `sqlite` - embedded database service, schema, and repositories
//! - `types` - row types, asset breakdowns, role/permission enums

pub mod sqlite;
pub mod types;

pub use sqlite::{SqliteError, SqliteService};
