//! Storage layer.
//!
//! - [`Database`]: the shared SQLite handle and its unit of work
//! - [`AssetRepository`]: persistence interface per asset kind
//! - [`SqliteAssetRepository`]: the SQLite implementation

mod bind;
mod database;
mod row;
mod schema;
mod sqlite;
mod traits;

pub use bind::expand_in_placeholders;
pub use database::Database;
pub use schema::SCHEMA_VERSION;
pub use sqlite::{SqlAsset, SqliteAssetRepository};
pub use traits::AssetRepository;

/// Text form used for every persisted timestamp.
pub fn format_timestamp(value: &chrono::DateTime<chrono::Utc>) -> String {
    row::format_timestamp(value)
}
