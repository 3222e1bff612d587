//! # Balances Core
//!
//! Domain logic and storage for tracking the value history of personal
//! assets: bank accounts, properties and vehicles.
//!
//! ## Architecture
//!
//! - **model**: asset kinds, their inputs and value history items
//! - **filter**: clause trees compiled to parameterized SQL, pagination
//! - **history**: keeps each parent's snapshot equal to its newest live item
//! - **storage**: SQLite database, schema and the generic repository
//! - **service**: the operations exposed to callers

pub mod error;
pub mod filter;
pub mod history;
pub mod model;
pub mod service;
pub mod storage;

pub use error::{BalancesError, ErrorCode, Failure, Result};
pub use service::{AssetService, Services, ValueWindow};
pub use storage::{AssetRepository, Database};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
