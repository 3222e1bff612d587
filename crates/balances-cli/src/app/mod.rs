//! Application-level utilities for the Balances CLI.
//!
//! This module provides:
//! - Path resolution for the config and database files
//! - The lazily-initialized command context

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
pub use resolver::resolve_config_path;
