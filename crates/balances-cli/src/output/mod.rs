//! Output formatting helpers for the CLI.
//!
//! Every command prints either a table (text) or a JSON document (`--json`).

mod json;
mod text;

// Re-export public API
pub use json::{failure_json, list_json, print_json};
pub use text::{print_asset, print_asset_list, print_value, print_value_list, AssetView};
