//! Input and parsing helper functions for the CLI.
//!
//! This module provides utilities for:
//! - Datetime, id and enum parsing (`parsing`)
//! - Confirmation prompts (`input`)

mod input;
mod parsing;

// Re-export public API
pub use input::confirm;
pub use parsing::{parse_datetime, parse_enum, parse_optional_datetime, parse_uuid, require};
