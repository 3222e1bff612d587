//! Constants used throughout the CLI.

use balances_core::ErrorCode;

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Asset, value or config not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// No actor configured.
    pub const AUTH_FAILED: i32 = 5;

    /// The write is refused by the current state of the data.
    pub const NOT_PERMITTED: i32 = 6;

    pub const UNIMPLEMENTED: i32 = 7;

    pub const GENERAL: i32 = 1;
}

pub fn exit_code(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::BadRequest => exit_codes::INVALID_INPUT,
        ErrorCode::Unauthorized => exit_codes::AUTH_FAILED,
        ErrorCode::EntityNotFound => exit_codes::NOT_FOUND,
        ErrorCode::OperationNotPermitted => exit_codes::NOT_PERMITTED,
        ErrorCode::Unimplemented => exit_codes::UNIMPLEMENTED,
        ErrorCode::InternalError => exit_codes::GENERAL,
    }
}

/// Rows per page when neither the flag nor the config sets one.
pub const DEFAULT_LIST_PAGE_SIZE: u32 = 20;

/// History items attached by `show --values` without `--limit`.
pub const DEFAULT_SHOWN_VALUES: u32 = 10;
