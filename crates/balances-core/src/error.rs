//! Error types for Balances core operations.
//!
//! Every error maps to a stable [`ErrorCode`]. Errors raised by repositories
//! and services carry the operation and entity they were raised for, so the
//! CLI layer can render them (or serialize them as a [`Failure`]) without
//! leaking raw driver strings beyond the message field.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Balances operations.
pub type Result<T> = std::result::Result<T, BalancesError>;

/// Stable failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    InternalError,
    Unimplemented,
    EntityNotFound,
    OperationNotPermitted,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BadRequest",
            ErrorCode::Unauthorized => "Unauthorized",
            ErrorCode::InternalError => "InternalError",
            ErrorCode::Unimplemented => "Unimplemented",
            ErrorCode::EntityNotFound => "EntityNotFound",
            ErrorCode::OperationNotPermitted => "OperationNotPermitted",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core error type for Balances operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BalancesError {
    /// Malformed input or filter
    #[error("{}", render(ErrorCode::BadRequest, None, None, .0))]
    BadRequest(String),

    /// Missing or invalid actor identity
    #[error("{}", render(ErrorCode::Unauthorized, None, None, .0))]
    Unauthorized(String),

    /// A resolve returned nothing (or the wrong number of rows)
    #[error("{}", render(ErrorCode::EntityNotFound, Some(.operation.as_str()), Some(.entity.as_str()), "Record not found."))]
    EntityNotFound { operation: String, entity: String },

    /// A business rule refused the operation
    #[error("{}", render(ErrorCode::OperationNotPermitted, Some(.operation.as_str()), Some(.entity.as_str()), .message))]
    OperationNotPermitted {
        operation: String,
        entity: String,
        message: String,
    },

    /// Compiler or driver failure
    #[error("{}", render(ErrorCode::InternalError, .operation.as_deref(), .entity.as_deref(), .message))]
    Internal {
        operation: Option<String>,
        entity: Option<String>,
        message: String,
    },

    /// Operation has no backing implementation
    #[error("{}", render(ErrorCode::Unimplemented, None, None, .0))]
    Unimplemented(String),
}

fn render(code: ErrorCode, operation: Option<&str>, entity: Option<&str>, message: &str) -> String {
    match (operation, entity) {
        (Some(op), Some(entity)) => format!("[{}] {} on {}: {}", code, op, entity, message),
        (Some(op), None) => format!("[{}] {}: {}", code, op, message),
        (None, Some(entity)) => format!("[{}] {}: {}", code, entity, message),
        (None, None) => format!("{}: {}", code, message),
    }
}

impl BalancesError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        BalancesError::BadRequest(message.into())
    }

    pub fn not_found(operation: &str, entity: &str) -> Self {
        BalancesError::EntityNotFound {
            operation: operation.to_string(),
            entity: entity.to_string(),
        }
    }

    pub fn not_permitted(operation: &str, entity: &str, message: impl Into<String>) -> Self {
        BalancesError::OperationNotPermitted {
            operation: operation.to_string(),
            entity: entity.to_string(),
            message: message.into(),
        }
    }

    /// Unlabelled internal failure, e.g. a malformed stored row.
    pub fn storage(message: impl Into<String>) -> Self {
        BalancesError::Internal {
            operation: None,
            entity: None,
            message: message.into(),
        }
    }

    /// Wrap a lower-level failure as an internal error labelled with the
    /// operation and entity it happened on. Already-classified errors pass
    /// through untouched.
    pub fn internal(operation: &str, entity: &str, err: impl Into<BalancesError>) -> Self {
        match err.into() {
            BalancesError::Internal { message, .. } => BalancesError::Internal {
                operation: Some(operation.to_string()),
                entity: Some(entity.to_string()),
                message,
            },
            other => other,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BalancesError::BadRequest(_) => ErrorCode::BadRequest,
            BalancesError::Unauthorized(_) => ErrorCode::Unauthorized,
            BalancesError::EntityNotFound { .. } => ErrorCode::EntityNotFound,
            BalancesError::OperationNotPermitted { .. } => ErrorCode::OperationNotPermitted,
            BalancesError::Internal { .. } => ErrorCode::InternalError,
            BalancesError::Unimplemented(_) => ErrorCode::Unimplemented,
        }
    }

    /// Structured form of this error, suitable for JSON output.
    pub fn to_failure(&self) -> Failure {
        let (operation, entity, message) = match self {
            BalancesError::BadRequest(message)
            | BalancesError::Unauthorized(message)
            | BalancesError::Unimplemented(message) => (None, None, message.clone()),
            BalancesError::EntityNotFound { operation, entity } => (
                Some(operation.clone()),
                Some(entity.clone()),
                "Record not found.".to_string(),
            ),
            BalancesError::OperationNotPermitted {
                operation,
                entity,
                message,
            } => (Some(operation.clone()), Some(entity.clone()), message.clone()),
            BalancesError::Internal {
                operation,
                entity,
                message,
            } => (operation.clone(), entity.clone(), message.clone()),
        };
        Failure {
            code: self.code(),
            operation,
            entity,
            message,
        }
    }
}

/// Serializable failure envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    pub message: String,
}

impl From<rusqlite::Error> for BalancesError {
    fn from(err: rusqlite::Error) -> Self {
        BalancesError::Internal {
            operation: None,
            entity: None,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_labels() {
        let err = BalancesError::not_permitted("delete", "Property Value", "already deleted");
        assert_eq!(
            err.to_string(),
            "[OperationNotPermitted] delete on Property Value: already deleted"
        );
        assert_eq!(err.code(), ErrorCode::OperationNotPermitted);
    }

    #[test]
    fn test_display_without_labels() {
        let err = BalancesError::bad_request("page must be at least 1");
        assert_eq!(err.to_string(), "BadRequest: page must be at least 1");
    }

    #[test]
    fn test_internal_wraps_driver_error_with_labels() {
        let err = BalancesError::internal(
            "resolve by IDs",
            "Vehicle",
            rusqlite::Error::InvalidQuery,
        );
        match &err {
            BalancesError::Internal {
                operation, entity, ..
            } => {
                assert_eq!(operation.as_deref(), Some("resolve by IDs"));
                assert_eq!(entity.as_deref(), Some("Vehicle"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().starts_with("[InternalError] resolve by IDs on Vehicle: "));
    }

    #[test]
    fn test_internal_keeps_classified_errors() {
        let err = BalancesError::internal(
            "create",
            "Vehicle",
            BalancesError::not_found("create", "Vehicle"),
        );
        assert_eq!(err.code(), ErrorCode::EntityNotFound);
    }

    #[test]
    fn test_failure_serialization_skips_missing_labels() {
        let failure = BalancesError::Unimplemented("export".to_string()).to_failure();
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"code": "Unimplemented", "message": "export"})
        );
    }
}
