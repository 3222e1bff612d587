//! Parsing helpers for datetimes, ids and stored enums.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use balances_core::model::DbEnum;
use balances_core::BalancesError;

/// Parse a datetime string (ISO-8601 or YYYY-MM-DD).
pub fn parse_datetime(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| BalancesError::bad_request(format!("Invalid date value: {}", value)))?;
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }

    Err(BalancesError::bad_request(format!(
        "Invalid date/time (expected ISO-8601 or YYYY-MM-DD): {}",
        value
    ))
    .into())
}

pub fn parse_optional_datetime(value: Option<&str>) -> anyhow::Result<Option<DateTime<Utc>>> {
    value.map(parse_datetime).transpose()
}

pub fn parse_uuid(value: &str, label: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(value.trim())
        .map_err(|e| BalancesError::bad_request(format!("Invalid {}: {}", label, e)).into())
}

pub fn parse_enum<E: DbEnum>(value: &str) -> anyhow::Result<E> {
    Ok(value.trim().parse::<E>()?)
}

/// Unwrap a flag that `create` cannot do without.
pub fn require<T: Clone>(value: &Option<T>, flag: &str) -> anyhow::Result<T> {
    value
        .clone()
        .ok_or_else(|| BalancesError::bad_request(format!("missing required flag --{}", flag)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use balances_core::model::PropertyStatus;
    use balances_core::ErrorCode;
    use chrono::TimeZone;

    fn code(err: anyhow::Error) -> ErrorCode {
        err.downcast_ref::<BalancesError>().map(|e| e.code()).unwrap()
    }

    #[test]
    fn test_parse_datetime_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_datetime("2024-03-01").unwrap(), expected);
        assert_eq!(parse_datetime("2024-03-01T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_datetime("2024-03-01T02:00:00+02:00").unwrap(), expected);
        assert_eq!(code(parse_datetime("March 1st").unwrap_err()), ErrorCode::BadRequest);
    }

    #[test]
    fn test_parse_enum_and_require() {
        let status: PropertyStatus = parse_enum(" Rented ").unwrap();
        assert_eq!(status, PropertyStatus::Rented);
        assert_eq!(code(parse_enum::<PropertyStatus>("lost").unwrap_err()), ErrorCode::BadRequest);

        assert_eq!(require(&Some(3), "page").unwrap(), 3);
        let err = require::<u32>(&None, "page").unwrap_err();
        assert!(err.to_string().contains("--page"));
    }

    #[test]
    fn test_parse_uuid_rejects_garbage() {
        assert_eq!(code(parse_uuid("nope", "asset ID").unwrap_err()), ErrorCode::BadRequest);
        let id = Uuid::now_v7();
        assert_eq!(parse_uuid(&id.to_string(), "asset ID").unwrap(), id);
    }
}
