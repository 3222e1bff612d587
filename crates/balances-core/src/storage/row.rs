//! Raw row types and column conversions.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::{BalancesError, Result};
use crate::filter::Literal;
use crate::model::{Audit, ValueEntry};

/// Audit columns in select/insert order, trailing every table's own columns.
pub(crate) const AUDIT_COLUMNS: [&str; 6] = [
    "created",
    "created_by",
    "updated",
    "updated_by",
    "deleted",
    "deleted_by",
];

/// Fixed-width RFC 3339 (microseconds, `Z`) so text order is time order.
pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|e| BalancesError::storage(format!("Invalid timestamp: {}", e)))
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| BalancesError::storage(format!("Invalid {} UUID: {}", column, e)))
}

fn parse_optional_timestamp(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value.as_deref().map(parse_timestamp).transpose()
}

fn parse_optional_uuid(value: Option<String>, column: &str) -> Result<Option<Uuid>> {
    value.as_deref().map(|v| parse_uuid(v, column)).transpose()
}

/// Raw audit columns, before parsing.
#[derive(Debug)]
pub(crate) struct AuditRow {
    pub created: String,
    pub created_by: String,
    pub updated: Option<String>,
    pub updated_by: Option<String>,
    pub deleted: Option<String>,
    pub deleted_by: Option<String>,
}

impl AuditRow {
    /// Read the six audit columns starting at `offset`.
    pub fn read(row: &rusqlite::Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            created: row.get(offset)?,
            created_by: row.get(offset + 1)?,
            updated: row.get(offset + 2)?,
            updated_by: row.get(offset + 3)?,
            deleted: row.get(offset + 4)?,
            deleted_by: row.get(offset + 5)?,
        })
    }
}

impl TryFrom<AuditRow> for Audit {
    type Error = BalancesError;

    fn try_from(row: AuditRow) -> Result<Self> {
        Ok(Audit {
            created: parse_timestamp(&row.created)?,
            created_by: parse_uuid(&row.created_by, "created_by")?,
            updated: parse_optional_timestamp(row.updated)?,
            updated_by: parse_optional_uuid(row.updated_by, "updated_by")?,
            deleted: parse_optional_timestamp(row.deleted)?,
            deleted_by: parse_optional_uuid(row.deleted_by, "deleted_by")?,
        })
    }
}

pub(crate) fn audit_params(audit: &Audit) -> [Literal; 6] {
    fn optional<T: Into<Literal>>(value: Option<T>) -> Literal {
        value.map(Into::into).unwrap_or(Literal::Null)
    }

    [
        Literal::Timestamp(audit.created),
        Literal::Uuid(audit.created_by),
        optional(audit.updated),
        optional(audit.updated_by),
        optional(audit.deleted),
        optional(audit.deleted_by),
    ]
}

/// Raw history row: `entity_id, parent, date, amount` then audit columns.
#[derive(Debug)]
pub(crate) struct ValueRow {
    pub id: String,
    pub parent_id: String,
    pub date: String,
    pub amount: f64,
    pub audit: AuditRow,
}

impl ValueRow {
    pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            date: row.get(2)?,
            amount: row.get(3)?,
            audit: AuditRow::read(row, 4)?,
        })
    }
}

impl TryFrom<ValueRow> for ValueEntry {
    type Error = BalancesError;

    fn try_from(row: ValueRow) -> Result<Self> {
        Ok(ValueEntry {
            id: parse_uuid(&row.id, "entity_id")?,
            parent_id: parse_uuid(&row.parent_id, "parent")?,
            date: parse_timestamp(&row.date)?,
            amount: row.amount,
            audit: row.audit.try_into()?,
        })
    }
}

pub(crate) fn value_params(value: &ValueEntry) -> Vec<Literal> {
    let mut params = vec![
        Literal::Uuid(value.parent_id),
        Literal::Timestamp(value.date),
        Literal::Float(value.amount),
    ];
    params.extend(audit_params(&value.audit));
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_timestamp_text_orders_chronologically() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let earlier = format_timestamp(&base);
        let later = format_timestamp(&(base + Duration::microseconds(1)));
        let much_later = format_timestamp(&(base + Duration::days(400)));
        assert_eq!(earlier, "2024-01-01T09:00:00.000000Z");
        assert!(earlier < later);
        assert!(later < much_later);
        assert_eq!(earlier.len(), much_later.len());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let value = Utc.with_ymd_and_hms(2023, 7, 4, 12, 30, 15).unwrap() + Duration::microseconds(42);
        assert_eq!(parse_timestamp(&format_timestamp(&value)).unwrap(), value);
    }

    #[test]
    fn test_bad_columns_are_internal_errors() {
        assert!(parse_timestamp("yesterday").is_err());
        let err = parse_uuid("nope", "created_by").unwrap_err();
        assert!(err.to_string().contains("Invalid created_by UUID"));
    }
}
