//! Binding filter literals to SQLite parameters.

use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};

use super::row::format_timestamp;
use crate::error::{BalancesError, Result};
use crate::filter::Literal;

impl ToSql for Literal {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Literal::Null => ToSqlOutput::Owned(Value::Null),
            Literal::Bool(value) => ToSqlOutput::Owned(Value::Integer(i64::from(*value))),
            Literal::Int(value) => ToSqlOutput::Owned(Value::Integer(*value)),
            Literal::Float(value) => ToSqlOutput::Owned(Value::Real(*value)),
            Literal::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
            Literal::Uuid(value) => ToSqlOutput::Owned(Value::Text(value.to_string())),
            Literal::Timestamp(value) => ToSqlOutput::Owned(Value::Text(format_timestamp(value))),
            Literal::List(_) => {
                return Err(rusqlite::Error::ToSqlConversionFailure(
                    "list literal must be expanded before binding".into(),
                ))
            }
        })
    }
}

/// Rewrite each `?` bound to a list into one placeholder per element and
/// flatten the arguments to match. An empty list renders as `NULL`, so
/// `x IN (NULL)` matches no rows.
pub fn expand_in_placeholders(sql: &str, args: &[Literal]) -> Result<(String, Vec<Literal>)> {
    let mut expanded = String::with_capacity(sql.len());
    let mut flat = Vec::with_capacity(args.len());
    let mut remaining = args.iter();

    for ch in sql.chars() {
        if ch != '?' {
            expanded.push(ch);
            continue;
        }
        let arg = remaining.next().ok_or_else(|| {
            BalancesError::storage("more placeholders than arguments in query")
        })?;
        match arg {
            Literal::List(items) if items.is_empty() => expanded.push_str("NULL"),
            Literal::List(items) => {
                let placeholders = vec!["?"; items.len()].join(", ");
                expanded.push_str(&placeholders);
                flat.extend(items.iter().cloned());
            }
            other => {
                expanded.push('?');
                flat.push(other.clone());
            }
        }
    }

    if remaining.next().is_some() {
        return Err(BalancesError::storage(
            "more arguments than placeholders in query",
        ));
    }
    Ok((expanded, flat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_expands_list_and_keeps_scalars_in_order() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let (sql, args) = expand_in_placeholders(
            "WHERE (x IN (?)) AND (y = ?) LIMIT ? OFFSET ?",
            &[
                Literal::from(vec![a, b]),
                Literal::from("y"),
                Literal::Int(10),
                Literal::Int(0),
            ],
        )
        .unwrap();
        assert_eq!(sql, "WHERE (x IN (?, ?)) AND (y = ?) LIMIT ? OFFSET ?");
        assert_eq!(
            args,
            vec![
                Literal::Uuid(a),
                Literal::Uuid(b),
                Literal::from("y"),
                Literal::Int(10),
                Literal::Int(0)
            ]
        );
    }

    #[test]
    fn test_empty_list_becomes_null() {
        let (sql, args) =
            expand_in_placeholders("(x IN (?))", &[Literal::List(Vec::new())]).unwrap();
        assert_eq!(sql, "(x IN (NULL))");
        assert!(args.is_empty());
    }

    #[test]
    fn test_argument_count_mismatch() {
        assert!(expand_in_placeholders("? ?", &[Literal::Int(1)]).is_err());
        assert!(expand_in_placeholders("?", &[Literal::Int(1), Literal::Int(2)]).is_err());
    }

    #[test]
    fn test_empty_in_matches_nothing() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let (sql, args) = expand_in_placeholders(
            "SELECT COUNT(*) FROM (SELECT 1 AS x) WHERE x IN (?)",
            &[Literal::List(Vec::new())],
        )
        .unwrap();
        let count: i64 = conn
            .query_row(&sql, rusqlite::params_from_iter(args.iter()), |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_unexpanded_list_fails_to_bind() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let result: rusqlite::Result<i64> = conn.query_row(
            "SELECT ?",
            [Literal::List(vec![Literal::Int(1)])],
            |row| row.get(0),
        );
        assert!(result.is_err());
    }
}
