//! Shared filter input fields and the keyword search builder.

use serde::{Deserialize, Serialize};

use super::{Clause, Field, Operator, Pagination, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::error::Result;

/// Fields common to every list query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseFilterInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default)]
    pub include_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl BaseFilterInput {
    pub fn pagination(&self) -> Result<Pagination> {
        Pagination::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    /// Keyword search over `fields`, if a non-blank keyword was given.
    pub fn keyword_clause(&self, fields: &[Field]) -> Option<Clause> {
        let keyword = self.keyword.as_deref().map(str::trim)?;
        if keyword.is_empty() {
            return None;
        }
        keyword_clause(fields, keyword, false)
    }
}

/// Left-deep OR over `fields`: `fi LIKE %keyword%`, or `fi = keyword` when
/// `exact`. `None` when there are no fields.
pub fn keyword_clause(fields: &[Field], keyword: &str, exact: bool) -> Option<Clause> {
    let (operator, value) = if exact {
        (Operator::Equal, keyword.to_string())
    } else {
        (Operator::Like, format!("%{}%", keyword))
    };

    fields
        .iter()
        .map(|field| Clause::compare(field.clone(), operator, value.clone()))
        .reduce(|acc, next| Clause::combine(acc, Operator::Or, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Literal;

    const FIELDS: [Field; 3] = [
        Field::new("properties.name"),
        Field::new("properties.address"),
        Field::new("properties.description"),
    ];

    #[test]
    fn test_keyword_builds_left_deep_or() {
        let clause = keyword_clause(&FIELDS, "villa", false).unwrap();
        let compiled = clause.compile().unwrap();
        assert_eq!(
            compiled.sql,
            "(((properties.name LIKE ?) OR (properties.address LIKE ?)) OR (properties.description LIKE ?))"
        );
        assert_eq!(compiled.args, vec![Literal::from("%villa%"); 3]);
    }

    #[test]
    fn test_exact_keyword() {
        let clause = keyword_clause(&FIELDS[..1], "villa", true).unwrap();
        let compiled = clause.compile().unwrap();
        assert_eq!(compiled.sql, "(properties.name = ?)");
        assert_eq!(compiled.args, vec![Literal::from("villa")]);
    }

    #[test]
    fn test_no_fields_no_clause() {
        assert!(keyword_clause(&[], "villa", false).is_none());
    }

    #[test]
    fn test_blank_keyword_is_ignored() {
        let input = BaseFilterInput {
            keyword: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(input.keyword_clause(&FIELDS).is_none());
    }

    #[test]
    fn test_pagination_defaults_and_validation() {
        let input = BaseFilterInput::default();
        assert_eq!(input.pagination().unwrap(), Pagination::default());

        let input = BaseFilterInput {
            page: Some(0),
            ..Default::default()
        };
        assert!(input.pagination().is_err());
    }
}
