//! Query filters.
//!
//! A [`Filter`] pairs an optional [`Clause`] tree with the table it targets,
//! the soft-delete policy, ordering and a [`Pagination`]. Compiling it yields
//! a [`CompiledFilter`] holding the `WHERE` predicate with its positional
//! arguments, from which both the paged select and the unpaged count query
//! are assembled.

mod clause;
mod input;
mod pagination;

pub use clause::{Clause, CompiledClause, Field, Literal, Operand, Operator};
pub use input::{keyword_clause, BaseFilterInput};
pub use pagination::{PageInfo, Pagination, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

use crate::error::Result;

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Filter over one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub table_name: &'static str,
    pub deleted_column: &'static str,
    pub clause: Option<Clause>,
    pub include_deleted: bool,
    pub pagination: Pagination,
    pub order_by: Vec<(Field, SortDirection)>,
}

impl Filter {
    pub fn new(table_name: &'static str) -> Self {
        Self {
            table_name,
            deleted_column: "deleted",
            clause: None,
            include_deleted: false,
            pagination: Pagination::default(),
            order_by: Vec::new(),
        }
    }

    pub fn include_deleted(mut self, include_deleted: bool) -> Self {
        self.include_deleted = include_deleted;
        self
    }

    pub fn paginate(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn order_by(mut self, field: Field, direction: SortDirection) -> Self {
        self.order_by.push((field, direction));
        self
    }

    pub fn with_clause(mut self, clause: Clause, operator: Operator) -> Self {
        self.add_clause(clause, operator);
        self
    }

    /// Conjoin (or disjoin) `clause` onto the existing tree: `(existing <op> clause)`.
    pub fn add_clause(&mut self, clause: Clause, operator: Operator) {
        self.clause = Some(match self.clause.take() {
            Some(existing) => Clause::combine(existing, operator, clause),
            None => clause,
        });
    }

    pub fn deleted_field(&self) -> String {
        format!("{}.{}", self.table_name, self.deleted_column)
    }

    pub fn compile(&self) -> Result<CompiledFilter> {
        let deleted_is_null = format!("{} IS NULL", self.deleted_field());
        let (predicate, args) = match (&self.clause, self.include_deleted) {
            (Some(clause), include_deleted) => {
                let CompiledClause { sql, args } = clause.compile()?;
                if include_deleted {
                    (format!(" WHERE {}", sql), args)
                } else {
                    (format!(" WHERE {} AND {}", sql, deleted_is_null), args)
                }
            }
            (None, false) => (format!(" WHERE {}", deleted_is_null), Vec::new()),
            (None, true) => (String::new(), Vec::new()),
        };

        let order = if self.order_by.is_empty() {
            String::new()
        } else {
            let terms: Vec<String> = self
                .order_by
                .iter()
                .map(|(field, direction)| format!("{} {}", field, direction.as_sql()))
                .collect();
            format!(" ORDER BY {}", terms.join(", "))
        };

        Ok(CompiledFilter {
            predicate,
            args,
            order,
            pagination: self.pagination,
        })
    }
}

/// The rendered pieces of a [`Filter`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    predicate: String,
    args: Vec<Literal>,
    order: String,
    pagination: Pagination,
}

impl CompiledFilter {
    /// `" WHERE ..."`, or empty when nothing restricts the rows.
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    pub fn args(&self) -> &[Literal] {
        &self.args
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Predicate, ordering and `LIMIT ? OFFSET ?`.
    pub fn paged_sql(&self) -> String {
        format!("{}{} LIMIT ? OFFSET ?", self.predicate, self.order)
    }

    /// Predicate arguments followed by limit and offset.
    pub fn paged_args(&self) -> Vec<Literal> {
        let mut args = self.args.clone();
        args.push(Literal::from(self.pagination.limit()));
        args.push(Literal::from(self.pagination.offset()));
        args
    }
}
