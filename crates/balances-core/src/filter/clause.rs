//! Boolean expression trees and their SQL rendering.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{BalancesError, Result};

/// A fully qualified column reference, e.g. `properties.name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field(Cow<'static, str>);

impl Field {
    pub const fn new(name: &'static str) -> Self {
        Field(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field(Cow::Owned(name))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A literal bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    /// Only valid opposite `IN`; expanded to one placeholder per element
    /// before execution.
    List(Vec<Literal>),
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<u64> for Literal {
    fn from(value: u64) -> Self {
        Literal::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Text(value)
    }
}

impl From<Uuid> for Literal {
    fn from(value: Uuid) -> Self {
        Literal::Uuid(value)
    }
}

impl From<DateTime<Utc>> for Literal {
    fn from(value: DateTime<Utc>) -> Self {
        Literal::Timestamp(value)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(values: Vec<T>) -> Self {
        Literal::List(values.into_iter().map(Into::into).collect())
    }
}

/// Comparison and boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equal,
    NotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    And,
    Or,
    Like,
    In,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::LessThan => "<",
            Operator::LessThanEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanEqual => ">=",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Like => "LIKE",
            Operator::In => "IN",
        }
    }
}

/// One side of a [`Clause`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Field(Field),
    Clause(Box<Clause>),
    Literal(Literal),
}

impl Operand {
    fn kind(&self) -> &'static str {
        match self {
            Operand::Field(_) => "field",
            Operand::Clause(_) => "clause",
            Operand::Literal(_) => "value",
        }
    }
}

impl From<Field> for Operand {
    fn from(field: Field) -> Self {
        Operand::Field(field)
    }
}

impl From<Clause> for Operand {
    fn from(clause: Clause) -> Self {
        Operand::Clause(Box::new(clause))
    }
}

impl From<Literal> for Operand {
    fn from(literal: Literal) -> Self {
        Operand::Literal(literal)
    }
}

/// SQL text with its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledClause {
    pub sql: String,
    pub args: Vec<Literal>,
}

/// A node of a boolean filter expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub left: Operand,
    pub operator: Operator,
    pub right: Operand,
}

impl Clause {
    pub fn new(left: impl Into<Operand>, operator: Operator, right: impl Into<Operand>) -> Self {
        Self {
            left: left.into(),
            operator,
            right: right.into(),
        }
    }

    /// `(field <op> ?)` leaf.
    pub fn compare(field: Field, operator: Operator, value: impl Into<Literal>) -> Self {
        Self::new(field, operator, value.into())
    }

    /// `(left <op> right)` over two sub-clauses.
    pub fn combine(left: Clause, operator: Operator, right: Clause) -> Self {
        Self::new(left, operator, right)
    }

    /// Render the clause, collecting arguments in placeholder order.
    pub fn compile(&self) -> Result<CompiledClause> {
        let mut sql = String::new();
        let mut args = Vec::new();
        self.write_to(&mut sql, &mut args)?;
        Ok(CompiledClause { sql, args })
    }

    /// Arguments in placeholder order, without rendering.
    ///
    /// Walks operands left before right, skips fields and recurses into
    /// nested clauses, the same order [`Clause::compile`] binds them in.
    pub fn args(&self) -> Vec<Literal> {
        let mut args = Vec::new();
        self.collect_args(&mut args);
        args
    }

    fn collect_args(&self, args: &mut Vec<Literal>) {
        for operand in [&self.left, &self.right] {
            match operand {
                Operand::Field(_) => {}
                Operand::Clause(clause) => clause.collect_args(args),
                Operand::Literal(value) => args.push(value.clone()),
            }
        }
    }

    fn write_to(&self, sql: &mut String, args: &mut Vec<Literal>) -> Result<()> {
        match (&self.left, &self.right) {
            (Operand::Literal(_), right) => return Err(unsupported("value", right.kind())),
            (Operand::Clause(_), Operand::Literal(_)) => {
                return Err(unsupported("clause", "value"))
            }
            (Operand::Field(_), Operand::Literal(Literal::List(_)))
                if self.operator != Operator::In =>
            {
                return Err(BalancesError::bad_request(format!(
                    "list value requires the IN operator, got {}",
                    self.operator.as_sql()
                )));
            }
            _ => {}
        }

        sql.push('(');
        match &self.left {
            Operand::Field(field) => sql.push_str(field.as_str()),
            Operand::Clause(clause) => clause.write_to(sql, args)?,
            Operand::Literal(_) => return Err(unsupported("value", self.right.kind())),
        }
        sql.push(' ');
        sql.push_str(self.operator.as_sql());
        sql.push(' ');
        match &self.right {
            Operand::Field(field) => sql.push_str(field.as_str()),
            Operand::Clause(clause) => clause.write_to(sql, args)?,
            Operand::Literal(value) => {
                if self.operator == Operator::In {
                    sql.push_str("(?)");
                } else {
                    sql.push('?');
                }
                args.push(value.clone());
            }
        }
        sql.push(')');
        Ok(())
    }
}

fn unsupported(left: &str, right: &str) -> BalancesError {
    BalancesError::bad_request(format!(
        "unsupported filter param combination: {} vs {}",
        left, right
    ))
}
