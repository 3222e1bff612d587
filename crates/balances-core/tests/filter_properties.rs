//! Property tests for the filter compiler.
//!
//! Properties:
//! - every `?` in the compiled SQL has exactly one argument, in order
//! - `Clause::args` walks the tree in the same order as `Clause::compile`
//! - inlining the arguments in that order yields the query rendered by hand
//!   from the tree
//! - a filter carries the soft-delete guard exactly once, however many
//!   clauses were added

use balances_core::filter::{Clause, Field, Filter, Literal, Operand, Operator};
use proptest::prelude::*;

fn arb_field() -> impl Strategy<Value = Field> {
    prop_oneof![
        Just(Field::new("t.name")),
        Just(Field::new("t.status")),
        Just(Field::new("t.amount")),
        Just(Field::new("t.date")),
    ]
}

fn arb_comparison() -> impl Strategy<Value = Operator> {
    prop_oneof![
        Just(Operator::Equal),
        Just(Operator::NotEqual),
        Just(Operator::LessThan),
        Just(Operator::LessThanEqual),
        Just(Operator::GreaterThan),
        Just(Operator::GreaterThanEqual),
        Just(Operator::Like),
    ]
}

fn arb_scalar() -> impl Strategy<Value = Literal> {
    prop_oneof![
        any::<i64>().prop_map(Literal::Int),
        "[a-z?%]{0,8}".prop_map(Literal::Text),
        any::<bool>().prop_map(Literal::Bool),
    ]
}

fn arb_connective() -> impl Strategy<Value = Operator> {
    prop_oneof![Just(Operator::And), Just(Operator::Or)]
}

fn arb_leaf() -> impl Strategy<Value = Clause> {
    prop_oneof![
        (arb_field(), arb_comparison(), arb_scalar())
            .prop_map(|(field, op, value)| Clause::compare(field, op, value)),
        (arb_field(), prop::collection::vec(arb_scalar(), 0..4))
            .prop_map(|(field, items)| Clause::compare(field, Operator::In, items)),
        (arb_field(), arb_comparison(), arb_field())
            .prop_map(|(left, op, right)| Clause::new(left, op, right)),
    ]
}

/// Clause trees up to four levels deep, mixing every operand shape the
/// compiler accepts.
fn arb_clause() -> impl Strategy<Value = Clause> {
    arb_leaf().prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), arb_connective(), inner.clone())
                .prop_map(|(left, op, right)| Clause::combine(left, op, right)),
            (arb_field(), arb_connective(), inner.clone())
                .prop_map(|(field, op, clause)| Clause::new(field, op, clause)),
            (inner, arb_connective(), arb_field())
                .prop_map(|(clause, op, field)| Clause::new(clause, op, field)),
        ]
    })
}

fn inline(literal: &Literal) -> String {
    match literal {
        Literal::Int(n) => n.to_string(),
        Literal::Text(text) => format!("'{}'", text),
        Literal::Bool(flag) => flag.to_string().to_uppercase(),
        Literal::List(items) => items.iter().map(inline).collect::<Vec<_>>().join(", "),
        other => format!("{:?}", other),
    }
}

/// The query a reader would write for the tree, literals in place.
fn render(clause: &Clause) -> String {
    let side = |operand: &Operand| match operand {
        Operand::Field(field) => field.to_string(),
        Operand::Clause(nested) => render(nested),
        Operand::Literal(value) if clause.operator == Operator::In => {
            format!("({})", inline(value))
        }
        Operand::Literal(value) => inline(value),
    };
    format!(
        "({} {} {})",
        side(&clause.left),
        clause.operator.as_sql(),
        side(&clause.right)
    )
}

/// Replace each placeholder with the next argument.
fn substitute(sql: &str, args: &[Literal]) -> String {
    let mut args = args.iter();
    let mut out = String::with_capacity(sql.len());
    for ch in sql.chars() {
        match ch {
            '?' => out.push_str(&inline(args.next().expect("argument for placeholder"))),
            other => out.push(other),
        }
    }
    assert!(args.next().is_none(), "argument without placeholder");
    out
}

fn placeholders(sql: &str) -> usize {
    sql.matches('?').count()
}

proptest! {
    #[test]
    fn prop_placeholders_match_args(clause in arb_clause()) {
        let compiled = clause.compile().unwrap();
        prop_assert_eq!(placeholders(&compiled.sql), compiled.args.len());
        prop_assert_eq!(compiled.args, clause.args());
    }

    #[test]
    fn prop_substituted_args_rebuild_the_query(clause in arb_clause()) {
        let compiled = clause.compile().unwrap();
        prop_assert_eq!(substitute(&compiled.sql, &clause.args()), render(&clause));
    }

    #[test]
    fn prop_deleted_guard_appears_once(
        clauses in prop::collection::vec(arb_clause(), 0..4),
        disjoin in any::<bool>(),
    ) {
        let op = if disjoin { Operator::Or } else { Operator::And };
        let mut filter = Filter::new("t");
        for clause in clauses {
            filter.add_clause(clause, op);
        }
        let compiled = filter.compile().unwrap();
        prop_assert_eq!(compiled.predicate().matches("t.deleted IS NULL").count(), 1);
        prop_assert_eq!(placeholders(compiled.predicate()), compiled.args().len());
        prop_assert!(compiled.predicate().ends_with(" AND t.deleted IS NULL")
            || compiled.predicate() == " WHERE t.deleted IS NULL");
    }

    #[test]
    fn prop_include_deleted_drops_guard(clause in arb_clause()) {
        let compiled = Filter::new("t")
            .with_clause(clause, Operator::And)
            .include_deleted(true)
            .compile()
            .unwrap();
        prop_assert!(!compiled.predicate().contains("deleted IS NULL"));
    }
}
