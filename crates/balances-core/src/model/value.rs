//! Dated value history items and their filters.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{BalancesError, Result};
use crate::filter::{BaseFilterInput, Clause, Field, Filter, Operator, SortDirection};
use crate::model::Audit;

/// The denormalized "latest value" carried on a parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub amount: f64,
    pub date: DateTime<Utc>,
}

/// Where a kind's history items live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueTable {
    pub table: &'static str,
    pub parent_column: &'static str,
    pub amount_column: &'static str,
}

impl ValueTable {
    pub fn field(&self, column: &str) -> Field {
        Field::from(format!("{}.{}", self.table, column))
    }

    /// Sort terms putting the current item first. Mirrors [`ValueEntry::recency`].
    pub fn recency_order(&self) -> [(Field, SortDirection); 3] {
        [
            (self.field("date"), SortDirection::Desc),
            (
                Field::from(format!(
                    "COALESCE({table}.updated, {table}.created)",
                    table = self.table
                )),
                SortDirection::Asc,
            ),
            (self.field("entity_id"), SortDirection::Asc),
        ]
    }

    /// `recency_order` as an `ORDER BY` list.
    pub fn recency_sql(&self) -> String {
        self.recency_order()
            .iter()
            .map(|(field, direction)| format!("{} {}", field, direction.as_sql()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One dated value of a parent: a balance, a property valuation or a
/// vehicle valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueEntry {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub date: DateTime<Utc>,
    pub amount: f64,
    #[serde(flatten)]
    pub audit: Audit,
}

impl ValueEntry {
    pub fn new(parent_id: Uuid, input: &ValueInput, actor: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: input.id.unwrap_or_else(Uuid::now_v7),
            parent_id,
            date: input.date,
            amount: input.amount,
            audit: Audit::new(actor, now),
        }
    }

    pub fn apply(&mut self, input: &ValueInput, actor: Uuid, now: DateTime<Utc>) {
        self.date = input.date;
        self.amount = input.amount;
        self.audit.touch(actor, now);
    }

    pub fn mark_deleted(&mut self, entity: &str, actor: Uuid, now: DateTime<Utc>) -> Result<()> {
        if self.is_deleted() {
            return Err(BalancesError::not_permitted("delete", entity, "already deleted"));
        }
        self.audit.mark_deleted(actor, now);
        Ok(())
    }

    pub fn is_deleted(&self) -> bool {
        self.audit.is_deleted()
    }

    /// When the date was last set. Kept at the stored precision.
    fn dated_at(&self) -> i64 {
        self.audit
            .updated
            .unwrap_or(self.audit.created)
            .timestamp_micros()
    }

    /// `Greater` when `self` ranks above `other` in its parent's history.
    ///
    /// The later date wins. On a date tie the item whose date was set first
    /// stays ahead, then the lower id.
    pub fn recency(&self, other: &ValueEntry) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| other.dated_at().cmp(&self.dated_at()))
            .then_with(|| other.id.cmp(&self.id))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            amount: self.amount,
            date: self.date,
        }
    }
}

/// Fields accepted when adding or editing a history item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub date: DateTime<Utc>,
    pub amount: f64,
}

impl ValueInput {
    pub fn new(date: DateTime<Utc>, amount: f64) -> Self {
        Self {
            id: None,
            date,
            amount,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() {
            return Err(BalancesError::bad_request("amount must be a finite number"));
        }
        Ok(())
    }
}

/// List query over history items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueFilterInput {
    #[serde(flatten)]
    pub base: BaseFilterInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_ids: Option<Vec<Uuid>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_max: Option<f64>,
}

impl ValueFilterInput {
    pub fn for_parent(parent_id: Uuid) -> Self {
        Self {
            parent_ids: Some(vec![parent_id]),
            ..Default::default()
        }
    }

    /// Newest first. An empty `parent_ids` list does not restrict the parents.
    pub fn to_filter(&self, values: &ValueTable) -> Result<Filter> {
        let mut filter = Filter::new(values.table)
            .include_deleted(self.base.include_deleted)
            .paginate(self.base.pagination()?);
        for (field, direction) in values.recency_order() {
            filter = filter.order_by(field, direction);
        }

        if let Some(parent_ids) = self.parent_ids.as_ref().filter(|ids| !ids.is_empty()) {
            filter.add_clause(
                Clause::compare(
                    values.field(values.parent_column),
                    Operator::In,
                    parent_ids.clone(),
                ),
                Operator::And,
            );
        }
        if let Some(start) = self.start_date {
            filter.add_clause(
                Clause::compare(values.field("date"), Operator::GreaterThanEqual, start),
                Operator::And,
            );
        }
        if let Some(end) = self.end_date {
            filter.add_clause(
                Clause::compare(values.field("date"), Operator::LessThanEqual, end),
                Operator::And,
            );
        }
        if let Some(min) = self.amount_min {
            filter.add_clause(
                Clause::compare(
                    values.field(values.amount_column),
                    Operator::GreaterThanEqual,
                    min,
                ),
                Operator::And,
            );
        }
        if let Some(max) = self.amount_max {
            filter.add_clause(
                Clause::compare(
                    values.field(values.amount_column),
                    Operator::LessThanEqual,
                    max,
                ),
                Operator::And,
            );
        }
        Ok(filter)
    }
}
