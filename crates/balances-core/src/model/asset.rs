//! The parent side of a value history.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Audit, DbEnum, Snapshot, ValueEntry, ValueTable};
use crate::error::{BalancesError, Result};
use crate::filter::{BaseFilterInput, Clause, Field, Filter, Operator};

/// An asset kind whose current value is denormalized from a dated history.
///
/// Implemented by [`BankAccount`](super::BankAccount),
/// [`Property`](super::Property) and [`Vehicle`](super::Vehicle).
pub trait Asset: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    /// Entity label used in errors, e.g. `"Property"`.
    const ENTITY: &'static str;
    /// Entity label for history items, e.g. `"Property Value"`.
    const VALUE_ENTITY: &'static str;
    const TABLE: &'static str;
    const VALUES: ValueTable;

    type Status: DbEnum;
    type Input: fmt::Debug + Clone;

    fn id(&self) -> Uuid;
    fn audit(&self) -> &Audit;
    fn audit_mut(&mut self) -> &mut Audit;
    fn status(&self) -> Self::Status;

    /// Whether the status forbids further value operations.
    fn is_terminal(&self) -> bool;

    fn snapshot(&self) -> Snapshot;

    /// Overwrite the snapshot fields without touching the audit stamp.
    fn write_snapshot(&mut self, snapshot: Snapshot);

    fn values(&self) -> &[ValueEntry];
    fn values_mut(&mut self) -> &mut Vec<ValueEntry>;

    /// Columns matched by a keyword search.
    fn keyword_fields() -> Vec<Field>;

    fn input_id(input: &Self::Input) -> Option<Uuid>;

    /// Build a new parent with its seeded history. The snapshot is taken
    /// from the latest seeded item.
    fn from_input(input: &Self::Input, actor: Uuid, now: DateTime<Utc>) -> Result<Self>;

    /// Copy descriptive fields and status from `input`. Never moves the
    /// snapshot.
    fn apply_input(&mut self, input: &Self::Input);

    fn field(column: &str) -> Field {
        Field::from(format!("{}.{}", Self::TABLE, column))
    }

    fn is_deleted(&self) -> bool {
        self.audit().is_deleted()
    }

    /// Move the snapshot and stamp the parent as updated.
    fn set_snapshot(&mut self, snapshot: Snapshot, actor: Uuid, now: DateTime<Utc>) {
        self.write_snapshot(snapshot);
        self.audit_mut().touch(actor, now);
    }

    /// Attach history items that belong to this parent, ignoring the rest.
    fn attach_values(&mut self, values: Vec<ValueEntry>, clear_before_attach: bool) {
        let id = self.id();
        let attached = self.values_mut();
        if clear_before_attach {
            attached.clear();
        }
        attached.extend(values.into_iter().filter(|value| value.parent_id == id));
    }

    /// Edit descriptive fields; refused once soft-deleted.
    fn update(&mut self, input: &Self::Input, actor: Uuid, now: DateTime<Utc>) -> Result<()> {
        if self.is_deleted() {
            return Err(BalancesError::not_permitted(
                "update",
                Self::ENTITY,
                "already deleted",
            ));
        }
        self.apply_input(input);
        self.audit_mut().touch(actor, now);
        Ok(())
    }

    /// Soft-delete the parent and every attached history item that is still live.
    fn delete(&mut self, actor: Uuid, now: DateTime<Utc>) -> Result<()> {
        if self.is_deleted() {
            return Err(BalancesError::not_permitted(
                "delete",
                Self::ENTITY,
                "already deleted",
            ));
        }
        self.audit_mut().mark_deleted(actor, now);
        for value in self.values_mut().iter_mut().filter(|v| !v.is_deleted()) {
            value.mark_deleted(Self::VALUE_ENTITY, actor, now)?;
        }
        Ok(())
    }
}

/// Build the snapshot from seeded items: the one with the latest date, the
/// later-seeded item winning ties.
pub(crate) fn latest_snapshot(values: &[ValueEntry]) -> Option<Snapshot> {
    values
        .iter()
        .max_by(|a, b| a.recency(b))
        .map(ValueEntry::snapshot)
}

/// List query over parents of one kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFilterInput {
    #[serde(flatten)]
    pub base: BaseFilterInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl AssetFilterInput {
    pub fn to_filter<A: Asset>(&self) -> Result<Filter> {
        let mut filter = Filter::new(A::TABLE)
            .include_deleted(self.base.include_deleted)
            .paginate(self.base.pagination()?);

        if let Some(keyword) = self.base.keyword_clause(&A::keyword_fields()) {
            filter.add_clause(keyword, Operator::And);
        }
        if let Some(status) = self.status.as_deref() {
            let status: A::Status = status.parse()?;
            filter.add_clause(
                Clause::compare(A::field("status"), Operator::Equal, status.as_db_str()),
                Operator::And,
            );
        }
        Ok(filter)
    }
}
