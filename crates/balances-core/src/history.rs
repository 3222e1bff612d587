//! Keeping a parent's snapshot in step with its value history.
//!
//! Every history write is decided here before anything touches storage: the
//! caller resolves the most recent non-deleted items (newest first), asks for
//! a [`Resync`] verdict, and persists the item together with the parent when
//! the verdict moves the snapshot. The invariant maintained is that a live
//! parent's snapshot equals the `(amount, date)` of its newest live item.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{BalancesError, Result};
use crate::model::{Asset, Snapshot, ValueEntry};

/// Whether the parent row must be rewritten alongside a history write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resync {
    Keep,
    To(Snapshot),
}

impl Resync {
    /// Move the parent's snapshot if required. Returns whether the parent
    /// now needs persisting.
    pub fn apply<A: Asset>(self, parent: &mut A, actor: Uuid, now: DateTime<Utc>) -> bool {
        match self {
            Resync::Keep => false,
            Resync::To(snapshot) => {
                parent.set_snapshot(snapshot, actor, now);
                true
            }
        }
    }
}

/// Refuse value writes on a deleted parent or one in a terminal status.
pub fn ensure_writable<A: Asset>(parent: &A, operation: &str) -> Result<()> {
    if parent.is_deleted() {
        return Err(BalancesError::not_permitted(
            operation,
            A::VALUE_ENTITY,
            format!("the {} is already deleted", A::ENTITY),
        ));
    }
    if parent.is_terminal() {
        return Err(BalancesError::not_permitted(
            operation,
            A::VALUE_ENTITY,
            format!("the {} is {}", A::ENTITY, parent.status()),
        ));
    }
    Ok(())
}

/// A new item moves the snapshot only when strictly newer than the current one.
///
/// Items are ranked by [`ValueEntry::recency`], the order storage resolves
/// `latest` in, so the snapshot always mirrors the first stored item.
pub fn on_create<A: Asset>(latest: &[ValueEntry], created: &ValueEntry) -> Result<Resync> {
    let current = latest.first().ok_or_else(|| {
        BalancesError::not_found("create value", &format!("{} Last Value", A::ENTITY))
    })?;

    if created.recency(current) == Ordering::Greater {
        Ok(Resync::To(created.snapshot()))
    } else {
        Ok(Resync::Keep)
    }
}

/// `latest` holds up to two items as they were before the edit.
///
/// Editing the current item always resyncs, to whichever of the edited item
/// and the runner-up ranks first. The edit restamps the item, so on a date
/// tie the runner-up stays ahead. Editing any other item resyncs only when
/// it overtakes the current one.
pub fn on_update<A: Asset>(latest: &[ValueEntry], edited: &ValueEntry) -> Result<Resync> {
    let current = latest
        .first()
        .ok_or_else(|| BalancesError::not_found("update", A::VALUE_ENTITY))?;

    if edited.id == current.id {
        return Ok(match latest.get(1) {
            Some(runner_up) if runner_up.recency(edited) == Ordering::Greater => {
                Resync::To(runner_up.snapshot())
            }
            _ => Resync::To(edited.snapshot()),
        });
    }
    if edited.recency(current) == Ordering::Greater {
        return Ok(Resync::To(edited.snapshot()));
    }
    Ok(Resync::Keep)
}

/// `latest` holds up to two items. The only remaining item cannot be
/// deleted; deleting the current item falls back to the runner-up.
pub fn on_delete<A: Asset>(latest: &[ValueEntry], target: Uuid) -> Result<Resync> {
    let current = latest.first().ok_or_else(|| {
        BalancesError::not_found("delete", &format!("{} Current Value", A::ENTITY))
    })?;
    let runner_up = latest.get(1).ok_or_else(|| {
        BalancesError::not_permitted(
            "delete",
            A::VALUE_ENTITY,
            format!(
                "cannot delete the only {} belonging to a {}",
                A::VALUE_ENTITY,
                A::ENTITY
            ),
        )
    })?;

    if current.id == target {
        Ok(Resync::To(runner_up.snapshot()))
    } else {
        Ok(Resync::Keep)
    }
}
