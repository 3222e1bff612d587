//! Repository trait definition.
//!
//! One repository serves one asset kind: its parent table and its history
//! table. Writes that touch both run in a single unit of work.

use uuid::Uuid;

use crate::error::Result;
use crate::filter::{Filter, PageInfo};
use crate::model::{Asset, ValueEntry};

/// Persistence for an asset kind and its value history.
pub trait AssetRepository<A: Asset>: Send + Sync {
    fn exists_by_id(&self, id: Uuid) -> Result<bool>;

    fn exists_value_by_id(&self, id: Uuid) -> Result<bool>;

    /// Parents by id, soft-deleted ones included.
    fn resolve_by_ids(&self, ids: &[Uuid]) -> Result<Vec<A>>;

    /// History items by id, soft-deleted ones included.
    fn resolve_values_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ValueEntry>>;

    fn resolve_by_filter(&self, filter: &Filter) -> Result<(Vec<A>, PageInfo)>;

    fn resolve_values_by_filter(&self, filter: &Filter) -> Result<(Vec<ValueEntry>, PageInfo)>;

    /// Up to `count` live history items of a parent, newest first. Ties on
    /// date are ordered by id, newest first.
    fn resolve_last_values(&self, parent_id: Uuid, count: u32) -> Result<Vec<ValueEntry>>;

    /// Insert a parent with its attached (seeded) history.
    ///
    /// # Errors
    ///
    /// `OperationNotPermitted` if the id is already taken.
    fn create(&self, asset: &A) -> Result<()>;

    /// Rewrite a parent and every history item attached to it.
    ///
    /// # Errors
    ///
    /// `EntityNotFound` if the parent does not exist.
    fn update(&self, asset: &A) -> Result<()>;

    /// Insert a history item, rewriting `parent` in the same transaction
    /// when given.
    fn create_value(&self, value: &ValueEntry, parent: Option<&A>) -> Result<()>;

    /// Rewrite a history item, rewriting `parent` in the same transaction
    /// when given.
    fn update_value(&self, value: &ValueEntry, parent: Option<&A>) -> Result<()>;
}
