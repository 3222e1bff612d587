//! Asset services: input validation, the history protocol and repository
//! calls, one generic implementation per asset kind.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::error::{BalancesError, Result};
use crate::filter::{BaseFilterInput, PageInfo, Pagination};
use crate::history;
use crate::model::{
    Asset, AssetFilterInput, BankAccount, Property, ValueEntry, ValueFilterInput, ValueInput,
    Vehicle,
};
use crate::storage::{AssetRepository, Database, SqliteAssetRepository};

/// Date window and page size for the history attached by
/// [`AssetService::get_by_id`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValueWindow {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page_size: Option<u32>,
}

pub struct AssetService<A, R> {
    repository: R,
    kind: PhantomData<fn() -> A>,
}

pub type BankAccountService = AssetService<BankAccount, SqliteAssetRepository<BankAccount>>;
pub type PropertyService = AssetService<Property, SqliteAssetRepository<Property>>;
pub type VehicleService = AssetService<Vehicle, SqliteAssetRepository<Vehicle>>;

/// The three services over one database.
pub struct Services {
    pub bank_accounts: BankAccountService,
    pub properties: PropertyService,
    pub vehicles: VehicleService,
}

impl Services {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            bank_accounts: AssetService::new(SqliteAssetRepository::new(Arc::clone(&db))),
            properties: AssetService::new(SqliteAssetRepository::new(Arc::clone(&db))),
            vehicles: AssetService::new(SqliteAssetRepository::new(db)),
        }
    }
}

fn require_actor(actor: Uuid) -> Result<()> {
    if actor.is_nil() {
        return Err(BalancesError::Unauthorized(
            "an actor id is required for writes".to_string(),
        ));
    }
    Ok(())
}

fn single<T>(mut items: Vec<T>, operation: &str, entity: &str) -> Result<T> {
    match (items.pop(), items.is_empty()) {
        (Some(item), true) => Ok(item),
        _ => Err(BalancesError::not_found(operation, entity)),
    }
}

impl<A: Asset, R: AssetRepository<A>> AssetService<A, R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            kind: PhantomData,
        }
    }

    fn resolve(&self, id: Uuid, operation: &str, entity: &str) -> Result<A> {
        single(self.repository.resolve_by_ids(&[id])?, operation, entity)
    }

    fn resolve_value(&self, id: Uuid, operation: &str) -> Result<ValueEntry> {
        single(
            self.repository.resolve_values_by_ids(&[id])?,
            operation,
            A::VALUE_ENTITY,
        )
    }

    /// Create a parent with its seeded history.
    pub fn create(&self, input: &A::Input, actor: Uuid) -> Result<A> {
        require_actor(actor)?;
        if let Some(id) = A::input_id(input) {
            if self.repository.exists_by_id(id)? {
                return Err(BalancesError::not_permitted("create", A::ENTITY, "already exists"));
            }
        }
        let asset = A::from_input(input, actor, Utc::now())?;
        self.repository.create(&asset)?;
        debug!(entity = A::ENTITY, id = %asset.id(), "asset created");
        Ok(asset)
    }

    /// Fetch a parent, optionally with a window of its live history attached.
    pub fn get_by_id(&self, id: Uuid, values: Option<ValueWindow>) -> Result<A> {
        let mut asset = self.resolve(id, "get by ID", A::ENTITY)?;

        if let Some(window) = values {
            let filter = ValueFilterInput {
                base: BaseFilterInput {
                    page_size: window.page_size,
                    ..Default::default()
                },
                parent_ids: Some(vec![id]),
                start_date: window.start_date,
                end_date: window.end_date,
                ..Default::default()
            };
            let (items, _) = self
                .repository
                .resolve_values_by_filter(&filter.to_filter(&A::VALUES)?)?;
            asset.attach_values(items, true);
        }
        Ok(asset)
    }

    pub fn get_by_filter(&self, input: &AssetFilterInput) -> Result<(Vec<A>, PageInfo)> {
        self.repository.resolve_by_filter(&input.to_filter::<A>()?)
    }

    /// Edit descriptive fields and status. The snapshot is left alone.
    pub fn update(&self, id: Uuid, input: &A::Input, actor: Uuid) -> Result<A> {
        require_actor(actor)?;
        let mut asset = self.resolve(id, "update", A::ENTITY)?;
        asset.update(input, actor, Utc::now())?;
        self.repository.update(&asset)?;
        debug!(entity = A::ENTITY, id = %id, "asset updated");
        Ok(asset)
    }

    /// Soft-delete a parent together with all of its live history.
    pub fn delete(&self, id: Uuid, actor: Uuid) -> Result<A> {
        require_actor(actor)?;
        let mut asset = self.resolve(id, "delete", A::ENTITY)?;

        if !asset.is_deleted() {
            let filter = ValueFilterInput::for_parent(id)
                .to_filter(&A::VALUES)?
                .paginate(Pagination::unbounded());
            let (items, _) = self.repository.resolve_values_by_filter(&filter)?;
            asset.attach_values(items, true);
        }

        asset.delete(actor, Utc::now())?;
        self.repository.update(&asset)?;
        debug!(
            entity = A::ENTITY,
            id = %id,
            values = asset.values().len(),
            "asset deleted"
        );
        Ok(asset)
    }

    /// Add a history item; the snapshot follows when the item is newer.
    pub fn create_value(&self, parent_id: Uuid, input: &ValueInput, actor: Uuid) -> Result<ValueEntry> {
        require_actor(actor)?;
        input.validate()?;
        if let Some(id) = input.id {
            if self.repository.exists_value_by_id(id)? {
                return Err(BalancesError::not_permitted(
                    "create",
                    A::VALUE_ENTITY,
                    "already exists",
                ));
            }
        }
        let mut parent = self.resolve(parent_id, "create value", A::VALUE_ENTITY)?;
        history::ensure_writable(&parent, "add value")?;

        let now = Utc::now();
        let latest = self.repository.resolve_last_values(parent_id, 1)?;
        let value = ValueEntry::new(parent_id, input, actor, now);
        let verdict = history::on_create::<A>(&latest, &value)?;
        let resync = verdict.apply(&mut parent, actor, now);

        self.repository
            .create_value(&value, resync.then_some(&parent))?;
        debug!(entity = A::VALUE_ENTITY, id = %value.id, resync, "value created");
        Ok(value)
    }

    pub fn get_value_by_id(&self, id: Uuid) -> Result<ValueEntry> {
        self.resolve_value(id, "get by ID")
    }

    pub fn get_values_by_filter(
        &self,
        input: &ValueFilterInput,
    ) -> Result<(Vec<ValueEntry>, PageInfo)> {
        self.repository
            .resolve_values_by_filter(&input.to_filter(&A::VALUES)?)
    }

    /// Edit a history item of `parent_id`, resynchronizing the snapshot when
    /// the edit touches the current item or overtakes it.
    pub fn update_value(
        &self,
        parent_id: Uuid,
        value_id: Uuid,
        input: &ValueInput,
        actor: Uuid,
    ) -> Result<ValueEntry> {
        require_actor(actor)?;
        input.validate()?;
        let mut parent = self.resolve(parent_id, "update", A::VALUE_ENTITY)?;
        history::ensure_writable(&parent, "update")?;

        let mut value = self.resolve_value(value_id, "update")?;
        if value.parent_id != parent_id {
            return Err(BalancesError::bad_request(format!(
                "{} {} does not belong to {} {}",
                A::VALUE_ENTITY,
                value_id,
                A::ENTITY,
                parent_id
            )));
        }
        if value.is_deleted() {
            return Err(BalancesError::not_permitted(
                "update",
                A::VALUE_ENTITY,
                format!("the {} is already deleted", A::VALUE_ENTITY),
            ));
        }

        let now = Utc::now();
        let latest = self.repository.resolve_last_values(parent_id, 2)?;
        value.apply(input, actor, now);
        let verdict = history::on_update::<A>(&latest, &value)?;
        let resync = verdict.apply(&mut parent, actor, now);

        self.repository
            .update_value(&value, resync.then_some(&parent))?;
        debug!(entity = A::VALUE_ENTITY, id = %value.id, resync, "value updated");
        Ok(value)
    }

    /// Soft-delete a history item. The only remaining item of a parent
    /// cannot be deleted.
    pub fn delete_value(&self, value_id: Uuid, actor: Uuid) -> Result<ValueEntry> {
        require_actor(actor)?;
        let mut value = self.resolve_value(value_id, "delete")?;
        if value.is_deleted() {
            return Err(BalancesError::not_permitted(
                "delete",
                A::VALUE_ENTITY,
                format!("the {} is already deleted", A::VALUE_ENTITY),
            ));
        }

        let mut parent = self.resolve(value.parent_id, "delete", A::ENTITY)?;
        history::ensure_writable(&parent, "delete")?;

        let latest = self.repository.resolve_last_values(value.parent_id, 2)?;
        let verdict = history::on_delete::<A>(&latest, value.id)?;

        let now = Utc::now();
        value.mark_deleted(A::VALUE_ENTITY, actor, now)?;
        let resync = verdict.apply(&mut parent, actor, now);

        self.repository
            .update_value(&value, resync.then_some(&parent))?;
        debug!(entity = A::VALUE_ENTITY, id = %value.id, resync, "value deleted");
        Ok(value)
    }
}
