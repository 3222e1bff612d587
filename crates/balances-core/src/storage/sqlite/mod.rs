//! SQLite repository shared by every asset kind.
//!
//! The SQL for each kind is derived from its [`SqlAsset`] column layout and
//! its [`ValueTable`](crate::model::ValueTable), so one implementation covers
//! bank accounts, properties and vehicles.

mod assets;

use std::marker::PhantomData;
use std::sync::Arc;

use rusqlite::{params_from_iter, Connection, OptionalExtension};
use tracing::debug;
use uuid::Uuid;

pub use assets::SqlAsset;

use super::bind::expand_in_placeholders;
use super::row::{audit_params, value_params, ValueRow, AUDIT_COLUMNS};
use super::traits::AssetRepository;
use super::Database;
use crate::error::{BalancesError, Result};
use crate::filter::{Filter, Literal, PageInfo};
use crate::model::{Asset, ValueEntry};

/// Repository for one asset kind over a shared [`Database`].
pub struct SqliteAssetRepository<A> {
    db: Arc<Database>,
    kind: PhantomData<fn() -> A>,
}

impl<A> Clone for SqliteAssetRepository<A> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
            kind: PhantomData,
        }
    }
}

impl<A: SqlAsset> SqliteAssetRepository<A> {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            kind: PhantomData,
        }
    }

    fn asset_columns() -> impl Iterator<Item = &'static str> {
        std::iter::once("entity_id")
            .chain(A::COLUMNS.iter().copied())
            .chain(AUDIT_COLUMNS)
    }

    fn value_columns() -> impl Iterator<Item = &'static str> {
        [
            "entity_id",
            A::VALUES.parent_column,
            "date",
            A::VALUES.amount_column,
        ]
        .into_iter()
        .chain(AUDIT_COLUMNS)
    }

    fn select_sql(table: &str, columns: impl Iterator<Item = &'static str>) -> String {
        let columns: Vec<String> = columns.map(|c| format!("{}.{}", table, c)).collect();
        format!("SELECT {} FROM {}", columns.join(", "), table)
    }

    fn insert_sql(table: &str, columns: impl Iterator<Item = &'static str>) -> String {
        let columns: Vec<&str> = columns.collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders
        )
    }

    /// Every column but `entity_id` is rewritten; `entity_id` binds last.
    fn update_sql(table: &str, columns: impl Iterator<Item = &'static str>) -> String {
        let assignments: Vec<String> = columns
            .skip(1)
            .map(|c| format!("{} = ?", c))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE entity_id = ?",
            table,
            assignments.join(", ")
        )
    }

    fn asset_params(asset: &A) -> Vec<Literal> {
        let mut params = A::column_params(asset);
        params.extend(audit_params(asset.audit()));
        params
    }

    fn query_assets(conn: &Connection, sql: &str, args: &[Literal]) -> Result<Vec<A>> {
        let (sql, args) = expand_in_placeholders(sql, args)?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), A::read_row)?;

        let mut assets = Vec::new();
        for row in rows {
            let asset: A = row?.try_into()?;
            assets.push(asset);
        }
        Ok(assets)
    }

    fn query_values(conn: &Connection, sql: &str, args: &[Literal]) -> Result<Vec<ValueEntry>> {
        let (sql, args) = expand_in_placeholders(sql, args)?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), ValueRow::read)?;

        let mut values = Vec::new();
        for row in rows {
            values.push(row?.try_into()?);
        }
        Ok(values)
    }

    fn count(conn: &Connection, table: &str, predicate: &str, args: &[Literal]) -> Result<u64> {
        let sql = format!("SELECT COUNT({}.entity_id) FROM {}{}", table, table, predicate);
        let (sql, args) = expand_in_placeholders(&sql, args)?;
        let count: i64 = conn.query_row(&sql, params_from_iter(args.iter()), |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn exists(conn: &Connection, table: &str, id: Uuid) -> Result<bool> {
        let found: Option<i64> = conn
            .query_row(
                &format!("SELECT 1 FROM {} WHERE entity_id = ?", table),
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn insert_asset(conn: &Connection, asset: &A) -> Result<()> {
        let mut params = vec![Literal::Uuid(asset.id())];
        params.extend(Self::asset_params(asset));
        conn.execute(
            &Self::insert_sql(A::TABLE, Self::asset_columns()),
            params_from_iter(params.iter()),
        )?;
        Ok(())
    }

    fn write_asset(conn: &Connection, asset: &A) -> Result<usize> {
        let mut params = Self::asset_params(asset);
        params.push(Literal::Uuid(asset.id()));
        Ok(conn.execute(
            &Self::update_sql(A::TABLE, Self::asset_columns()),
            params_from_iter(params.iter()),
        )?)
    }

    fn insert_value(conn: &Connection, value: &ValueEntry) -> Result<()> {
        let mut params = vec![Literal::Uuid(value.id)];
        params.extend(value_params(value));
        conn.execute(
            &Self::insert_sql(A::VALUES.table, Self::value_columns()),
            params_from_iter(params.iter()),
        )?;
        Ok(())
    }

    fn write_value(conn: &Connection, value: &ValueEntry) -> Result<usize> {
        let mut params = value_params(value);
        params.push(Literal::Uuid(value.id));
        Ok(conn.execute(
            &Self::update_sql(A::VALUES.table, Self::value_columns()),
            params_from_iter(params.iter()),
        )?)
    }

    /// Rewrite the parent inside a history write; a vanished parent aborts it.
    fn write_parent(conn: &Connection, parent: &A, operation: &str) -> Result<()> {
        if Self::write_asset(conn, parent)? == 0 {
            return Err(BalancesError::not_found(operation, A::ENTITY));
        }
        Ok(())
    }

    fn check_table(filter: &Filter, table: &str) -> Result<()> {
        if filter.table_name != table {
            return Err(BalancesError::bad_request(format!(
                "filter targets {} instead of {}",
                filter.table_name, table
            )));
        }
        Ok(())
    }
}

impl<A: SqlAsset> AssetRepository<A> for SqliteAssetRepository<A> {
    fn exists_by_id(&self, id: Uuid) -> Result<bool> {
        self.db
            .with_connection(|conn| Self::exists(conn, A::TABLE, id))
            .map_err(|e| BalancesError::internal("exists by ID", A::ENTITY, e))
    }

    fn exists_value_by_id(&self, id: Uuid) -> Result<bool> {
        self.db
            .with_connection(|conn| Self::exists(conn, A::VALUES.table, id))
            .map_err(|e| BalancesError::internal("exists by ID", A::VALUE_ENTITY, e))
    }

    fn resolve_by_ids(&self, ids: &[Uuid]) -> Result<Vec<A>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{} WHERE {}.entity_id IN (?)",
            Self::select_sql(A::TABLE, Self::asset_columns()),
            A::TABLE
        );
        self.db
            .with_connection(|conn| Self::query_assets(conn, &sql, &[Literal::from(ids.to_vec())]))
            .map_err(|e| BalancesError::internal("resolve by IDs", A::ENTITY, e))
    }

    fn resolve_values_by_ids(&self, ids: &[Uuid]) -> Result<Vec<ValueEntry>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "{} WHERE {}.entity_id IN (?)",
            Self::select_sql(A::VALUES.table, Self::value_columns()),
            A::VALUES.table
        );
        self.db
            .with_connection(|conn| Self::query_values(conn, &sql, &[Literal::from(ids.to_vec())]))
            .map_err(|e| BalancesError::internal("resolve by IDs", A::VALUE_ENTITY, e))
    }

    fn resolve_by_filter(&self, filter: &Filter) -> Result<(Vec<A>, PageInfo)> {
        Self::check_table(filter, A::TABLE)?;
        let compiled = filter
            .compile()
            .map_err(|e| BalancesError::internal("resolve by filter", A::ENTITY, e))?;
        let sql = format!(
            "{}{}",
            Self::select_sql(A::TABLE, Self::asset_columns()),
            compiled.paged_sql()
        );

        let (assets, total) = self
            .db
            .with_connection(|conn| {
                let assets = Self::query_assets(conn, &sql, &compiled.paged_args())?;
                let total = Self::count(conn, A::TABLE, compiled.predicate(), compiled.args())?;
                Ok((assets, total))
            })
            .map_err(|e| BalancesError::internal("resolve by filter", A::ENTITY, e))?;

        debug!(entity = A::ENTITY, returned = assets.len(), total, "resolved by filter");
        Ok((assets, compiled.pagination().page_info(total)))
    }

    fn resolve_values_by_filter(&self, filter: &Filter) -> Result<(Vec<ValueEntry>, PageInfo)> {
        Self::check_table(filter, A::VALUES.table)?;
        let compiled = filter
            .compile()
            .map_err(|e| BalancesError::internal("resolve by filter", A::VALUE_ENTITY, e))?;
        let sql = format!(
            "{}{}",
            Self::select_sql(A::VALUES.table, Self::value_columns()),
            compiled.paged_sql()
        );

        let (values, total) = self
            .db
            .with_connection(|conn| {
                let values = Self::query_values(conn, &sql, &compiled.paged_args())?;
                let total =
                    Self::count(conn, A::VALUES.table, compiled.predicate(), compiled.args())?;
                Ok((values, total))
            })
            .map_err(|e| BalancesError::internal("resolve by filter", A::VALUE_ENTITY, e))?;

        debug!(entity = A::VALUE_ENTITY, returned = values.len(), total, "resolved by filter");
        Ok((values, compiled.pagination().page_info(total)))
    }

    fn resolve_last_values(&self, parent_id: Uuid, count: u32) -> Result<Vec<ValueEntry>> {
        let table = A::VALUES.table;
        let sql = format!(
            "{select} WHERE {table}.{parent} = ? AND {table}.deleted IS NULL AND {table}.deleted_by IS NULL \
             ORDER BY {order} LIMIT ?",
            select = Self::select_sql(table, Self::value_columns()),
            table = table,
            parent = A::VALUES.parent_column,
            order = A::VALUES.recency_sql(),
        );
        let args = [Literal::Uuid(parent_id), Literal::Int(i64::from(count))];
        self.db
            .with_connection(|conn| Self::query_values(conn, &sql, &args))
            .map_err(|e| BalancesError::internal("resolve last values", A::VALUE_ENTITY, e))
    }

    fn create(&self, asset: &A) -> Result<()> {
        self.db
            .with_transaction(|tx| {
                if Self::exists(tx, A::TABLE, asset.id())? {
                    return Err(BalancesError::not_permitted(
                        "create",
                        A::ENTITY,
                        "already exists",
                    ));
                }
                Self::insert_asset(tx, asset)?;
                for value in asset.values() {
                    Self::insert_value(tx, value)?;
                }
                Ok(())
            })
            .map_err(|e| BalancesError::internal("create", A::ENTITY, e))?;

        debug!(entity = A::ENTITY, id = %asset.id(), values = asset.values().len(), "created");
        Ok(())
    }

    fn update(&self, asset: &A) -> Result<()> {
        self.db
            .with_transaction(|tx| {
                if Self::write_asset(tx, asset)? == 0 {
                    return Err(BalancesError::not_found("update", A::ENTITY));
                }
                for value in asset.values() {
                    if Self::write_value(tx, value)? == 0 {
                        return Err(BalancesError::not_found("update", A::VALUE_ENTITY));
                    }
                }
                Ok(())
            })
            .map_err(|e| BalancesError::internal("update", A::ENTITY, e))?;

        debug!(entity = A::ENTITY, id = %asset.id(), values = asset.values().len(), "updated");
        Ok(())
    }

    fn create_value(&self, value: &ValueEntry, parent: Option<&A>) -> Result<()> {
        self.db
            .with_transaction(|tx| {
                if Self::exists(tx, A::VALUES.table, value.id)? {
                    return Err(BalancesError::not_permitted(
                        "create",
                        A::VALUE_ENTITY,
                        "already exists",
                    ));
                }
                Self::insert_value(tx, value)?;
                if let Some(parent) = parent {
                    Self::write_parent(tx, parent, "create")?;
                }
                Ok(())
            })
            .map_err(|e| BalancesError::internal("create", A::VALUE_ENTITY, e))?;

        debug!(
            entity = A::VALUE_ENTITY,
            id = %value.id,
            parent_updated = parent.is_some(),
            "created"
        );
        Ok(())
    }

    fn update_value(&self, value: &ValueEntry, parent: Option<&A>) -> Result<()> {
        self.db
            .with_transaction(|tx| {
                if Self::write_value(tx, value)? == 0 {
                    return Err(BalancesError::not_found("update", A::VALUE_ENTITY));
                }
                if let Some(parent) = parent {
                    Self::write_parent(tx, parent, "update")?;
                }
                Ok(())
            })
            .map_err(|e| BalancesError::internal("update", A::VALUE_ENTITY, e))?;

        debug!(
            entity = A::VALUE_ENTITY,
            id = %value.id,
            parent_updated = parent.is_some(),
            "updated"
        );
        Ok(())
    }
}
