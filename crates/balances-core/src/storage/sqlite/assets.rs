//! Row mappings for each asset kind.

use crate::error::{BalancesError, Result};
use crate::filter::Literal;
use crate::model::{Asset, BankAccount, DbEnum, Property, Vehicle};
use crate::storage::row::{parse_timestamp, parse_uuid, AuditRow};

/// Column layout of an asset's parent table.
///
/// Rows are selected as `entity_id`, then [`SqlAsset::COLUMNS`], then the
/// audit columns.
pub trait SqlAsset: Asset {
    /// Own columns between `entity_id` and the audit columns, in bind order.
    const COLUMNS: &'static [&'static str];

    type Row: TryInto<Self, Error = BalancesError>;

    fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self::Row>;

    /// Values for [`SqlAsset::COLUMNS`], same order.
    fn column_params(&self) -> Vec<Literal>;

    fn audit_offset() -> usize {
        Self::COLUMNS.len() + 1
    }
}

fn parse_enum<E: DbEnum>(value: &str, column: &str) -> Result<E> {
    value
        .parse()
        .map_err(|_| BalancesError::storage(format!("Invalid {}: {}", column, value)))
}

#[derive(Debug)]
pub struct BankAccountRow {
    id: String,
    account_name: String,
    bank_name: String,
    account_holder_name: String,
    account_number: String,
    last_balance: f64,
    last_balance_date: String,
    status: String,
    audit: AuditRow,
}

impl TryFrom<BankAccountRow> for BankAccount {
    type Error = BalancesError;

    fn try_from(row: BankAccountRow) -> Result<Self> {
        Ok(BankAccount {
            id: parse_uuid(&row.id, "entity_id")?,
            account_name: row.account_name,
            bank_name: row.bank_name,
            account_holder_name: row.account_holder_name,
            account_number: row.account_number,
            last_balance: row.last_balance,
            last_balance_date: parse_timestamp(&row.last_balance_date)?,
            status: parse_enum(&row.status, "status")?,
            audit: row.audit.try_into()?,
            balances: Vec::new(),
        })
    }
}

impl SqlAsset for BankAccount {
    const COLUMNS: &'static [&'static str] = &[
        "account_name",
        "bank_name",
        "account_holder_name",
        "account_number",
        "last_balance",
        "last_balance_date",
        "status",
    ];

    type Row = BankAccountRow;

    fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BankAccountRow> {
        Ok(BankAccountRow {
            id: row.get(0)?,
            account_name: row.get(1)?,
            bank_name: row.get(2)?,
            account_holder_name: row.get(3)?,
            account_number: row.get(4)?,
            last_balance: row.get(5)?,
            last_balance_date: row.get(6)?,
            status: row.get(7)?,
            audit: AuditRow::read(row, Self::audit_offset())?,
        })
    }

    fn column_params(&self) -> Vec<Literal> {
        vec![
            Literal::from(self.account_name.as_str()),
            Literal::from(self.bank_name.as_str()),
            Literal::from(self.account_holder_name.as_str()),
            Literal::from(self.account_number.as_str()),
            Literal::Float(self.last_balance),
            Literal::Timestamp(self.last_balance_date),
            Literal::from(self.status.as_db_str()),
        ]
    }
}

#[derive(Debug)]
pub struct PropertyRow {
    id: String,
    name: String,
    address: String,
    total_area: f64,
    building_area: f64,
    area_unit: String,
    property_type: String,
    title_holder: String,
    tax_identifier: String,
    purchase_date: String,
    initial_value: f64,
    initial_value_date: String,
    current_value: f64,
    current_value_date: String,
    annual_appreciation_percent: f64,
    status: String,
    audit: AuditRow,
}

impl TryFrom<PropertyRow> for Property {
    type Error = BalancesError;

    fn try_from(row: PropertyRow) -> Result<Self> {
        Ok(Property {
            id: parse_uuid(&row.id, "entity_id")?,
            name: row.name,
            address: row.address,
            total_area: row.total_area,
            building_area: row.building_area,
            area_unit: parse_enum(&row.area_unit, "area_unit")?,
            property_type: parse_enum(&row.property_type, "type")?,
            title_holder: row.title_holder,
            tax_identifier: row.tax_identifier,
            purchase_date: parse_timestamp(&row.purchase_date)?,
            initial_value: row.initial_value,
            initial_value_date: parse_timestamp(&row.initial_value_date)?,
            current_value: row.current_value,
            current_value_date: parse_timestamp(&row.current_value_date)?,
            annual_appreciation_percent: row.annual_appreciation_percent,
            status: parse_enum(&row.status, "status")?,
            audit: row.audit.try_into()?,
            values: Vec::new(),
        })
    }
}

impl SqlAsset for Property {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "address",
        "total_area",
        "building_area",
        "area_unit",
        "type",
        "title_holder",
        "tax_identifier",
        "purchase_date",
        "initial_value",
        "initial_value_date",
        "current_value",
        "current_value_date",
        "annual_appreciation_percent",
        "status",
    ];

    type Row = PropertyRow;

    fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PropertyRow> {
        Ok(PropertyRow {
            id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            total_area: row.get(3)?,
            building_area: row.get(4)?,
            area_unit: row.get(5)?,
            property_type: row.get(6)?,
            title_holder: row.get(7)?,
            tax_identifier: row.get(8)?,
            purchase_date: row.get(9)?,
            initial_value: row.get(10)?,
            initial_value_date: row.get(11)?,
            current_value: row.get(12)?,
            current_value_date: row.get(13)?,
            annual_appreciation_percent: row.get(14)?,
            status: row.get(15)?,
            audit: AuditRow::read(row, Self::audit_offset())?,
        })
    }

    fn column_params(&self) -> Vec<Literal> {
        vec![
            Literal::from(self.name.as_str()),
            Literal::from(self.address.as_str()),
            Literal::Float(self.total_area),
            Literal::Float(self.building_area),
            Literal::from(self.area_unit.as_db_str()),
            Literal::from(self.property_type.as_db_str()),
            Literal::from(self.title_holder.as_str()),
            Literal::from(self.tax_identifier.as_str()),
            Literal::Timestamp(self.purchase_date),
            Literal::Float(self.initial_value),
            Literal::Timestamp(self.initial_value_date),
            Literal::Float(self.current_value),
            Literal::Timestamp(self.current_value_date),
            Literal::Float(self.annual_appreciation_percent),
            Literal::from(self.status.as_db_str()),
        ]
    }
}

#[derive(Debug)]
pub struct VehicleRow {
    id: String,
    name: String,
    make: String,
    model: String,
    year: i32,
    vehicle_type: String,
    title_holder: String,
    license_plate_number: String,
    purchase_date: String,
    initial_value: f64,
    initial_value_date: String,
    current_value: f64,
    current_value_date: String,
    annual_depreciation_percent: f64,
    status: String,
    audit: AuditRow,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = BalancesError;

    fn try_from(row: VehicleRow) -> Result<Self> {
        Ok(Vehicle {
            id: parse_uuid(&row.id, "entity_id")?,
            name: row.name,
            make: row.make,
            model: row.model,
            year: row.year,
            vehicle_type: parse_enum(&row.vehicle_type, "type")?,
            title_holder: row.title_holder,
            license_plate_number: row.license_plate_number,
            purchase_date: parse_timestamp(&row.purchase_date)?,
            initial_value: row.initial_value,
            initial_value_date: parse_timestamp(&row.initial_value_date)?,
            current_value: row.current_value,
            current_value_date: parse_timestamp(&row.current_value_date)?,
            annual_depreciation_percent: row.annual_depreciation_percent,
            status: parse_enum(&row.status, "status")?,
            audit: row.audit.try_into()?,
            values: Vec::new(),
        })
    }
}

impl SqlAsset for Vehicle {
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "make",
        "model",
        "year",
        "type",
        "title_holder",
        "license_plate_number",
        "purchase_date",
        "initial_value",
        "initial_value_date",
        "current_value",
        "current_value_date",
        "annual_depreciation_percent",
        "status",
    ];

    type Row = VehicleRow;

    fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<VehicleRow> {
        Ok(VehicleRow {
            id: row.get(0)?,
            name: row.get(1)?,
            make: row.get(2)?,
            model: row.get(3)?,
            year: row.get(4)?,
            vehicle_type: row.get(5)?,
            title_holder: row.get(6)?,
            license_plate_number: row.get(7)?,
            purchase_date: row.get(8)?,
            initial_value: row.get(9)?,
            initial_value_date: row.get(10)?,
            current_value: row.get(11)?,
            current_value_date: row.get(12)?,
            annual_depreciation_percent: row.get(13)?,
            status: row.get(14)?,
            audit: AuditRow::read(row, Self::audit_offset())?,
        })
    }

    fn column_params(&self) -> Vec<Literal> {
        vec![
            Literal::from(self.name.as_str()),
            Literal::from(self.make.as_str()),
            Literal::from(self.model.as_str()),
            Literal::Int(i64::from(self.year)),
            Literal::from(self.vehicle_type.as_db_str()),
            Literal::from(self.title_holder.as_str()),
            Literal::from(self.license_plate_number.as_str()),
            Literal::Timestamp(self.purchase_date),
            Literal::Float(self.initial_value),
            Literal::Timestamp(self.initial_value_date),
            Literal::Float(self.current_value),
            Literal::Timestamp(self.current_value_date),
            Literal::Float(self.annual_depreciation_percent),
            Literal::from(self.status.as_db_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_match_columns() {
        let now = chrono::Utc::now();
        let actor = uuid::Uuid::now_v7();
        let account = BankAccount::from_input(
            &crate::model::BankAccountInput {
                id: None,
                account_name: "a".to_string(),
                bank_name: "b".to_string(),
                account_holder_name: "c".to_string(),
                account_number: "d".to_string(),
                last_balance: 1.0,
                last_balance_date: now,
                status: crate::model::BankAccountStatus::Active,
            },
            actor,
            now,
        )
        .unwrap();
        assert_eq!(account.column_params().len(), BankAccount::COLUMNS.len());
        assert_eq!(BankAccount::audit_offset(), 8);
        assert_eq!(Property::audit_offset(), 16);
        assert_eq!(Vehicle::audit_offset(), 15);
    }
}
