//! Vehicles and their valuation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::latest_snapshot;
use super::property::seed_values;
use super::{Asset, Audit, Snapshot, ValueEntry, ValueInput, ValueTable};
use crate::error::{BalancesError, Result};
use crate::filter::Field;

db_enum!(
    /// `Sold` is terminal for valuation edits.
    VehicleStatus "vehicle status" {
        InUse => "in_use",
        Retired => "retired",
        Sold => "sold",
    }
);

db_enum!(VehicleType "vehicle type" {
    Car => "car",
    Truck => "truck",
    Bicycle => "bicycle",
    Other => "other",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub title_holder: String,
    pub license_plate_number: String,
    pub purchase_date: DateTime<Utc>,
    pub initial_value: f64,
    pub initial_value_date: DateTime<Utc>,
    pub current_value: f64,
    pub current_value_date: DateTime<Utc>,
    pub annual_depreciation_percent: f64,
    pub status: VehicleStatus,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(default)]
    pub values: Vec<ValueEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub title_holder: String,
    pub license_plate_number: String,
    pub purchase_date: DateTime<Utc>,
    pub initial_value: f64,
    pub initial_value_date: DateTime<Utc>,
    pub current_value: f64,
    pub current_value_date: DateTime<Utc>,
    pub annual_depreciation_percent: f64,
    pub status: VehicleStatus,
}

impl Asset for Vehicle {
    const ENTITY: &'static str = "Vehicle";
    const VALUE_ENTITY: &'static str = "Vehicle Value";
    const TABLE: &'static str = "vehicles";
    const VALUES: ValueTable = ValueTable {
        table: "vehicle_values",
        parent_column: "vehicle_entity_id",
        amount_column: "value",
    };

    type Status = VehicleStatus;
    type Input = VehicleInput;

    fn id(&self) -> Uuid {
        self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn status(&self) -> VehicleStatus {
        self.status
    }

    fn is_terminal(&self) -> bool {
        self.status == VehicleStatus::Sold
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            amount: self.current_value,
            date: self.current_value_date,
        }
    }

    fn write_snapshot(&mut self, snapshot: Snapshot) {
        self.current_value = snapshot.amount;
        self.current_value_date = snapshot.date;
    }

    fn values(&self) -> &[ValueEntry] {
        &self.values
    }

    fn values_mut(&mut self) -> &mut Vec<ValueEntry> {
        &mut self.values
    }

    fn keyword_fields() -> Vec<Field> {
        ["name", "make", "model", "year", "type", "title_holder"]
            .into_iter()
            .map(Self::field)
            .collect()
    }

    fn input_id(input: &VehicleInput) -> Option<Uuid> {
        input.id
    }

    fn from_input(input: &VehicleInput, actor: Uuid, now: DateTime<Utc>) -> Result<Self> {
        let id = input.id.unwrap_or_else(Uuid::now_v7);
        let values = seed_values(
            id,
            ValueInput::new(input.initial_value_date, input.initial_value),
            ValueInput::new(input.current_value_date, input.current_value),
            actor,
            now,
        )?;
        let snapshot = latest_snapshot(&values)
            .ok_or_else(|| BalancesError::bad_request("vehicle needs an initial value"))?;

        Ok(Self {
            id,
            name: input.name.clone(),
            make: input.make.clone(),
            model: input.model.clone(),
            year: input.year,
            vehicle_type: input.vehicle_type,
            title_holder: input.title_holder.clone(),
            license_plate_number: input.license_plate_number.clone(),
            purchase_date: input.purchase_date,
            initial_value: input.initial_value,
            initial_value_date: input.initial_value_date,
            current_value: snapshot.amount,
            current_value_date: snapshot.date,
            annual_depreciation_percent: input.annual_depreciation_percent,
            status: input.status,
            audit: Audit::new(actor, now),
            values,
        })
    }

    fn apply_input(&mut self, input: &VehicleInput) {
        self.name = input.name.clone();
        self.make = input.make.clone();
        self.model = input.model.clone();
        self.year = input.year;
        self.vehicle_type = input.vehicle_type;
        self.title_holder = input.title_holder.clone();
        self.license_plate_number = input.license_plate_number.clone();
        self.purchase_date = input.purchase_date;
        self.initial_value = input.initial_value;
        self.initial_value_date = input.initial_value_date;
        self.annual_depreciation_percent = input.annual_depreciation_percent;
        self.status = input.status;
    }
}
