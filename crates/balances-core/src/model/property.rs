//! Real estate and its valuation history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::latest_snapshot;
use super::{Asset, Audit, Snapshot, ValueEntry, ValueInput, ValueTable};
use crate::error::{BalancesError, Result};
use crate::filter::Field;

db_enum!(
    /// `Sold` is terminal for valuation edits.
    PropertyStatus "property status" {
        InUse => "in_use",
        NotInUse => "not_in_use",
        Rented => "rented",
        Sold => "sold",
    }
);

db_enum!(PropertyType "property type" {
    Land => "land",
    House => "house",
    Apartment => "apartment",
});

db_enum!(PropertyAreaUnit "area unit" {
    SquareFeet => "sqft",
    SquareMeters => "sqm",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub total_area: f64,
    pub building_area: f64,
    pub area_unit: PropertyAreaUnit,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub title_holder: String,
    pub tax_identifier: String,
    pub purchase_date: DateTime<Utc>,
    pub initial_value: f64,
    pub initial_value_date: DateTime<Utc>,
    pub current_value: f64,
    pub current_value_date: DateTime<Utc>,
    pub annual_appreciation_percent: f64,
    pub status: PropertyStatus,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(default)]
    pub values: Vec<ValueEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub address: String,
    pub total_area: f64,
    pub building_area: f64,
    pub area_unit: PropertyAreaUnit,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub title_holder: String,
    pub tax_identifier: String,
    pub purchase_date: DateTime<Utc>,
    pub initial_value: f64,
    pub initial_value_date: DateTime<Utc>,
    pub current_value: f64,
    pub current_value_date: DateTime<Utc>,
    pub annual_appreciation_percent: f64,
    pub status: PropertyStatus,
}

/// The initial value, plus the current value when it differs in amount or date.
///
/// Seeds share a creation stamp, so on a date tie the lower id ranks first;
/// the current value is then created first to stay ahead.
pub(crate) fn seed_values(
    parent_id: Uuid,
    initial: ValueInput,
    current: ValueInput,
    actor: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<ValueEntry>> {
    initial.validate()?;
    current.validate()?;

    if current.amount == initial.amount && current.date == initial.date {
        return Ok(vec![ValueEntry::new(parent_id, &initial, actor, now)]);
    }
    let (first, second) = if current.date == initial.date {
        (&current, &initial)
    } else {
        (&initial, &current)
    };
    let first = ValueEntry::new(parent_id, first, actor, now);
    let second = ValueEntry::new(parent_id, second, actor, now);
    Ok(vec![first, second])
}

impl Asset for Property {
    const ENTITY: &'static str = "Property";
    const VALUE_ENTITY: &'static str = "Property Value";
    const TABLE: &'static str = "properties";
    const VALUES: ValueTable = ValueTable {
        table: "property_values",
        parent_column: "property_entity_id",
        amount_column: "value",
    };

    type Status = PropertyStatus;
    type Input = PropertyInput;

    fn id(&self) -> Uuid {
        self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn status(&self) -> PropertyStatus {
        self.status
    }

    fn is_terminal(&self) -> bool {
        self.status == PropertyStatus::Sold
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
        ["name", "address", "type", "title_holder", "tax_identifier"]
            .into_iter()
            .map(Self::field)
            .collect()
    }

    fn input_id(input: &PropertyInput) -> Option<Uuid> {
        input.id
    }

    fn from_input(input: &PropertyInput, actor: Uuid, now: DateTime<Utc>) -> Result<Self> {
        let id = input.id.unwrap_or_else(Uuid::now_v7);
        let values = seed_values(
            id,
            ValueInput::new(input.initial_value_date, input.initial_value),
            ValueInput::new(input.current_value_date, input.current_value),
            actor,
            now,
        )?;
        let snapshot = latest_snapshot(&values)
            .ok_or_else(|| BalancesError::bad_request("property needs an initial value"))?;

        Ok(Self {
            id,
            name: input.name.clone(),
            address: input.address.clone(),
            total_area: input.total_area,
            building_area: input.building_area,
            area_unit: input.area_unit,
            property_type: input.property_type,
            title_holder: input.title_holder.clone(),
            tax_identifier: input.tax_identifier.clone(),
            purchase_date: input.purchase_date,
            initial_value: input.initial_value,
            initial_value_date: input.initial_value_date,
            current_value: snapshot.amount,
            current_value_date: snapshot.date,
            annual_appreciation_percent: input.annual_appreciation_percent,
            status: input.status,
            audit: Audit::new(actor, now),
            values,
        })
    }

    fn apply_input(&mut self, input: &PropertyInput) {
        self.name = input.name.clone();
        self.address = input.address.clone();
        self.total_area = input.total_area;
        self.building_area = input.building_area;
        self.area_unit = input.area_unit;
        self.property_type = input.property_type;
        self.title_holder = input.title_holder.clone();
        self.tax_identifier = input.tax_identifier.clone();
        self.purchase_date = input.purchase_date;
        self.initial_value = input.initial_value;
        self.initial_value_date = input.initial_value_date;
        self.annual_appreciation_percent = input.annual_appreciation_percent;
        self.status = input.status;
    }
}
