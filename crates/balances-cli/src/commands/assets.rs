//! Handlers shared by the `account`, `property` and `vehicle` commands.

use chrono::Utc;
use tracing::debug;

use balances_core::filter::BaseFilterInput;
use balances_core::model::{
    Asset, AssetFilterInput, BankAccount, BankAccountInput, BankAccountStatus, Property,
    PropertyAreaUnit, PropertyInput, PropertyStatus, Vehicle, VehicleInput, VehicleStatus,
};
use balances_core::{AssetRepository, AssetService, BalancesError, ValueWindow};

use crate::app::AppContext;
use crate::cli::{
    AccountCommand, AccountFields, DeleteArgs, ListArgs, PropertyCommand, PropertyFields,
    ShowArgs, ValuationFields, VehicleCommand, VehicleFields,
};
use crate::constants::DEFAULT_SHOWN_VALUES;
use crate::helpers::{
    confirm, parse_datetime, parse_enum, parse_optional_datetime, parse_uuid, require,
};
use crate::output::{list_json, print_asset, print_asset_list, print_json, AssetView};

/// Flag set of one asset kind, turned into the kind's input.
pub trait AssetFields {
    type Asset: AssetView;

    fn create_input(&self) -> anyhow::Result<<Self::Asset as Asset>::Input>;

    /// Flags override the stored fields; the snapshot is carried over as is.
    fn update_input(&self, existing: &Self::Asset)
        -> anyhow::Result<<Self::Asset as Asset>::Input>;
}

pub enum AssetAction<'a, F> {
    Create(&'a F),
    List(&'a ListArgs),
    Show(&'a ShowArgs),
    Update { target: &'a str, fields: &'a F },
    Delete(&'a DeleteArgs),
}

impl AccountCommand {
    pub fn action(&self) -> AssetAction<'_, AccountFields> {
        match self {
            AccountCommand::Create(fields) => AssetAction::Create(fields),
            AccountCommand::List(args) => AssetAction::List(args),
            AccountCommand::Show(args) => AssetAction::Show(args),
            AccountCommand::Update { target, fields } => AssetAction::Update { target, fields },
            AccountCommand::Delete(args) => AssetAction::Delete(args),
        }
    }
}

impl PropertyCommand {
    pub fn action(&self) -> AssetAction<'_, PropertyFields> {
        match self {
            PropertyCommand::Create(fields) => AssetAction::Create(fields),
            PropertyCommand::List(args) => AssetAction::List(args),
            PropertyCommand::Show(args) => AssetAction::Show(args),
            PropertyCommand::Update { target, fields } => AssetAction::Update { target, fields },
            PropertyCommand::Delete(args) => AssetAction::Delete(args),
        }
    }
}

impl VehicleCommand {
    pub fn action(&self) -> AssetAction<'_, VehicleFields> {
        match self {
            VehicleCommand::Create(fields) => AssetAction::Create(fields),
            VehicleCommand::List(args) => AssetAction::List(args),
            VehicleCommand::Show(args) => AssetAction::Show(args),
            VehicleCommand::Update { target, fields } => AssetAction::Update { target, fields },
            VehicleCommand::Delete(args) => AssetAction::Delete(args),
        }
    }
}

pub fn handle_asset<F, R>(
    ctx: &AppContext,
    service: &AssetService<F::Asset, R>,
    action: AssetAction<'_, F>,
) -> anyhow::Result<()>
where
    F: AssetFields,
    R: AssetRepository<F::Asset>,
{
    match action {
        AssetAction::Create(fields) => {
            let input = fields.create_input()?;
            let asset = service.create(&input, ctx.actor()?)?;
            report_write(ctx, &asset, "Created")
        }
        AssetAction::List(args) => handle_list(ctx, service, args),
        AssetAction::Show(args) => {
            let id = parse_uuid(&args.id, "ID")?;
            let window = if args.values {
                Some(ValueWindow {
                    start_date: parse_optional_datetime(args.since.as_deref())?,
                    end_date: parse_optional_datetime(args.until.as_deref())?,
                    page_size: Some(args.limit.unwrap_or(DEFAULT_SHOWN_VALUES)),
                })
            } else {
                None
            };
            let asset = service.get_by_id(id, window)?;
            if ctx.json() {
                print_json(&asset)
            } else {
                print_asset(&asset);
                Ok(())
            }
        }
        AssetAction::Update { target, fields } => {
            let id = parse_uuid(target, "ID")?;
            let existing = service.get_by_id(id, None)?;
            let input = fields.update_input(&existing)?;
            let asset = service.update(id, &input, ctx.actor()?)?;
            report_write(ctx, &asset, "Updated")
        }
        AssetAction::Delete(args) => {
            let id = parse_uuid(&args.id, "ID")?;
            let actor = ctx.actor()?;
            let prompt = format!(
                "Delete {} {} and all of its values?",
                <F::Asset as Asset>::ENTITY,
                id
            );
            if !confirm(&prompt, ctx.cli().yes)? {
                if !ctx.quiet() {
                    println!("Cancelled");
                }
                return Ok(());
            }
            let asset = service.delete(id, actor)?;
            debug!(id = %id, values = asset.values().len(), "delete cascaded");
            report_write(ctx, &asset, "Deleted")
        }
    }
}

fn handle_list<A, R>(
    ctx: &AppContext,
    service: &AssetService<A, R>,
    args: &ListArgs,
) -> anyhow::Result<()>
where
    A: AssetView,
    R: AssetRepository<A>,
{
    let input = AssetFilterInput {
        base: BaseFilterInput {
            keyword: args.keyword.clone(),
            include_deleted: args.include_deleted,
            page: args.page,
            page_size: Some(ctx.page_size(args.page_size)?),
        },
        status: args.status.clone(),
    };
    let (items, page_info) = service.get_by_filter(&input)?;
    if ctx.json() {
        print_json(&list_json(&items, &page_info)?)
    } else {
        print_asset_list(&items, &page_info, ctx.quiet());
        Ok(())
    }
}

fn report_write<A: AssetView>(ctx: &AppContext, asset: &A, verb: &str) -> anyhow::Result<()> {
    if ctx.json() {
        return print_json(asset);
    }
    if ctx.quiet() {
        println!("{}", asset.id());
    } else {
        println!("{} {} {}", verb, A::ENTITY, asset.id());
    }
    Ok(())
}

fn reject_create_only(flags: &[(&str, bool)]) -> anyhow::Result<()> {
    match flags.iter().find(|(_, given)| *given) {
        Some((flag, _)) => Err(BalancesError::bad_request(format!(
            "--{} only applies to create; record values with `balances value add`",
            flag
        ))
        .into()),
        None => Ok(()),
    }
}

fn merge<T: Clone>(flag: &Option<T>, existing: &T) -> T {
    flag.clone().unwrap_or_else(|| existing.clone())
}

fn merge_enum<E: balances_core::model::DbEnum>(
    flag: Option<&str>,
    existing: E,
) -> anyhow::Result<E> {
    Ok(flag.map(parse_enum).transpose()?.unwrap_or(existing))
}

/// Initial and current seed valuations. The current one defaults to the
/// initial one, which in turn defaults to the purchase date.
fn seed_valuations(
    valuation: &ValuationFields,
    purchase_date: chrono::DateTime<Utc>,
) -> anyhow::Result<((f64, chrono::DateTime<Utc>), (f64, chrono::DateTime<Utc>))> {
    let initial_value = require(&valuation.initial_value, "initial-value")?;
    let initial_date = parse_optional_datetime(valuation.initial_date.as_deref())?
        .unwrap_or(purchase_date);
    let current_value = valuation.current_value.unwrap_or(initial_value);
    let current_date =
        parse_optional_datetime(valuation.current_date.as_deref())?.unwrap_or(initial_date);
    Ok(((initial_value, initial_date), (current_value, current_date)))
}

impl AssetFields for AccountFields {
    type Asset = BankAccount;

    fn create_input(&self) -> anyhow::Result<BankAccountInput> {
        Ok(BankAccountInput {
            id: self.id.as_deref().map(|id| parse_uuid(id, "id")).transpose()?,
            account_name: require(&self.name, "name")?,
            bank_name: require(&self.bank, "bank")?,
            account_holder_name: require(&self.holder, "holder")?,
            account_number: require(&self.number, "number")?,
            last_balance: require(&self.balance, "balance")?,
            last_balance_date: parse_optional_datetime(self.date.as_deref())?
                .unwrap_or_else(Utc::now),
            status: merge_enum(self.status.as_deref(), BankAccountStatus::Active)?,
        })
    }

    fn update_input(&self, existing: &BankAccount) -> anyhow::Result<BankAccountInput> {
        reject_create_only(&[
            ("id", self.id.is_some()),
            ("balance", self.balance.is_some()),
            ("date", self.date.is_some()),
        ])?;
        Ok(BankAccountInput {
            id: Some(existing.id),
            account_name: merge(&self.name, &existing.account_name),
            bank_name: merge(&self.bank, &existing.bank_name),
            account_holder_name: merge(&self.holder, &existing.account_holder_name),
            account_number: merge(&self.number, &existing.account_number),
            last_balance: existing.last_balance,
            last_balance_date: existing.last_balance_date,
            status: merge_enum(self.status.as_deref(), existing.status)?,
        })
    }
}

impl AssetFields for PropertyFields {
    type Asset = Property;

    fn create_input(&self) -> anyhow::Result<PropertyInput> {
        let purchase_date = parse_datetime(&require(&self.purchase_date, "purchase-date")?)?;
        let ((initial_value, initial_value_date), (current_value, current_value_date)) =
            seed_valuations(&self.valuation, purchase_date)?;
        Ok(PropertyInput {
            id: self.id.as_deref().map(|id| parse_uuid(id, "id")).transpose()?,
            name: require(&self.name, "name")?,
            address: require(&self.address, "address")?,
            total_area: require(&self.total_area, "total-area")?,
            building_area: self.building_area.unwrap_or(0.0),
            area_unit: merge_enum(self.area_unit.as_deref(), PropertyAreaUnit::SquareFeet)?,
            property_type: parse_enum(&require(&self.property_type, "type")?)?,
            title_holder: require(&self.title_holder, "title-holder")?,
            tax_identifier: self.tax_id.clone().unwrap_or_default(),
            purchase_date,
            initial_value,
            initial_value_date,
            current_value,
            current_value_date,
            annual_appreciation_percent: self.appreciation.unwrap_or(0.0),
            status: merge_enum(self.status.as_deref(), PropertyStatus::InUse)?,
        })
    }

    fn update_input(&self, existing: &Property) -> anyhow::Result<PropertyInput> {
        reject_create_only(&[
            ("id", self.id.is_some()),
            ("current-value", self.valuation.current_value.is_some()),
            ("current-date", self.valuation.current_date.is_some()),
        ])?;
        Ok(PropertyInput {
            id: Some(existing.id),
            name: merge(&self.name, &existing.name),
            address: merge(&self.address, &existing.address),
            total_area: merge(&self.total_area, &existing.total_area),
            building_area: merge(&self.building_area, &existing.building_area),
            area_unit: merge_enum(self.area_unit.as_deref(), existing.area_unit)?,
            property_type: merge_enum(self.property_type.as_deref(), existing.property_type)?,
            title_holder: merge(&self.title_holder, &existing.title_holder),
            tax_identifier: merge(&self.tax_id, &existing.tax_identifier),
            purchase_date: parse_optional_datetime(self.purchase_date.as_deref())?
                .unwrap_or(existing.purchase_date),
            initial_value: merge(&self.valuation.initial_value, &existing.initial_value),
            initial_value_date: parse_optional_datetime(self.valuation.initial_date.as_deref())?
                .unwrap_or(existing.initial_value_date),
            current_value: existing.current_value,
            current_value_date: existing.current_value_date,
            annual_appreciation_percent: merge(
                &self.appreciation,
                &existing.annual_appreciation_percent,
            ),
            status: merge_enum(self.status.as_deref(), existing.status)?,
        })
    }
}

impl AssetFields for VehicleFields {
    type Asset = Vehicle;

    fn create_input(&self) -> anyhow::Result<VehicleInput> {
        let purchase_date = parse_datetime(&require(&self.purchase_date, "purchase-date")?)?;
        let ((initial_value, initial_value_date), (current_value, current_value_date)) =
            seed_valuations(&self.valuation, purchase_date)?;
        Ok(VehicleInput {
            id: self.id.as_deref().map(|id| parse_uuid(id, "id")).transpose()?,
            name: require(&self.name, "name")?,
            make: require(&self.make, "make")?,
            model: require(&self.model, "model")?,
            year: require(&self.year, "year")?,
            vehicle_type: parse_enum(&require(&self.vehicle_type, "type")?)?,
            title_holder: self.title_holder.clone().unwrap_or_default(),
            license_plate_number: self.plate.clone().unwrap_or_default(),
            purchase_date,
            initial_value,
            initial_value_date,
            current_value,
            current_value_date,
            annual_depreciation_percent: self.depreciation.unwrap_or(0.0),
            status: merge_enum(self.status.as_deref(), VehicleStatus::InUse)?,
        })
    }

    fn update_input(&self, existing: &Vehicle) -> anyhow::Result<VehicleInput> {
        reject_create_only(&[
            ("id", self.id.is_some()),
            ("current-value", self.valuation.current_value.is_some()),
            ("current-date", self.valuation.current_date.is_some()),
        ])?;
        Ok(VehicleInput {
            id: Some(existing.id),
            name: merge(&self.name, &existing.name),
            make: merge(&self.make, &existing.make),
            model: merge(&self.model, &existing.model),
            year: merge(&self.year, &existing.year),
            vehicle_type: merge_enum(self.vehicle_type.as_deref(), existing.vehicle_type)?,
            title_holder: merge(&self.title_holder, &existing.title_holder),
            license_plate_number: merge(&self.plate, &existing.license_plate_number),
            purchase_date: parse_optional_datetime(self.purchase_date.as_deref())?
                .unwrap_or(existing.purchase_date),
            initial_value: merge(&self.valuation.initial_value, &existing.initial_value),
            initial_value_date: parse_optional_datetime(self.valuation.initial_date.as_deref())?
                .unwrap_or(existing.initial_value_date),
            current_value: existing.current_value,
            current_value_date: existing.current_value_date,
            annual_depreciation_percent: merge(
                &self.depreciation,
                &existing.annual_depreciation_percent,
            ),
            status: merge_enum(self.status.as_deref(), existing.status)?,
        })
    }
}
