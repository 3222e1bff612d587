//! `balances value ...`: history items of any asset kind.

use chrono::Utc;

use balances_core::filter::BaseFilterInput;
use balances_core::model::{Asset, ValueEntry, ValueFilterInput, ValueInput};
use balances_core::{AssetRepository, AssetService};

use crate::app::AppContext;
use crate::cli::{AssetKind, ValueCommand};
use crate::helpers::{confirm, parse_optional_datetime, parse_uuid};
use crate::output::{list_json, print_json, print_value, print_value_list};

impl ValueCommand {
    fn kind(&self) -> AssetKind {
        match self {
            ValueCommand::Add(args) => args.kind,
            ValueCommand::Update(args) => args.kind,
            ValueCommand::Delete(args) => args.kind,
            ValueCommand::List(args) => args.kind,
            ValueCommand::Show(args) => args.kind,
        }
    }
}

pub fn handle_value(ctx: &AppContext, command: &ValueCommand) -> anyhow::Result<()> {
    let services = ctx.services()?;
    match command.kind() {
        AssetKind::Account => run(ctx, &services.bank_accounts, command),
        AssetKind::Property => run(ctx, &services.properties, command),
        AssetKind::Vehicle => run(ctx, &services.vehicles, command),
    }
}

fn run<A, R>(ctx: &AppContext, service: &AssetService<A, R>, command: &ValueCommand) -> anyhow::Result<()>
where
    A: Asset,
    R: AssetRepository<A>,
{
    match command {
        ValueCommand::Add(args) => {
            let parent = parse_uuid(&args.parent, "asset ID")?;
            let date = parse_optional_datetime(args.date.as_deref())?.unwrap_or_else(Utc::now);
            let value = service.create_value(parent, &ValueInput::new(date, args.amount), ctx.actor()?)?;
            report_write::<A>(ctx, &value, "Added")
        }
        ValueCommand::Update(args) => {
            let parent = parse_uuid(&args.parent, "asset ID")?;
            let id = parse_uuid(&args.id, "value ID")?;
            let existing = service.get_value_by_id(id)?;
            let input = ValueInput::new(
                parse_optional_datetime(args.date.as_deref())?.unwrap_or(existing.date),
                args.amount.unwrap_or(existing.amount),
            );
            let value = service.update_value(parent, id, &input, ctx.actor()?)?;
            report_write::<A>(ctx, &value, "Updated")
        }
        ValueCommand::Delete(args) => {
            let id = parse_uuid(&args.id, "value ID")?;
            let actor = ctx.actor()?;
            let prompt = format!("Delete {} {}?", A::VALUE_ENTITY, id);
            if !confirm(&prompt, ctx.cli().yes)? {
                if !ctx.quiet() {
                    println!("Cancelled");
                }
                return Ok(());
            }
            let value = service.delete_value(id, actor)?;
            report_write::<A>(ctx, &value, "Deleted")
        }
        ValueCommand::List(args) => {
            let parent_ids = args
                .parents
                .iter()
                .map(|id| parse_uuid(id, "asset ID"))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let input = ValueFilterInput {
                base: BaseFilterInput {
                    include_deleted: args.include_deleted,
                    page: args.page,
                    page_size: Some(ctx.page_size(args.page_size)?),
                    ..Default::default()
                },
                parent_ids: (!parent_ids.is_empty()).then_some(parent_ids),
                start_date: parse_optional_datetime(args.since.as_deref())?,
                end_date: parse_optional_datetime(args.until.as_deref())?,
                amount_min: args.min,
                amount_max: args.max,
            };
            let (values, page_info) = service.get_values_by_filter(&input)?;
            if ctx.json() {
                print_json(&list_json(&values, &page_info)?)
            } else {
                print_value_list(&values, &page_info, ctx.quiet());
                Ok(())
            }
        }
        ValueCommand::Show(args) => {
            let value = service.get_value_by_id(parse_uuid(&args.id, "value ID")?)?;
            if ctx.json() {
                print_json(&value)
            } else {
                print_value(&value);
                Ok(())
            }
        }
    }
}

fn report_write<A: Asset>(ctx: &AppContext, value: &ValueEntry, verb: &str) -> anyhow::Result<()> {
    if ctx.json() {
        return print_json(value);
    }
    if ctx.quiet() {
        println!("{}", value.id);
    } else {
        println!("{} {} {}", verb, A::VALUE_ENTITY, value.id);
    }
    Ok(())
}
