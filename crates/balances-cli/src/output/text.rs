//! Text and table output formatting.

use std::io::{self, IsTerminal};

use chrono::{DateTime, Timelike, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::{ContentArrangement, Table};

use balances_core::filter::PageInfo;
use balances_core::model::{Asset, BankAccount, Property, ValueEntry, Vehicle};

/// Table columns and detail rows for one asset kind.
pub trait AssetView: Asset {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
    fn details(&self) -> Vec<(&'static str, String)>;
}

pub(crate) fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Date only when the time is midnight.
pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    if date.num_seconds_from_midnight() == 0 && date.nanosecond() == 0 {
        date.format("%Y-%m-%d").to_string()
    } else {
        date.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn render_table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut table = Table::new();
    if io::stdout().is_terminal() {
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
    } else {
        table.load_preset(NOTHING);
    }
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.to_vec());
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

fn page_footer(page_info: &PageInfo) -> String {
    format!(
        "page {}/{} ({} total)",
        page_info.page,
        page_info.page_count.max(1),
        page_info.total_count
    )
}

fn value_rows(values: &[ValueEntry]) -> Vec<Vec<String>> {
    values
        .iter()
        .map(|value| {
            vec![
                value.id.to_string(),
                format_date(&value.date),
                format_amount(value.amount),
                if value.is_deleted() { "deleted" } else { "" }.to_string(),
            ]
        })
        .collect()
}

const VALUE_HEADERS: &[&str] = &["ID", "DATE", "AMOUNT", ""];

pub fn print_asset_list<A: AssetView>(items: &[A], page_info: &PageInfo, quiet: bool) {
    if items.is_empty() {
        if !quiet {
            println!("No {} records found.", A::ENTITY);
        }
        return;
    }
    let rows = items.iter().map(A::row).collect();
    println!("{}", render_table(A::headers(), rows));
    if !quiet {
        println!("{}", page_footer(page_info));
    }
}

pub fn print_asset<A: AssetView>(asset: &A) {
    let mut rows: Vec<Vec<String>> = vec![vec!["id".to_string(), asset.id().to_string()]];
    rows.extend(
        asset
            .details()
            .into_iter()
            .map(|(label, value)| vec![label.to_string(), value]),
    );
    let audit = asset.audit();
    rows.push(vec!["created".to_string(), format_date(&audit.created)]);
    if let Some(updated) = audit.updated {
        rows.push(vec!["updated".to_string(), format_date(&updated)]);
    }
    if let Some(deleted) = audit.deleted {
        rows.push(vec!["deleted".to_string(), format_date(&deleted)]);
    }
    println!("{}", render_table(&[A::ENTITY, ""], rows));

    if !asset.values().is_empty() {
        println!();
        println!("{}", render_table(VALUE_HEADERS, value_rows(asset.values())));
    }
}

pub fn print_value_list(values: &[ValueEntry], page_info: &PageInfo, quiet: bool) {
    if values.is_empty() {
        if !quiet {
            println!("No values found.");
        }
        return;
    }
    println!("{}", render_table(VALUE_HEADERS, value_rows(values)));
    if !quiet {
        println!("{}", page_footer(page_info));
    }
}

pub fn print_value(value: &ValueEntry) {
    let mut rows = vec![
        vec!["id".to_string(), value.id.to_string()],
        vec!["asset".to_string(), value.parent_id.to_string()],
        vec!["date".to_string(), format_date(&value.date)],
        vec!["amount".to_string(), format_amount(value.amount)],
        vec!["created".to_string(), format_date(&value.audit.created)],
    ];
    if let Some(deleted) = value.audit.deleted {
        rows.push(vec!["deleted".to_string(), format_date(&deleted)]);
    }
    println!("{}", render_table(&["Value", ""], rows));
}

impl AssetView for BankAccount {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "BANK", "NUMBER", "BALANCE", "AS OF", "STATUS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.account_name.clone(),
            self.bank_name.clone(),
            self.account_number.clone(),
            format_amount(self.last_balance),
            format_date(&self.last_balance_date),
            self.status.to_string(),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.account_name.clone()),
            ("bank", self.bank_name.clone()),
            ("holder", self.account_holder_name.clone()),
            ("number", self.account_number.clone()),
            ("balance", format_amount(self.last_balance)),
            ("as of", format_date(&self.last_balance_date)),
            ("status", self.status.to_string()),
        ]
    }
}

impl AssetView for Property {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "TYPE", "VALUE", "AS OF", "STATUS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.property_type.to_string(),
            format_amount(self.current_value),
            format_date(&self.current_value_date),
            self.status.to_string(),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("address", self.address.clone()),
            ("type", self.property_type.to_string()),
            (
                "area",
                format!(
                    "{} / {} {}",
                    self.building_area, self.total_area, self.area_unit
                ),
            ),
            ("title holder", self.title_holder.clone()),
            ("tax id", self.tax_identifier.clone()),
            ("purchased", format_date(&self.purchase_date)),
            ("initial value", format_amount(self.initial_value)),
            ("initial date", format_date(&self.initial_value_date)),
            ("value", format_amount(self.current_value)),
            ("as of", format_date(&self.current_value_date)),
            (
                "appreciation",
                format!("{}%", self.annual_appreciation_percent),
            ),
            ("status", self.status.to_string()),
        ]
    }
}

impl AssetView for Vehicle {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "MAKE", "MODEL", "YEAR", "VALUE", "AS OF", "STATUS"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.make.clone(),
            self.model.clone(),
            self.year.to_string(),
            format_amount(self.current_value),
            format_date(&self.current_value_date),
            self.status.to_string(),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("make", self.make.clone()),
            ("model", self.model.clone()),
            ("year", self.year.to_string()),
            ("type", self.vehicle_type.to_string()),
            ("title holder", self.title_holder.clone()),
            ("plate", self.license_plate_number.clone()),
            ("purchased", format_date(&self.purchase_date)),
            ("initial value", format_amount(self.initial_value)),
            ("initial date", format_date(&self.initial_value_date)),
            ("value", format_amount(self.current_value)),
            ("as of", format_date(&self.current_value_date)),
            (
                "depreciation",
                format!("{}%", self.annual_depreciation_percent),
            ),
            ("status", self.status.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date_drops_midnight() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(format_date(&midnight), "2024-01-02");
        let noon = Utc.with_ymd_and_hms(2024, 1, 2, 12, 30, 0).unwrap();
        assert_eq!(format_date(&noon), "2024-01-02 12:30:00");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(68000.0), "68000.00");
        assert_eq!(format_amount(-1.5), "-1.50");
    }

    #[test]
    fn test_page_footer() {
        let info = PageInfo {
            page: 1,
            page_size: 20,
            total_count: 0,
            page_count: 0,
        };
        assert_eq!(page_footer(&info), "page 1/1 (0 total)");
    }
}
