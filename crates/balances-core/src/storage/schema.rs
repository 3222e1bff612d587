//! Embedded schema.
//!
//! Timestamps are fixed-width RFC 3339 text so that string comparison orders
//! them chronologically. Identifiers are hyphenated UUID text.

pub const SCHEMA_VERSION: i64 = 1;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS bank_accounts (
    entity_id TEXT PRIMARY KEY,
    account_name TEXT NOT NULL,
    bank_name TEXT NOT NULL,
    account_holder_name TEXT NOT NULL,
    account_number TEXT NOT NULL,
    last_balance REAL NOT NULL,
    last_balance_date TEXT NOT NULL,
    status TEXT NOT NULL,
    created TEXT NOT NULL,
    created_by TEXT NOT NULL,
    updated TEXT,
    updated_by TEXT,
    deleted TEXT,
    deleted_by TEXT
);

CREATE TABLE IF NOT EXISTS bank_account_balances (
    entity_id TEXT PRIMARY KEY,
    bank_account_entity_id TEXT NOT NULL REFERENCES bank_accounts(entity_id),
    date TEXT NOT NULL,
    balance REAL NOT NULL,
    created TEXT NOT NULL,
    created_by TEXT NOT NULL,
    updated TEXT,
    updated_by TEXT,
    deleted TEXT,
    deleted_by TEXT
);

CREATE INDEX IF NOT EXISTS idx_bank_account_balances_parent_date
    ON bank_account_balances(bank_account_entity_id, date);

CREATE TABLE IF NOT EXISTS properties (
    entity_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    total_area REAL NOT NULL,
    building_area REAL NOT NULL,
    area_unit TEXT NOT NULL,
    type TEXT NOT NULL,
    title_holder TEXT NOT NULL,
    tax_identifier TEXT NOT NULL,
    purchase_date TEXT NOT NULL,
    initial_value REAL NOT NULL,
    initial_value_date TEXT NOT NULL,
    current_value REAL NOT NULL,
    current_value_date TEXT NOT NULL,
    annual_appreciation_percent REAL NOT NULL,
    status TEXT NOT NULL,
    created TEXT NOT NULL,
    created_by TEXT NOT NULL,
    updated TEXT,
    updated_by TEXT,
    deleted TEXT,
    deleted_by TEXT
);

CREATE TABLE IF NOT EXISTS property_values (
    entity_id TEXT PRIMARY KEY,
    property_entity_id TEXT NOT NULL REFERENCES properties(entity_id),
    date TEXT NOT NULL,
    value REAL NOT NULL,
    created TEXT NOT NULL,
    created_by TEXT NOT NULL,
    updated TEXT,
    updated_by TEXT,
    deleted TEXT,
    deleted_by TEXT
);

CREATE INDEX IF NOT EXISTS idx_property_values_parent_date
    ON property_values(property_entity_id, date);

CREATE TABLE IF NOT EXISTS vehicles (
    entity_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    make TEXT NOT NULL,
    model TEXT NOT NULL,
    year INTEGER NOT NULL,
    type TEXT NOT NULL,
    title_holder TEXT NOT NULL,
    license_plate_number TEXT NOT NULL,
    purchase_date TEXT NOT NULL,
    initial_value REAL NOT NULL,
    initial_value_date TEXT NOT NULL,
    current_value REAL NOT NULL,
    current_value_date TEXT NOT NULL,
    annual_depreciation_percent REAL NOT NULL,
    status TEXT NOT NULL,
    created TEXT NOT NULL,
    created_by TEXT NOT NULL,
    updated TEXT,
    updated_by TEXT,
    deleted TEXT,
    deleted_by TEXT
);

CREATE TABLE IF NOT EXISTS vehicle_values (
    entity_id TEXT PRIMARY KEY,
    vehicle_entity_id TEXT NOT NULL REFERENCES vehicles(entity_id),
    date TEXT NOT NULL,
    value REAL NOT NULL,
    created TEXT NOT NULL,
    created_by TEXT NOT NULL,
    updated TEXT,
    updated_by TEXT,
    deleted TEXT,
    deleted_by TEXT
);

CREATE INDEX IF NOT EXISTS idx_vehicle_values_parent_date
    ON vehicle_values(vehicle_entity_id, date);
"#;
