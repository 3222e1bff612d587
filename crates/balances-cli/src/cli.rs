use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use balances_core::VERSION;

/// Balances - track the value history of bank accounts, properties and vehicles
#[derive(Parser)]
#[command(name = "balances")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, global = true, env = "BALANCES_DATABASE")]
    pub database: Option<String>,

    /// Path to the config file
    #[arg(long, global = true, env = "BALANCES_CONFIG")]
    pub config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Skip confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the config file and create the database
    Init(InitArgs),

    /// Bank accounts and their balances
    #[command(subcommand)]
    Account(AccountCommand),

    /// Properties and their valuations
    #[command(subcommand)]
    Property(PropertyCommand),

    /// Vehicles and their valuations
    #[command(subcommand)]
    Vehicle(VehicleCommand),

    /// History items of any asset kind
    #[command(subcommand)]
    Value(ValueCommand),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Database path to record in the config (defaults to the XDG data dir)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Actor id recorded in audit columns (generated when omitted)
    #[arg(long)]
    pub user: Option<String>,

    /// Default page size for list commands
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AssetKind {
    Account,
    Property,
    Vehicle,
}

/// Arguments shared by the asset `list` commands
#[derive(Args)]
pub struct ListArgs {
    /// Match against the kind's searchable columns
    #[arg(long)]
    pub keyword: Option<String>,

    /// Filter by status
    #[arg(long)]
    pub status: Option<String>,

    /// Include soft-deleted records
    #[arg(long)]
    pub include_deleted: bool,

    /// Page number (from 1)
    #[arg(long)]
    pub page: Option<u32>,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<u32>,
}

/// Arguments for the asset `show` commands
#[derive(Args)]
pub struct ShowArgs {
    /// Record ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Attach value history
    #[arg(long)]
    pub values: bool,

    /// History start date (ISO-8601 or YYYY-MM-DD)
    #[arg(long, requires = "values")]
    pub since: Option<String>,

    /// History end date (ISO-8601 or YYYY-MM-DD)
    #[arg(long, requires = "values")]
    pub until: Option<String>,

    /// History items to attach
    #[arg(long, requires = "values")]
    pub limit: Option<u32>,
}

/// Arguments for the asset `delete` commands
#[derive(Args)]
pub struct DeleteArgs {
    /// Record ID (full UUID)
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Bank account fields. Required on `create`, optional on `update`.
#[derive(Args)]
pub struct AccountFields {
    /// Client-chosen id (create only)
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub bank: Option<String>,
    #[arg(long)]
    pub holder: Option<String>,
    #[arg(long)]
    pub number: Option<String>,
    /// Opening balance (create only)
    #[arg(long, allow_negative_numbers = true)]
    pub balance: Option<f64>,
    /// Date of the opening balance (create only)
    #[arg(long)]
    pub date: Option<String>,
    /// active | inactive
    #[arg(long)]
    pub status: Option<String>,
}

/// Property fields. Required on `create`, optional on `update`.
#[derive(Args)]
pub struct PropertyFields {
    /// Client-chosen id (create only)
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub total_area: Option<f64>,
    #[arg(long)]
    pub building_area: Option<f64>,
    /// sqft | sqm
    #[arg(long)]
    pub area_unit: Option<String>,
    /// land | house | apartment
    #[arg(long = "type")]
    pub property_type: Option<String>,
    #[arg(long)]
    pub title_holder: Option<String>,
    #[arg(long)]
    pub tax_id: Option<String>,
    #[arg(long)]
    pub purchase_date: Option<String>,
    #[command(flatten)]
    pub valuation: ValuationFields,
    #[arg(long, allow_negative_numbers = true)]
    pub appreciation: Option<f64>,
    /// in_use | not_in_use | rented | sold
    #[arg(long)]
    pub status: Option<String>,
}

/// Vehicle fields. Required on `create`, optional on `update`.
#[derive(Args)]
pub struct VehicleFields {
    /// Client-chosen id (create only)
    #[arg(long)]
    pub id: Option<String>,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub make: Option<String>,
    #[arg(long)]
    pub model: Option<String>,
    #[arg(long)]
    pub year: Option<i32>,
    /// car | truck | bicycle | other
    #[arg(long = "type")]
    pub vehicle_type: Option<String>,
    #[arg(long)]
    pub title_holder: Option<String>,
    #[arg(long)]
    pub plate: Option<String>,
    #[arg(long)]
    pub purchase_date: Option<String>,
    #[command(flatten)]
    pub valuation: ValuationFields,
    #[arg(long, allow_negative_numbers = true)]
    pub depreciation: Option<f64>,
    /// in_use | retired | sold
    #[arg(long)]
    pub status: Option<String>,
}

/// Seed valuations for properties and vehicles (create only).
#[derive(Args)]
pub struct ValuationFields {
    #[arg(long)]
    pub initial_value: Option<f64>,
    #[arg(long)]
    pub initial_date: Option<String>,
    /// Defaults to the initial value
    #[arg(long)]
    pub current_value: Option<f64>,
    /// Defaults to the initial date
    #[arg(long)]
    pub current_date: Option<String>,
}

#[derive(Subcommand)]
pub enum AccountCommand {
    /// Create a bank account with its opening balance
    Create(AccountFields),
    /// List bank accounts
    List(ListArgs),
    /// Show a bank account
    Show(ShowArgs),
    /// Update descriptive fields or status
    Update {
        #[arg(value_name = "ID")]
        target: String,
        #[command(flatten)]
        fields: AccountFields,
    },
    /// Delete a bank account and its balances
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
pub enum PropertyCommand {
    /// Create a property with its seed valuations
    Create(PropertyFields),
    /// List properties
    List(ListArgs),
    /// Show a property
    Show(ShowArgs),
    /// Update descriptive fields or status
    Update {
        #[arg(value_name = "ID")]
        target: String,
        #[command(flatten)]
        fields: PropertyFields,
    },
    /// Delete a property and its valuations
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
pub enum VehicleCommand {
    /// Create a vehicle with its seed valuations
    Create(VehicleFields),
    /// List vehicles
    List(ListArgs),
    /// Show a vehicle
    Show(ShowArgs),
    /// Update descriptive fields or status
    Update {
        #[arg(value_name = "ID")]
        target: String,
        #[command(flatten)]
        fields: VehicleFields,
    },
    /// Delete a vehicle and its valuations
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
pub enum ValueCommand {
    /// Record a value for an asset
    Add(ValueAddArgs),
    /// Change the date or amount of a value
    Update(ValueUpdateArgs),
    /// Delete a value
    Delete(ValueDeleteArgs),
    /// List values
    List(ValueListArgs),
    /// Show a value
    Show(ValueShowArgs),
}

#[derive(Args)]
pub struct ValueAddArgs {
    #[arg(long, value_enum)]
    pub kind: AssetKind,
    /// Asset ID
    #[arg(value_name = "ASSET_ID")]
    pub parent: String,
    #[arg(long, allow_negative_numbers = true)]
    pub amount: f64,
    /// Defaults to now
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct ValueUpdateArgs {
    #[arg(long, value_enum)]
    pub kind: AssetKind,
    /// Asset ID
    #[arg(value_name = "ASSET_ID")]
    pub parent: String,
    /// Value ID
    #[arg(value_name = "VALUE_ID")]
    pub id: String,
    /// Defaults to the current amount
    #[arg(long, allow_negative_numbers = true)]
    pub amount: Option<f64>,
    /// Defaults to the current date
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct ValueDeleteArgs {
    #[arg(long, value_enum)]
    pub kind: AssetKind,
    /// Value ID
    #[arg(value_name = "VALUE_ID")]
    pub id: String,
}

#[derive(Args)]
pub struct ValueShowArgs {
    #[arg(long, value_enum)]
    pub kind: AssetKind,
    /// Value ID
    #[arg(value_name = "VALUE_ID")]
    pub id: String,
}

#[derive(Args)]
pub struct ValueListArgs {
    #[arg(long, value_enum)]
    pub kind: AssetKind,
    /// Restrict to these assets
    #[arg(value_name = "ASSET_ID")]
    pub parents: Vec<String>,
    /// Start date (ISO-8601 or YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,
    /// End date (ISO-8601 or YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub min: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub max: Option<f64>,
    /// Include soft-deleted values
    #[arg(long)]
    pub include_deleted: bool,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub page_size: Option<u32>,
}
