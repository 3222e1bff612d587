//! Domain model: assets, their value histories and the filter inputs that
//! query them.

use std::fmt;
use std::str::FromStr;

use crate::error::BalancesError;

/// Text-backed enum persisted by its database string.
pub trait DbEnum:
    Copy + fmt::Debug + fmt::Display + FromStr<Err = BalancesError> + Send + Sync + 'static
{
    fn as_db_str(&self) -> &'static str;
}

/// Declare a [`DbEnum`] with its database strings.
///
/// ```ignore
/// db_enum!(VehicleType "vehicle type" {
///     Car => "car",
///     Truck => "truck",
/// });
/// ```
macro_rules! db_enum {
    (
        $(#[$meta:meta])*
        $name:ident $label:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl $crate::model::DbEnum for $name {
            fn as_db_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::model::DbEnum::as_db_str(self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::BalancesError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err($crate::error::BalancesError::bad_request(format!(
                        "invalid {}: {}",
                        $label, other
                    ))),
                }
            }
        }
    };
}

mod asset;
mod audit;
mod bank_account;
mod property;
mod value;
mod vehicle;

pub use asset::{Asset, AssetFilterInput};
pub use audit::Audit;
pub use bank_account::{BankAccount, BankAccountInput, BankAccountStatus};
pub use property::{Property, PropertyAreaUnit, PropertyInput, PropertyStatus, PropertyType};
pub use value::{Snapshot, ValueEntry, ValueFilterInput, ValueInput, ValueTable};
pub use vehicle::{Vehicle, VehicleInput, VehicleStatus, VehicleType};
