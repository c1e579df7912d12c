pub mod denom;
pub mod types;

pub use denom::{is_supported, parse_bond_denom, validate_bond_denom, DenomError};
pub use types::{BondStatus, CommissionRates, Description, ValidationError};
