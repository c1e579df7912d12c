use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Decimal;
use thiserror::Error;

pub const MAX_MONIKER_LENGTH: usize = 70;
pub const MAX_IDENTITY_LENGTH: usize = 3000;
pub const MAX_WEBSITE_LENGTH: usize = 140;
pub const MAX_SECURITY_CONTACT_LENGTH: usize = 140;
pub const MAX_DETAILS_LENGTH: usize = 280;

/// Errors produced while validating validator metadata and commission rates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("empty description")]
    EmptyDescription,

    #[error("invalid description: {field} length {got} exceeds max {max}")]
    DescriptionTooLong {
        field: &'static str,
        got: usize,
        max: usize,
    },

    #[error("commission max rate {max_rate} cannot exceed 1.0")]
    CommissionMaxRateTooHigh { max_rate: Decimal },

    #[error("commission rate {rate} cannot exceed max rate {max_rate}")]
    CommissionRateAboveMax { rate: Decimal, max_rate: Decimal },

    #[error("commission change rate {max_change_rate} cannot exceed max rate {max_rate}")]
    CommissionChangeRateAboveMax {
        max_change_rate: Decimal,
        max_rate: Decimal,
    },

    #[error("commission rate {rate} cannot be less than the chain minimum {min_rate}")]
    CommissionRateBelowMinimum { rate: Decimal, min_rate: Decimal },
}

/// The bonding state of a validator.
#[cw_serde]
pub enum BondStatus {
    /// Not part of the active set; its stake sits in the not-bonded pool.
    Unbonded,
    /// Leaving the active set; its stake already sits in the not-bonded pool.
    Unbonding,
    /// Part of the active set; its stake sits in the bonded pool.
    Bonded,
}

impl fmt::Display for BondStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BondStatus::Unbonded => "unbonded",
            BondStatus::Unbonding => "unbonding",
            BondStatus::Bonded => "bonded",
        };
        f.write_str(s)
    }
}

/// Human-readable validator metadata.
#[cw_serde]
#[derive(Default)]
pub struct Description {
    pub moniker: String,
    pub identity: String,
    pub website: String,
    pub security_contact: String,
    pub details: String,
}

impl Description {
    /// Reject an all-empty description and any field over its length cap.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.moniker.is_empty()
            && self.identity.is_empty()
            && self.website.is_empty()
            && self.security_contact.is_empty()
            && self.details.is_empty()
        {
            return Err(ValidationError::EmptyDescription);
        }

        let caps = [
            ("moniker", self.moniker.len(), MAX_MONIKER_LENGTH),
            ("identity", self.identity.len(), MAX_IDENTITY_LENGTH),
            ("website", self.website.len(), MAX_WEBSITE_LENGTH),
            (
                "security_contact",
                self.security_contact.len(),
                MAX_SECURITY_CONTACT_LENGTH,
            ),
            ("details", self.details.len(), MAX_DETAILS_LENGTH),
        ];
        for (field, got, max) in caps {
            if got > max {
                return Err(ValidationError::DescriptionTooLong { field, got, max });
            }
        }

        Ok(())
    }
}

/// A validator's commission rate tuple, fixed at creation.
#[cw_serde]
pub struct CommissionRates {
    /// Current commission charged on delegator rewards.
    pub rate: Decimal,
    /// Upper bound `rate` may ever reach.
    pub max_rate: Decimal,
    /// Largest daily increase allowed for `rate`.
    pub max_change_rate: Decimal,
}

impl CommissionRates {
    pub fn new(rate: Decimal, max_rate: Decimal, max_change_rate: Decimal) -> Self {
        CommissionRates {
            rate,
            max_rate,
            max_change_rate,
        }
    }

    /// Validate the tuple against itself and the network-wide minimum rate.
    ///
    /// `Decimal` is unsigned, so the non-negativity half of the [0, 1]
    /// bounds holds by construction.
    pub fn validate(&self, min_rate: Decimal) -> Result<(), ValidationError> {
        if self.max_rate > Decimal::one() {
            return Err(ValidationError::CommissionMaxRateTooHigh {
                max_rate: self.max_rate,
            });
        }
        if self.rate > self.max_rate {
            return Err(ValidationError::CommissionRateAboveMax {
                rate: self.rate,
                max_rate: self.max_rate,
            });
        }
        if self.max_change_rate > self.max_rate {
            return Err(ValidationError::CommissionChangeRateAboveMax {
                max_change_rate: self.max_change_rate,
                max_rate: self.max_rate,
            });
        }
        if self.rate < min_rate {
            return Err(ValidationError::CommissionRateBelowMinimum {
                rate: self.rate,
                min_rate,
            });
        }
        Ok(())
    }
}
