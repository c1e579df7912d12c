use cosmwasm_std::{Coin, Decimal, StdError, Uint128};
use multistake_common::{DenomError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Denom(#[from] DenomError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid param {name}: {reason}")]
    InvalidParam { name: &'static str, reason: String },

    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("no bond coin sent")]
    NoFundsSent,

    #[error("must send exactly one coin")]
    InvalidFunds,

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("denom {denom} is not an eligible bond denom (eligible: {eligible})")]
    UnsupportedDenom { denom: String, eligible: String },

    #[error("coin denom {denom} does not match validator bond denom {bond_denom}")]
    BondDenomMismatch { denom: String, bond_denom: String },

    #[error("validator {operator} already exists")]
    ValidatorAlreadyExists { operator: String },

    #[error("validator {operator} not found")]
    ValidatorNotFound { operator: String },

    #[error("no delegation of {delegator} with validator {validator}")]
    DelegationNotFound { delegator: String, validator: String },

    #[error("no unbonding delegation of {delegator} with validator {validator}")]
    UnbondingDelegationNotFound { delegator: String, validator: String },

    #[error("no unbonding delegation entry at creation height {creation_height}")]
    UnbondingEntryNotFound { creation_height: u64 },

    #[error("no redelegation of {delegator} from {src_validator} to {dst_validator}")]
    RedelegationNotFound {
        delegator: String,
        src_validator: String,
        dst_validator: String,
    },

    #[error("creation height must be positive")]
    InvalidCreationHeight,

    #[error("amount {amount} exceeds unbonding entry balance {balance}")]
    ExceedsUnbondingBalance { amount: Uint128, balance: Uint128 },

    #[error("not enough delegation shares: have {shares}, need {needed}")]
    InsufficientShares { shares: Decimal, needed: Decimal },

    #[error("minimum self delegation must be positive")]
    InvalidMinSelfDelegation,

    #[error("initial deposit {deposit} is below the minimum self delegation {min_self_delegation}")]
    SelfDelegationBelowMinimum {
        deposit: Uint128,
        min_self_delegation: Uint128,
    },

    #[error("cannot redelegate to the same validator")]
    SelfRedelegation,

    #[error("cannot redelegate from {src_validator} while it is receiving a redelegation for this delegator")]
    TransitiveRedelegation { src_validator: String },

    #[error("cannot redelegate between bond denoms {src_denom} and {dst_denom}")]
    CrossDenomRedelegation { src_denom: String, dst_denom: String },

    #[error("too many unbonding delegation entries for this delegator-validator pair (max {max})")]
    MaxUnbondingEntries { max: u32 },

    #[error("too many redelegation entries for this delegator-validator pair (max {max})")]
    MaxRedelegationEntries { max: u32 },

    #[error("validator {operator} has status {status}, expected {expected}")]
    UnexpectedValidatorStatus {
        operator: String,
        status: String,
        expected: String,
    },

    #[error("no unbonding delegation entries have matured yet")]
    NoMaturedEntries,

    #[error("no redelegation entries have matured yet")]
    NoMaturedRedelegationEntries,

    #[error("insufficient funds in the {pool} pool: need {needed}, balance is {balance}")]
    InsufficientPoolFunds {
        pool: String,
        needed: Coin,
        balance: Uint128,
    },

    #[error("pool invariant violated: cannot move {amount} out of the {pool} pool (balance {balance})")]
    InvariantViolation {
        pool: String,
        amount: Coin,
        balance: Uint128,
    },
}
