use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Coin, Decimal, Uint128};
use multistake_common::{CommissionRates, Description};

use crate::state::{Params, RedelegationEntry, UnbondingDelegationEntry, Validator};

#[cw_serde]
#[derive(Default)]
pub struct InstantiateMsg {
    /// Account allowed to update params and move validators between
    /// bonded and unbonded. Defaults to the instantiator.
    pub authority: Option<String>,
    /// Initial params. Defaults apply when omitted.
    pub params: Option<Params>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Register the sender as a validator operator. Send the initial
    /// self-delegation in info.funds; its denom becomes the validator's
    /// bond denom and must be eligible under the current params.
    CreateValidator {
        consensus_pubkey: String,
        description: Description,
        commission: CommissionRates,
        min_self_delegation: Uint128,
    },
    /// Delegate to a validator. Send the stake in info.funds; its denom
    /// must match the validator's bond denom.
    Delegate { validator_address: String },
    /// Begin unbonding `amount` from a validator. The tokens mature
    /// after the unbonding time.
    Undelegate {
        validator_address: String,
        amount: Coin,
    },
    /// Move `amount` of stake from one validator to another without
    /// passing through the unbonding period.
    BeginRedelegate {
        src_validator_address: String,
        dst_validator_address: String,
        amount: Coin,
    },
    /// Re-delegate part or all of an unbonding entry created at
    /// `creation_height` back to the validator.
    CancelUnbondingDelegation {
        validator_address: String,
        amount: Coin,
        creation_height: u64,
    },
    /// Pay out the sender's matured unbonding entries for a validator.
    CompleteUnbonding { validator_address: String },
    /// Drop the sender's matured redelegation entries, unlocking
    /// further redelegations out of the destination.
    CompleteRedelegation {
        src_validator_address: String,
        dst_validator_address: String,
    },
    /// Promote a validator into the bonded set, moving its tokens into
    /// the bonded pool. Authority only.
    BondValidator { validator_address: String },
    /// Demote a validator out of the bonded set, moving its tokens into
    /// the not-bonded pool. Authority only.
    UnbondValidator { validator_address: String },
    /// Replace the module params. Authority only.
    UpdateParams { params: Params },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Params)]
    Params {},
    /// Eligible bond denoms in precedence order.
    #[returns(Vec<String>)]
    BondDenoms {},
    #[returns(Validator)]
    Validator { address: String },
    #[returns(Vec<Validator>)]
    Validators {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(DelegationResponse)]
    Delegation {
        delegator_address: String,
        validator_address: String,
    },
    #[returns(UnbondingDelegationResponse)]
    UnbondingDelegation {
        delegator_address: String,
        validator_address: String,
    },
    #[returns(RedelegationResponse)]
    Redelegation {
        delegator_address: String,
        src_validator_address: String,
        dst_validator_address: String,
    },
    /// Per-denom balances of the bonded and not-bonded pools.
    #[returns(PoolResponse)]
    Pool {},
    /// Bonded tokens as a fraction of the staking token supply.
    #[returns(BondedRatioResponse)]
    BondedRatio {},
}

#[cw_serde]
pub struct DelegationResponse {
    pub delegator_address: String,
    pub validator_address: String,
    pub shares: Decimal,
    /// Token value of the shares at the validator's current rate.
    pub balance: Coin,
}

#[cw_serde]
pub struct UnbondingDelegationResponse {
    pub delegator_address: String,
    pub validator_address: String,
    pub entries: Vec<UnbondingDelegationEntry>,
}

#[cw_serde]
pub struct RedelegationResponse {
    pub delegator_address: String,
    pub src_validator_address: String,
    pub dst_validator_address: String,
    pub entries: Vec<RedelegationEntry>,
}

#[cw_serde]
pub struct PoolResponse {
    pub bonded: Vec<Coin>,
    pub not_bonded: Vec<Coin>,
}

#[cw_serde]
pub struct BondedRatioResponse {
    pub ratio: Decimal,
    pub bonded_tokens: Uint128,
    pub staking_token_supply: Uint128,
}
