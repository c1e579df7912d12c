use cosmwasm_std::{to_json_binary, Binary, Coin, Deps, Order, StdResult};
use cw_storage_plus::Bound;

use crate::error::ContractError;
use crate::msg::{
    BondedRatioResponse, DelegationResponse, PoolResponse, RedelegationResponse,
    UnbondingDelegationResponse,
};
use crate::pool::{self, Pool};
use crate::state::{
    Validator, DELEGATIONS, PARAMS, REDELEGATIONS, UNBONDING_DELEGATIONS, VALIDATORS,
};

pub fn query_params(deps: Deps) -> Result<Binary, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    Ok(to_json_binary(&params)?)
}

pub fn query_bond_denoms(deps: Deps) -> Result<Binary, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    Ok(to_json_binary(&params.bond_denoms()?)?)
}

pub fn query_validator(deps: Deps, address: String) -> Result<Binary, ContractError> {
    let operator = deps.api.addr_validate(&address)?;
    let validator = VALIDATORS
        .may_load(deps.storage, &operator)?
        .ok_or(ContractError::ValidatorNotFound { operator: address })?;
    Ok(to_json_binary(&validator)?)
}

pub fn query_validators(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> Result<Binary, ContractError> {
    let limit = limit.unwrap_or(50).min(100) as usize;
    let start = start_after.map(|s| Bound::ExclusiveRaw(s.into_bytes()));

    let validators: Vec<Validator> = VALIDATORS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| item.map(|(_, validator)| validator))
        .collect::<StdResult<_>>()?;

    Ok(to_json_binary(&validators)?)
}

pub fn query_delegation(
    deps: Deps,
    delegator_address: String,
    validator_address: String,
) -> Result<Binary, ContractError> {
    let delegator = deps.api.addr_validate(&delegator_address)?;
    let operator = deps.api.addr_validate(&validator_address)?;

    let delegation = DELEGATIONS
        .may_load(deps.storage, (&delegator, &operator))?
        .ok_or(ContractError::DelegationNotFound {
            delegator: delegator_address.clone(),
            validator: validator_address.clone(),
        })?;
    let validator = VALIDATORS
        .may_load(deps.storage, &operator)?
        .ok_or(ContractError::ValidatorNotFound {
            operator: validator_address.clone(),
        })?;

    let balance = Coin {
        denom: validator.bond_denom.clone(),
        amount: validator.tokens_from_shares(delegation.shares)?,
    };
    Ok(to_json_binary(&DelegationResponse {
        delegator_address,
        validator_address,
        shares: delegation.shares,
        balance,
    })?)
}

pub fn query_unbonding_delegation(
    deps: Deps,
    delegator_address: String,
    validator_address: String,
) -> Result<Binary, ContractError> {
    let delegator = deps.api.addr_validate(&delegator_address)?;
    let operator = deps.api.addr_validate(&validator_address)?;

    let ubd = UNBONDING_DELEGATIONS
        .may_load(deps.storage, (&delegator, &operator))?
        .ok_or(ContractError::UnbondingDelegationNotFound {
            delegator: delegator_address.clone(),
            validator: validator_address.clone(),
        })?;

    Ok(to_json_binary(&UnbondingDelegationResponse {
        delegator_address,
        validator_address,
        entries: ubd.entries,
    })?)
}

pub fn query_redelegation(
    deps: Deps,
    delegator_address: String,
    src_validator_address: String,
    dst_validator_address: String,
) -> Result<Binary, ContractError> {
    let delegator = deps.api.addr_validate(&delegator_address)?;
    let src_operator = deps.api.addr_validate(&src_validator_address)?;
    let dst_operator = deps.api.addr_validate(&dst_validator_address)?;

    let red = REDELEGATIONS
        .may_load(deps.storage, (&delegator, &src_operator, &dst_operator))?
        .ok_or(ContractError::RedelegationNotFound {
            delegator: delegator_address.clone(),
            src_validator: src_validator_address.clone(),
            dst_validator: dst_validator_address.clone(),
        })?;

    Ok(to_json_binary(&RedelegationResponse {
        delegator_address,
        src_validator_address,
        dst_validator_address,
        entries: red.entries,
    })?)
}

pub fn query_pool(deps: Deps) -> Result<Binary, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    Ok(to_json_binary(&PoolResponse {
        bonded: pool::balances(deps.storage, Pool::Bonded, &params)?,
        not_bonded: pool::balances(deps.storage, Pool::NotBonded, &params)?,
    })?)
}

pub fn query_bonded_ratio(deps: Deps) -> Result<Binary, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    let ratio = pool::bonded_ratio(deps.storage, &deps.querier, &params)?;
    let bonded_tokens = pool::total_bonded_tokens(deps.storage, &params)?;
    let staking_token_supply = pool::staking_token_supply(&deps.querier, &params)?;

    Ok(to_json_binary(&BondedRatioResponse {
        ratio,
        bonded_tokens,
        staking_token_supply,
    })?)
}
