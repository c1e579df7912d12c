#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{Binary, Deps, DepsMut, Env, MessageInfo, Response};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::query;
use crate::state::{AUTHORITY, PARAMS};

const CONTRACT_NAME: &str = "crates.io:multistake-staking";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let params = msg.params.unwrap_or_default();
    params.validate()?;
    PARAMS.save(deps.storage, &params)?;

    let authority = match msg.authority {
        Some(addr) => deps.api.addr_validate(&addr)?,
        None => info.sender.clone(),
    };
    AUTHORITY.save(deps.storage, &authority)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "multistake-staking")
        .add_attribute("authority", authority.to_string())
        .add_attribute("bond_denom", params.bond_denom))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateValidator {
            consensus_pubkey,
            description,
            commission,
            min_self_delegation,
        } => execute::create_validator(
            deps,
            info,
            consensus_pubkey,
            description,
            commission,
            min_self_delegation,
        ),
        ExecuteMsg::Delegate { validator_address } => {
            execute::delegate(deps, info, validator_address)
        }
        ExecuteMsg::Undelegate {
            validator_address,
            amount,
        } => execute::undelegate(deps, env, info, validator_address, amount),
        ExecuteMsg::BeginRedelegate {
            src_validator_address,
            dst_validator_address,
            amount,
        } => execute::begin_redelegate(
            deps,
            env,
            info,
            src_validator_address,
            dst_validator_address,
            amount,
        ),
        ExecuteMsg::CancelUnbondingDelegation {
            validator_address,
            amount,
            creation_height,
        } => execute::cancel_unbonding_delegation(
            deps,
            info,
            validator_address,
            amount,
            creation_height,
        ),
        ExecuteMsg::CompleteUnbonding { validator_address } => {
            execute::complete_unbonding(deps, env, info, validator_address)
        }
        ExecuteMsg::CompleteRedelegation {
            src_validator_address,
            dst_validator_address,
        } => execute::complete_redelegation(
            deps,
            env,
            info,
            src_validator_address,
            dst_validator_address,
        ),
        ExecuteMsg::BondValidator { validator_address } => {
            execute::bond_validator(deps, info, validator_address)
        }
        ExecuteMsg::UnbondValidator { validator_address } => {
            execute::unbond_validator(deps, info, validator_address)
        }
        ExecuteMsg::UpdateParams { params } => execute::update_params(deps, info, params),
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    match msg {
        QueryMsg::Params {} => query::query_params(deps),
        QueryMsg::BondDenoms {} => query::query_bond_denoms(deps),
        QueryMsg::Validator { address } => query::query_validator(deps, address),
        QueryMsg::Validators { start_after, limit } => {
            query::query_validators(deps, start_after, limit)
        }
        QueryMsg::Delegation {
            delegator_address,
            validator_address,
        } => query::query_delegation(deps, delegator_address, validator_address),
        QueryMsg::UnbondingDelegation {
            delegator_address,
            validator_address,
        } => query::query_unbonding_delegation(deps, delegator_address, validator_address),
        QueryMsg::Redelegation {
            delegator_address,
            src_validator_address,
            dst_validator_address,
        } => query::query_redelegation(
            deps,
            delegator_address,
            src_validator_address,
            dst_validator_address,
        ),
        QueryMsg::Pool {} => query::query_pool(deps),
        QueryMsg::BondedRatio {} => query::query_bonded_ratio(deps),
    }
}
