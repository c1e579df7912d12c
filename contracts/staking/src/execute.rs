use cosmwasm_std::{
    coins, Addr, Api, BankMsg, Coin, Decimal, DepsMut, Env, Event, MessageInfo, Order, Response,
    StdError, StdResult, Storage, Uint128,
};
use multistake_common::{BondStatus, CommissionRates, Description};

use crate::error::ContractError;
use crate::pool::{self, Pool};
use crate::state::{
    Delegation, Params, Validator, AUTHORITY, DELEGATIONS, PARAMS, REDELEGATIONS,
    UNBONDING_DELEGATIONS, VALIDATORS,
};

/// Where tokens entering a delegation come from. Fresh deposits arrive
/// with the message; redelegated and cancelled tokens already sit in
/// one of the pools.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TokenSource {
    Liquid,
    Bonded,
    NotBonded,
}

/// Register the sender as a validator operator. The deposit denom must
/// be eligible under the current params and becomes the validator's
/// bond denom for life.
pub fn create_validator(
    deps: DepsMut,
    info: MessageInfo,
    consensus_pubkey: String,
    description: Description,
    commission: CommissionRates,
    min_self_delegation: Uint128,
) -> Result<Response, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    let deposit = one_bond_coin(&info)?;

    if !params.is_bond_denom(&deposit.denom) {
        return Err(ContractError::UnsupportedDenom {
            denom: deposit.denom.clone(),
            eligible: params.bond_denom.clone(),
        });
    }
    if VALIDATORS.has(deps.storage, &info.sender) {
        return Err(ContractError::ValidatorAlreadyExists {
            operator: info.sender.to_string(),
        });
    }

    description.validate()?;
    commission.validate(params.min_commission_rate)?;

    if min_self_delegation.is_zero() {
        return Err(ContractError::InvalidMinSelfDelegation);
    }
    if deposit.amount < min_self_delegation {
        return Err(ContractError::SelfDelegationBelowMinimum {
            deposit: deposit.amount,
            min_self_delegation,
        });
    }

    let mut validator = Validator {
        operator: info.sender.clone(),
        consensus_pubkey,
        bond_denom: deposit.denom.clone(),
        status: BondStatus::Unbonded,
        tokens: Uint128::zero(),
        delegator_shares: Decimal::zero(),
        description,
        commission,
        min_self_delegation,
    };

    // the deposit is the operator's self-delegation
    let shares = perform_delegation(
        deps.storage,
        &info.sender,
        &mut validator,
        deposit.amount,
        TokenSource::Liquid,
    )?;

    Ok(Response::new()
        .add_attribute("action", "create_validator")
        .add_attribute("validator", info.sender.to_string())
        .add_attribute("bond_denom", deposit.denom.clone())
        .add_attribute("amount", deposit.amount.to_string())
        .add_event(
            Event::new("multistake_create_validator")
                .add_attribute("validator", info.sender.to_string())
                .add_attribute("bond_denom", deposit.denom)
                .add_attribute("tokens", deposit.amount.to_string())
                .add_attribute("shares", shares.to_string()),
        ))
}

/// Delegate the sent coin to a validator. Its denom must match the
/// validator's bond denom.
pub fn delegate(
    deps: DepsMut,
    info: MessageInfo,
    validator_address: String,
) -> Result<Response, ContractError> {
    let operator = validated_addr(deps.api, &validator_address)?;
    let mut validator =
        VALIDATORS
            .may_load(deps.storage, &operator)?
            .ok_or(ContractError::ValidatorNotFound {
                operator: validator_address.clone(),
            })?;

    let stake = one_bond_coin(&info)?;
    if stake.denom != validator.bond_denom {
        return Err(ContractError::BondDenomMismatch {
            denom: stake.denom.clone(),
            bond_denom: validator.bond_denom.clone(),
        });
    }

    let shares = perform_delegation(
        deps.storage,
        &info.sender,
        &mut validator,
        stake.amount,
        TokenSource::Liquid,
    )?;

    Ok(Response::new()
        .add_attribute("action", "delegate")
        .add_attribute("delegator", info.sender.to_string())
        .add_attribute("validator", validator_address.clone())
        .add_attribute("amount", stake.to_string())
        .add_event(
            Event::new("multistake_delegate")
                .add_attribute("delegator", info.sender.to_string())
                .add_attribute("validator", validator_address)
                .add_attribute("amount", stake.to_string())
                .add_attribute("shares", shares.to_string()),
        ))
}

/// Begin unbonding `amount` from a validator. The released tokens leave
/// the active stake immediately and mature after the unbonding time.
pub fn undelegate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    validator_address: String,
    amount: Coin,
) -> Result<Response, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    let operator = validated_addr(deps.api, &validator_address)?;
    let mut validator =
        VALIDATORS
            .may_load(deps.storage, &operator)?
            .ok_or(ContractError::ValidatorNotFound {
                operator: validator_address.clone(),
            })?;

    if amount.denom != validator.bond_denom {
        return Err(ContractError::BondDenomMismatch {
            denom: amount.denom.clone(),
            bond_denom: validator.bond_denom.clone(),
        });
    }
    if amount.amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }

    let mut ubd = UNBONDING_DELEGATIONS
        .may_load(deps.storage, (&info.sender, &operator))?
        .unwrap_or_default();
    if ubd.entries.len() >= params.max_entries as usize {
        return Err(ContractError::MaxUnbondingEntries {
            max: params.max_entries,
        });
    }

    let delegation = DELEGATIONS
        .may_load(deps.storage, (&info.sender, &operator))?
        .ok_or(ContractError::DelegationNotFound {
            delegator: info.sender.to_string(),
            validator: validator_address.clone(),
        })?;
    let shares = shares_for_withdrawal(&validator, &delegation, amount.amount)?;
    let released = unbond_shares(deps.storage, &info.sender, &mut validator, shares)?;

    if validator.is_bonded() {
        pool::bonded_to_not_bonded(
            deps.storage,
            &[Coin {
                denom: validator.bond_denom.clone(),
                amount: released,
            }],
        )?;
    }

    let completion_time = env.block.time.plus_seconds(params.unbonding_time_seconds);
    ubd.add_entry(env.block.height, completion_time, released)?;
    UNBONDING_DELEGATIONS.save(deps.storage, (&info.sender, &operator), &ubd)?;

    Ok(Response::new()
        .add_attribute("action", "undelegate")
        .add_attribute("delegator", info.sender.to_string())
        .add_attribute("validator", validator_address.clone())
        .add_attribute("amount", released.to_string())
        .add_attribute("completion_time", completion_time.seconds().to_string())
        .add_event(
            Event::new("multistake_undelegate")
                .add_attribute("delegator", info.sender.to_string())
                .add_attribute("validator", validator_address)
                .add_attribute("denom", validator.bond_denom)
                .add_attribute("amount", released.to_string())
                .add_attribute("creation_height", env.block.height.to_string())
                .add_attribute("completion_time", completion_time.seconds().to_string()),
        ))
}

/// Move `amount` of stake from one validator to another without passing
/// through the unbonding period. Both validators must stake the same
/// denom.
pub fn begin_redelegate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    src_validator_address: String,
    dst_validator_address: String,
    amount: Coin,
) -> Result<Response, ContractError> {
    if src_validator_address == dst_validator_address {
        return Err(ContractError::SelfRedelegation);
    }

    let params = PARAMS.load(deps.storage)?;
    let src_operator = validated_addr(deps.api, &src_validator_address)?;
    let dst_operator = validated_addr(deps.api, &dst_validator_address)?;

    let mut src = VALIDATORS
        .may_load(deps.storage, &src_operator)?
        .ok_or(ContractError::ValidatorNotFound {
            operator: src_validator_address.clone(),
        })?;
    let mut dst = VALIDATORS
        .may_load(deps.storage, &dst_operator)?
        .ok_or(ContractError::ValidatorNotFound {
            operator: dst_validator_address.clone(),
        })?;

    if amount.denom != src.bond_denom {
        return Err(ContractError::BondDenomMismatch {
            denom: amount.denom.clone(),
            bond_denom: src.bond_denom.clone(),
        });
    }
    if amount.amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    if src.bond_denom != dst.bond_denom {
        return Err(ContractError::CrossDenomRedelegation {
            src_denom: src.bond_denom.clone(),
            dst_denom: dst.bond_denom.clone(),
        });
    }

    // no chains: tokens that arrived by redelegation cannot move again
    // until their entry matures
    if has_receiving_redelegation(deps.storage, &info.sender, &src_operator)? {
        return Err(ContractError::TransitiveRedelegation {
            src_validator: src_validator_address.clone(),
        });
    }

    let mut red = REDELEGATIONS
        .may_load(deps.storage, (&info.sender, &src_operator, &dst_operator))?
        .unwrap_or_default();
    if red.entries.len() >= params.max_entries as usize {
        return Err(ContractError::MaxRedelegationEntries {
            max: params.max_entries,
        });
    }

    let delegation = DELEGATIONS
        .may_load(deps.storage, (&info.sender, &src_operator))?
        .ok_or(ContractError::DelegationNotFound {
            delegator: info.sender.to_string(),
            validator: src_validator_address.clone(),
        })?;
    let shares = shares_for_withdrawal(&src, &delegation, amount.amount)?;
    let released = unbond_shares(deps.storage, &info.sender, &mut src, shares)?;

    let source = if src.is_bonded() {
        TokenSource::Bonded
    } else {
        TokenSource::NotBonded
    };
    let shares_dst =
        perform_delegation(deps.storage, &info.sender, &mut dst, released, source)?;

    let completion_time = env.block.time.plus_seconds(params.unbonding_time_seconds);
    red.add_entry(env.block.height, completion_time, released, shares_dst);
    REDELEGATIONS.save(deps.storage, (&info.sender, &src_operator, &dst_operator), &red)?;

    Ok(Response::new()
        .add_attribute("action", "begin_redelegate")
        .add_attribute("delegator", info.sender.to_string())
        .add_attribute("src_validator", src_validator_address.clone())
        .add_attribute("dst_validator", dst_validator_address.clone())
        .add_attribute("amount", released.to_string())
        .add_event(
            Event::new("multistake_redelegate")
                .add_attribute("delegator", info.sender.to_string())
                .add_attribute("src_validator", src_validator_address)
                .add_attribute("dst_validator", dst_validator_address)
                .add_attribute("denom", src.bond_denom)
                .add_attribute("amount", released.to_string())
                .add_attribute("shares_dst", shares_dst.to_string())
                .add_attribute("completion_time", completion_time.seconds().to_string()),
        ))
}

/// Re-delegate part or all of an unbonding entry created at
/// `creation_height` back to its validator.
pub fn cancel_unbonding_delegation(
    deps: DepsMut,
    info: MessageInfo,
    validator_address: String,
    amount: Coin,
    creation_height: u64,
) -> Result<Response, ContractError> {
    if creation_height == 0 {
        return Err(ContractError::InvalidCreationHeight);
    }

    let params = PARAMS.load(deps.storage)?;
    if !params.is_bond_denom(&amount.denom) {
        return Err(ContractError::UnsupportedDenom {
            denom: amount.denom.clone(),
            eligible: params.bond_denom.clone(),
        });
    }
    if amount.amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }

    let operator = validated_addr(deps.api, &validator_address)?;
    let mut validator =
        VALIDATORS
            .may_load(deps.storage, &operator)?
            .ok_or(ContractError::ValidatorNotFound {
                operator: validator_address.clone(),
            })?;
    if amount.denom != validator.bond_denom {
        return Err(ContractError::BondDenomMismatch {
            denom: amount.denom.clone(),
            bond_denom: validator.bond_denom.clone(),
        });
    }

    let mut ubd = UNBONDING_DELEGATIONS
        .may_load(deps.storage, (&info.sender, &operator))?
        .ok_or(ContractError::UnbondingDelegationNotFound {
            delegator: info.sender.to_string(),
            validator: validator_address.clone(),
        })?;

    let index = ubd
        .entries
        .iter()
        .position(|e| e.creation_height == creation_height)
        .ok_or(ContractError::UnbondingEntryNotFound { creation_height })?;

    let entry = &mut ubd.entries[index];
    if amount.amount > entry.balance {
        return Err(ContractError::ExceedsUnbondingBalance {
            amount: amount.amount,
            balance: entry.balance,
        });
    }
    entry.balance -= amount.amount;
    if entry.balance.is_zero() {
        ubd.entries.remove(index);
    }
    if ubd.entries.is_empty() {
        UNBONDING_DELEGATIONS.remove(deps.storage, (&info.sender, &operator));
    } else {
        UNBONDING_DELEGATIONS.save(deps.storage, (&info.sender, &operator), &ubd)?;
    }

    // the cancelled tokens re-enter the delegation out of the
    // not-bonded pool
    let shares = perform_delegation(
        deps.storage,
        &info.sender,
        &mut validator,
        amount.amount,
        TokenSource::NotBonded,
    )?;

    Ok(Response::new()
        .add_attribute("action", "cancel_unbonding_delegation")
        .add_attribute("delegator", info.sender.to_string())
        .add_attribute("validator", validator_address.clone())
        .add_attribute("amount", amount.to_string())
        .add_attribute("creation_height", creation_height.to_string())
        .add_event(
            Event::new("multistake_cancel_unbonding")
                .add_attribute("delegator", info.sender.to_string())
                .add_attribute("validator", validator_address)
                .add_attribute("amount", amount.to_string())
                .add_attribute("creation_height", creation_height.to_string())
                .add_attribute("shares", shares.to_string()),
        ))
}

/// Pay out the sender's matured unbonding entries with a validator.
pub fn complete_unbonding(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    validator_address: String,
) -> Result<Response, ContractError> {
    let operator = validated_addr(deps.api, &validator_address)?;
    let validator =
        VALIDATORS
            .may_load(deps.storage, &operator)?
            .ok_or(ContractError::ValidatorNotFound {
                operator: validator_address.clone(),
            })?;
    let mut ubd = UNBONDING_DELEGATIONS
        .may_load(deps.storage, (&info.sender, &operator))?
        .ok_or(ContractError::UnbondingDelegationNotFound {
            delegator: info.sender.to_string(),
            validator: validator_address.clone(),
        })?;

    let now = env.block.time;
    let mut released = Uint128::zero();
    ubd.entries.retain(|entry| {
        if entry.is_mature(now) {
            released += entry.balance;
            false
        } else {
            true
        }
    });
    if released.is_zero() {
        return Err(ContractError::NoMaturedEntries);
    }

    if ubd.entries.is_empty() {
        UNBONDING_DELEGATIONS.remove(deps.storage, (&info.sender, &operator));
    } else {
        UNBONDING_DELEGATIONS.save(deps.storage, (&info.sender, &operator), &ubd)?;
    }

    let payout = Coin {
        denom: validator.bond_denom.clone(),
        amount: released,
    };
    pool::release(deps.storage, Pool::NotBonded, &payout)?;

    let send_msg = BankMsg::Send {
        to_address: info.sender.to_string(),
        amount: coins(released.u128(), validator.bond_denom.clone()),
    };

    Ok(Response::new()
        .add_message(send_msg)
        .add_attribute("action", "complete_unbonding")
        .add_attribute("delegator", info.sender.to_string())
        .add_attribute("validator", validator_address.clone())
        .add_attribute("amount", payout.to_string())
        .add_event(
            Event::new("multistake_complete_unbonding")
                .add_attribute("delegator", info.sender.to_string())
                .add_attribute("validator", validator_address)
                .add_attribute("amount", payout.to_string()),
        ))
}

/// Drop the sender's matured redelegation entries, unlocking further
/// redelegations out of the destination validator.
pub fn complete_redelegation(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    src_validator_address: String,
    dst_validator_address: String,
) -> Result<Response, ContractError> {
    let src_operator = validated_addr(deps.api, &src_validator_address)?;
    let dst_operator = validated_addr(deps.api, &dst_validator_address)?;

    let mut red = REDELEGATIONS
        .may_load(deps.storage, (&info.sender, &src_operator, &dst_operator))?
        .ok_or(ContractError::RedelegationNotFound {
            delegator: info.sender.to_string(),
            src_validator: src_validator_address.clone(),
            dst_validator: dst_validator_address.clone(),
        })?;

    let now = env.block.time;
    let before = red.entries.len();
    red.entries.retain(|entry| !entry.is_mature(now));
    let completed = before - red.entries.len();
    if completed == 0 {
        return Err(ContractError::NoMaturedRedelegationEntries);
    }

    if red.entries.is_empty() {
        REDELEGATIONS.remove(deps.storage, (&info.sender, &src_operator, &dst_operator));
    } else {
        REDELEGATIONS.save(deps.storage, (&info.sender, &src_operator, &dst_operator), &red)?;
    }

    Ok(Response::new()
        .add_attribute("action", "complete_redelegation")
        .add_attribute("delegator", info.sender.to_string())
        .add_attribute("src_validator", src_validator_address)
        .add_attribute("dst_validator", dst_validator_address)
        .add_attribute("entries_completed", completed.to_string()))
}

/// Promote a validator into the bonded set, moving its whole stake into
/// the bonded pool. Authority only.
pub fn bond_validator(
    deps: DepsMut,
    info: MessageInfo,
    validator_address: String,
) -> Result<Response, ContractError> {
    let authority = AUTHORITY.load(deps.storage)?;
    if info.sender != authority {
        return Err(ContractError::Unauthorized {
            reason: "only the authority can bond validators".to_string(),
        });
    }

    let operator = validated_addr(deps.api, &validator_address)?;
    let mut validator =
        VALIDATORS
            .may_load(deps.storage, &operator)?
            .ok_or(ContractError::ValidatorNotFound {
                operator: validator_address.clone(),
            })?;
    if validator.is_bonded() {
        return Err(ContractError::UnexpectedValidatorStatus {
            operator: validator_address.clone(),
            status: validator.status.to_string(),
            expected: "unbonded or unbonding".to_string(),
        });
    }

    pool::not_bonded_to_bonded(
        deps.storage,
        &[Coin {
            denom: validator.bond_denom.clone(),
            amount: validator.tokens,
        }],
    )?;
    validator.status = BondStatus::Bonded;
    VALIDATORS.save(deps.storage, &operator, &validator)?;

    Ok(Response::new()
        .add_attribute("action", "bond_validator")
        .add_attribute("validator", validator_address.clone())
        .add_event(
            Event::new("multistake_bond_validator")
                .add_attribute("validator", validator_address)
                .add_attribute("tokens", validator.tokens.to_string()),
        ))
}

/// Demote a validator out of the bonded set, moving its whole stake
/// into the not-bonded pool. Authority only.
pub fn unbond_validator(
    deps: DepsMut,
    info: MessageInfo,
    validator_address: String,
) -> Result<Response, ContractError> {
    let authority = AUTHORITY.load(deps.storage)?;
    if info.sender != authority {
        return Err(ContractError::Unauthorized {
            reason: "only the authority can unbond validators".to_string(),
        });
    }

    let operator = validated_addr(deps.api, &validator_address)?;
    let mut validator =
        VALIDATORS
            .may_load(deps.storage, &operator)?
            .ok_or(ContractError::ValidatorNotFound {
                operator: validator_address.clone(),
            })?;
    if !validator.is_bonded() {
        return Err(ContractError::UnexpectedValidatorStatus {
            operator: validator_address.clone(),
            status: validator.status.to_string(),
            expected: BondStatus::Bonded.to_string(),
        });
    }

    pool::bonded_to_not_bonded(
        deps.storage,
        &[Coin {
            denom: validator.bond_denom.clone(),
            amount: validator.tokens,
        }],
    )?;
    validator.status = BondStatus::Unbonding;
    VALIDATORS.save(deps.storage, &operator, &validator)?;

    Ok(Response::new()
        .add_attribute("action", "unbond_validator")
        .add_attribute("validator", validator_address.clone())
        .add_event(
            Event::new("multistake_unbond_validator")
                .add_attribute("validator", validator_address)
                .add_attribute("tokens", validator.tokens.to_string()),
        ))
}

/// Replace the module params. Authority only.
pub fn update_params(
    deps: DepsMut,
    info: MessageInfo,
    params: Params,
) -> Result<Response, ContractError> {
    let authority = AUTHORITY.load(deps.storage)?;
    if info.sender != authority {
        return Err(ContractError::Unauthorized {
            reason: "only the authority can update params".to_string(),
        });
    }

    params.validate()?;
    PARAMS.save(deps.storage, &params)?;

    Ok(Response::new()
        .add_attribute("action", "update_params")
        .add_attribute("bond_denom", params.bond_denom.clone())
        .add_event(
            Event::new("multistake_update_params")
                .add_attribute("bond_denom", params.bond_denom)
                .add_attribute(
                    "unbonding_time_seconds",
                    params.unbonding_time_seconds.to_string(),
                )
                .add_attribute("max_entries", params.max_entries.to_string())
                .add_attribute(
                    "min_commission_rate",
                    params.min_commission_rate.to_string(),
                ),
        ))
}

/// Validate funds: exactly one non-zero coin.
fn one_bond_coin(info: &MessageInfo) -> Result<Coin, ContractError> {
    if info.funds.is_empty() {
        return Err(ContractError::NoFundsSent);
    }
    if info.funds.len() != 1 {
        return Err(ContractError::InvalidFunds);
    }
    let sent = info.funds[0].clone();
    if sent.amount.is_zero() {
        return Err(ContractError::NoFundsSent);
    }
    Ok(sent)
}

fn validated_addr(api: &dyn Api, address: &str) -> Result<Addr, ContractError> {
    api.addr_validate(address)
        .map_err(|err| ContractError::InvalidAddress {
            address: address.to_string(),
            reason: err.to_string(),
        })
}

/// Shared bond path for fresh deposits, redelegations and unbonding
/// cancellations. Issues shares at the validator's current rate, moves
/// pool balances to match the validator's status, and persists both the
/// delegation and the validator.
fn perform_delegation(
    storage: &mut dyn Storage,
    delegator: &Addr,
    validator: &mut Validator,
    amount: Uint128,
    source: TokenSource,
) -> Result<Decimal, ContractError> {
    let coin = Coin {
        denom: validator.bond_denom.clone(),
        amount,
    };
    match (source, validator.is_bonded()) {
        (TokenSource::Liquid, true) => pool::credit(storage, Pool::Bonded, &coin)?,
        (TokenSource::Liquid, false) => pool::credit(storage, Pool::NotBonded, &coin)?,
        (TokenSource::Bonded, false) => pool::bonded_to_not_bonded(storage, &[coin])?,
        (TokenSource::NotBonded, true) => pool::not_bonded_to_bonded(storage, &[coin])?,
        // source pool already matches the validator's status
        (TokenSource::Bonded, true) | (TokenSource::NotBonded, false) => {}
    }

    let issued = validator.add_tokens(amount)?;

    let mut delegation = DELEGATIONS
        .may_load(storage, (delegator, &validator.operator))?
        .unwrap_or(Delegation {
            shares: Decimal::zero(),
        });
    delegation.shares = delegation
        .shares
        .checked_add(issued)
        .map_err(StdError::overflow)?;
    DELEGATIONS.save(storage, (delegator, &validator.operator), &delegation)?;
    VALIDATORS.save(storage, &validator.operator, validator)?;

    Ok(issued)
}

/// Shares to remove so the delegator gives up `amount` tokens. Asking
/// for more than the delegation is worth is an error; asking for
/// exactly its worth always fits because the conversion floors.
fn shares_for_withdrawal(
    validator: &Validator,
    delegation: &Delegation,
    amount: Uint128,
) -> Result<Decimal, ContractError> {
    let shares = validator.shares_from_tokens(amount)?;
    if shares > delegation.shares {
        return Err(ContractError::InsufficientShares {
            shares: delegation.shares,
            needed: shares,
        });
    }
    Ok(shares)
}

/// Remove `shares` from a delegation, dropping the record when it hits
/// zero. Returns the token amount released at the validator's rate.
fn unbond_shares(
    storage: &mut dyn Storage,
    delegator: &Addr,
    validator: &mut Validator,
    shares: Decimal,
) -> Result<Uint128, ContractError> {
    let mut delegation = DELEGATIONS
        .may_load(storage, (delegator, &validator.operator))?
        .ok_or(ContractError::DelegationNotFound {
            delegator: delegator.to_string(),
            validator: validator.operator.to_string(),
        })?;

    if shares > delegation.shares {
        return Err(ContractError::InsufficientShares {
            shares: delegation.shares,
            needed: shares,
        });
    }

    delegation.shares = delegation
        .shares
        .checked_sub(shares)
        .map_err(StdError::overflow)?;
    if delegation.shares.is_zero() {
        DELEGATIONS.remove(storage, (delegator, &validator.operator));
    } else {
        DELEGATIONS.save(storage, (delegator, &validator.operator), &delegation)?;
    }

    let released = validator.remove_del_shares(shares)?;
    VALIDATORS.save(storage, &validator.operator, validator)?;
    Ok(released)
}

/// Whether the delegator has an unmatured redelegation into `validator`.
fn has_receiving_redelegation(
    storage: &dyn Storage,
    delegator: &Addr,
    validator: &Addr,
) -> StdResult<bool> {
    for item in REDELEGATIONS
        .sub_prefix(delegator)
        .range(storage, None, None, Order::Ascending)
    {
        let ((_, dst), red) = item?;
        if dst == *validator && !red.entries.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}
