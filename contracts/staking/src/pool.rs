use cosmwasm_std::{
    BankMsg, Coin, Decimal, QuerierWrapper, StdError, StdResult, Storage, Uint128,
};
use cw_storage_plus::Map;

use crate::error::ContractError;
use crate::state::{Params, BONDED_POOL, NOT_BONDED_POOL};

/// The two module pools. Every staked token is accounted to exactly one
/// of them: bonded while its validator is in the active set, not-bonded
/// otherwise (including tokens sitting in unbonding entries).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pool {
    Bonded,
    NotBonded,
}

impl Pool {
    pub fn name(&self) -> &'static str {
        match self {
            Pool::Bonded => "bonded",
            Pool::NotBonded => "not_bonded",
        }
    }

    fn map(&self) -> Map<&'static str, Uint128> {
        match self {
            Pool::Bonded => BONDED_POOL,
            Pool::NotBonded => NOT_BONDED_POOL,
        }
    }
}

/// Add `coin` to a pool.
pub fn credit(storage: &mut dyn Storage, pool: Pool, coin: &Coin) -> Result<(), ContractError> {
    if coin.amount.is_zero() {
        return Ok(());
    }
    let balance = pool.map().may_load(storage, &coin.denom)?.unwrap_or_default();
    let updated = balance
        .checked_add(coin.amount)
        .map_err(StdError::overflow)?;
    pool.map().save(storage, &coin.denom, &updated)?;
    Ok(())
}

/// Take `coin` out of a pool. A shortfall here means the books are
/// broken, so the whole transaction is rejected.
pub fn release(storage: &mut dyn Storage, pool: Pool, coin: &Coin) -> Result<(), ContractError> {
    if coin.amount.is_zero() {
        return Ok(());
    }
    let balance = pool.map().may_load(storage, &coin.denom)?.unwrap_or_default();
    if balance < coin.amount {
        return Err(ContractError::InvariantViolation {
            pool: pool.name().to_string(),
            amount: coin.clone(),
            balance,
        });
    }
    pool.map().save(storage, &coin.denom, &(balance - coin.amount))?;
    Ok(())
}

/// Move `coins` from one pool to the other.
pub fn transfer(
    storage: &mut dyn Storage,
    from: Pool,
    to: Pool,
    coins: &[Coin],
) -> Result<(), ContractError> {
    for coin in coins {
        release(storage, from, coin)?;
        credit(storage, to, coin)?;
    }
    Ok(())
}

pub fn bonded_to_not_bonded(
    storage: &mut dyn Storage,
    coins: &[Coin],
) -> Result<(), ContractError> {
    transfer(storage, Pool::Bonded, Pool::NotBonded, coins)
}

pub fn not_bonded_to_bonded(
    storage: &mut dyn Storage,
    coins: &[Coin],
) -> Result<(), ContractError> {
    transfer(storage, Pool::NotBonded, Pool::Bonded, coins)
}

/// Destroy `coin` from a pool, returning the bank burn to attach to the
/// response. A zero amount is a no-op.
pub fn burn(
    storage: &mut dyn Storage,
    pool: Pool,
    coin: &Coin,
) -> Result<Option<BankMsg>, ContractError> {
    if coin.amount.is_zero() {
        return Ok(None);
    }
    let balance = pool.map().may_load(storage, &coin.denom)?.unwrap_or_default();
    if balance < coin.amount {
        return Err(ContractError::InsufficientPoolFunds {
            pool: pool.name().to_string(),
            needed: coin.clone(),
            balance,
        });
    }
    pool.map().save(storage, &coin.denom, &(balance - coin.amount))?;
    Ok(Some(BankMsg::Burn {
        amount: vec![coin.clone()],
    }))
}

pub fn balance(storage: &dyn Storage, pool: Pool, denom: &str) -> StdResult<Uint128> {
    Ok(pool.map().may_load(storage, denom)?.unwrap_or_default())
}

/// Pool balances for every eligible denom, in params order. Denoms with
/// no balance yet are listed at zero.
pub fn balances(
    storage: &dyn Storage,
    pool: Pool,
    params: &Params,
) -> Result<Vec<Coin>, ContractError> {
    let mut coins = vec![];
    for denom in params.bond_denoms()? {
        let amount = balance(storage, pool, &denom)?;
        coins.push(Coin { denom, amount });
    }
    Ok(coins)
}

/// Sum of bonded-pool balances across all eligible denoms.
pub fn total_bonded_tokens(
    storage: &dyn Storage,
    params: &Params,
) -> Result<Uint128, ContractError> {
    let mut total = Uint128::zero();
    for denom in params.bond_denoms()? {
        total += balance(storage, Pool::Bonded, &denom)?;
    }
    Ok(total)
}

/// Combined bank supply of all eligible denoms.
pub fn staking_token_supply(
    querier: &QuerierWrapper,
    params: &Params,
) -> Result<Uint128, ContractError> {
    let mut total = Uint128::zero();
    for denom in params.bond_denoms()? {
        total += querier.query_supply(denom)?.amount;
    }
    Ok(total)
}

/// Fraction of the staking token supply that is bonded. Zero when the
/// supply itself is zero.
pub fn bonded_ratio(
    storage: &dyn Storage,
    querier: &QuerierWrapper,
    params: &Params,
) -> Result<Decimal, ContractError> {
    let supply = staking_token_supply(querier, params)?;
    if supply.is_zero() {
        return Ok(Decimal::zero());
    }
    Ok(Decimal::from_ratio(
        total_bonded_tokens(storage, params)?,
        supply,
    ))
}
