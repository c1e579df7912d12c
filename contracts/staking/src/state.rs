use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal, StdResult, Timestamp, Uint128, Uint256};
use cw_storage_plus::{Item, Map};
use multistake_common::{denom, BondStatus, CommissionRates, Description};

use crate::error::ContractError;

pub const PARAMS: Item<Params> = Item::new("params");
/// Account allowed to update params and drive validator status transitions.
pub const AUTHORITY: Item<Addr> = Item::new("authority");
pub const VALIDATORS: Map<&Addr, Validator> = Map::new("validators");
pub const DELEGATIONS: Map<(&Addr, &Addr), Delegation> = Map::new("delegations");
pub const UNBONDING_DELEGATIONS: Map<(&Addr, &Addr), UnbondingDelegation> = Map::new("unbondings");
/// Keyed (delegator, src validator, dst validator).
pub const REDELEGATIONS: Map<(&Addr, &Addr, &Addr), Redelegation> = Map::new("redelegations");
/// Per-denom balances of the two stake pools, split out of the contract's
/// single bank balance. Written only through `pool.rs`.
pub const BONDED_POOL: Map<&str, Uint128> = Map::new("bonded_pool");
pub const NOT_BONDED_POOL: Map<&str, Uint128> = Map::new("not_bonded_pool");

pub const DEFAULT_BOND_DENOM: &str = "ustake";
/// 21 days in seconds, the conventional unbonding period.
pub const DEFAULT_UNBONDING_TIME_SECONDS: u64 = 21 * 24 * 60 * 60;
pub const DEFAULT_MAX_ENTRIES: u32 = 7;

#[cw_serde]
pub struct Params {
    /// Comma-separated ordered list of denoms eligible as stake,
    /// e.g. `"urio,urst"`. List order is precedence order.
    pub bond_denom: String,
    /// Seconds an unbonding or redelegation entry takes to mature.
    pub unbonding_time_seconds: u64,
    /// Cap on in-flight unbonding/redelegation entries per pair.
    pub max_entries: u32,
    /// Lowest commission rate a validator may be created with.
    pub min_commission_rate: Decimal,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            bond_denom: DEFAULT_BOND_DENOM.to_string(),
            unbonding_time_seconds: DEFAULT_UNBONDING_TIME_SECONDS,
            max_entries: DEFAULT_MAX_ENTRIES,
            min_commission_rate: Decimal::zero(),
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), ContractError> {
        denom::validate_bond_denom(&self.bond_denom)?;
        if self.unbonding_time_seconds == 0 {
            return Err(ContractError::InvalidParam {
                name: "unbonding_time_seconds",
                reason: "must be positive".to_string(),
            });
        }
        if self.max_entries == 0 {
            return Err(ContractError::InvalidParam {
                name: "max_entries",
                reason: "must be positive".to_string(),
            });
        }
        if self.min_commission_rate > Decimal::one() {
            return Err(ContractError::InvalidParam {
                name: "min_commission_rate",
                reason: "cannot exceed 1.0".to_string(),
            });
        }
        Ok(())
    }

    /// The ordered list of eligible bond denoms.
    pub fn bond_denoms(&self) -> Result<Vec<String>, ContractError> {
        Ok(denom::parse_bond_denom(&self.bond_denom)?)
    }

    /// Whether `d` is currently eligible as stake.
    pub fn is_bond_denom(&self, d: &str) -> bool {
        denom::is_supported(&self.bond_denom, d)
    }
}

#[cw_serde]
pub struct Validator {
    pub operator: Addr,
    /// Opaque consensus public key; format checks live off-chain.
    pub consensus_pubkey: String,
    /// The single eligible denom this validator stakes, fixed at creation.
    pub bond_denom: String,
    pub status: BondStatus,
    /// Total tokens delegated to this validator, in `bond_denom`.
    pub tokens: Uint128,
    /// Total shares issued against `tokens`.
    pub delegator_shares: Decimal,
    pub description: Description,
    pub commission: CommissionRates,
    pub min_self_delegation: Uint128,
}

impl Validator {
    pub fn is_bonded(&self) -> bool {
        self.status == BondStatus::Bonded
    }

    /// Shares issued for `amount` tokens at the current exchange rate,
    /// 1:1 while no shares exist yet.
    pub fn shares_from_tokens(&self, amount: Uint128) -> StdResult<Decimal> {
        if self.delegator_shares.is_zero() || self.tokens.is_zero() {
            // 1:1 rate; the conversion rejects amounts beyond Decimal range
            let atomics = Uint128::try_from(Decimal::one().atomics().full_mul(amount))?;
            return Ok(Decimal::new(atomics));
        }
        // shares * amount / tokens with a 256-bit intermediate
        let atomics = self
            .delegator_shares
            .atomics()
            .full_mul(amount)
            .checked_div(Uint256::from(self.tokens))?;
        Ok(Decimal::new(Uint128::try_from(atomics)?))
    }

    /// Token value of `shares` at the current exchange rate, rounded down.
    ///
    /// Floor rounding on the way out keeps the sum of all delegations'
    /// token values from ever exceeding `tokens`.
    pub fn tokens_from_shares(&self, shares: Decimal) -> StdResult<Uint128> {
        if self.delegator_shares.is_zero() {
            return Ok(Uint128::zero());
        }
        let tokens = shares
            .atomics()
            .full_mul(self.tokens)
            .checked_div(Uint256::from(self.delegator_shares.atomics()))?;
        Ok(Uint128::try_from(tokens)?)
    }

    /// Add newly delegated tokens, returning the shares issued for them.
    pub fn add_tokens(&mut self, amount: Uint128) -> StdResult<Decimal> {
        let issued = self.shares_from_tokens(amount)?;
        self.tokens = self.tokens.checked_add(amount)?;
        self.delegator_shares = self.delegator_shares.checked_add(issued)?;
        Ok(issued)
    }

    /// Remove `shares`, returning the token amount they release (floored).
    ///
    /// Removing the final shares returns every remaining token so no dust
    /// is stranded on the validator.
    pub fn remove_del_shares(&mut self, shares: Decimal) -> StdResult<Uint128> {
        let remaining = self.delegator_shares.checked_sub(shares)?;
        let released = if remaining.is_zero() {
            let all = self.tokens;
            self.tokens = Uint128::zero();
            all
        } else {
            let tokens = self.tokens_from_shares(shares)?;
            self.tokens = self.tokens.checked_sub(tokens)?;
            tokens
        };
        self.delegator_shares = remaining;
        Ok(released)
    }
}

#[cw_serde]
pub struct Delegation {
    pub shares: Decimal,
}

#[cw_serde]
pub struct UnbondingDelegationEntry {
    /// Block height the unbonding was initiated at; partitions entries
    /// of the same pair for cancellation.
    pub creation_height: u64,
    pub completion_time: Timestamp,
    pub initial_balance: Uint128,
    /// Remaining balance; decreases on partial cancellation.
    pub balance: Uint128,
}

impl UnbondingDelegationEntry {
    pub fn is_mature(&self, now: Timestamp) -> bool {
        self.completion_time <= now
    }
}

#[cw_serde]
#[derive(Default)]
pub struct UnbondingDelegation {
    pub entries: Vec<UnbondingDelegationEntry>,
}

impl UnbondingDelegation {
    /// Record `amount` entering unbonding. Entries created at the same
    /// height with the same completion time merge into one.
    pub fn add_entry(
        &mut self,
        creation_height: u64,
        completion_time: Timestamp,
        amount: Uint128,
    ) -> StdResult<()> {
        let existing = self.entries.iter_mut().find(|e| {
            e.creation_height == creation_height && e.completion_time == completion_time
        });
        match existing {
            Some(entry) => {
                entry.initial_balance = entry.initial_balance.checked_add(amount)?;
                entry.balance = entry.balance.checked_add(amount)?;
            }
            None => self.entries.push(UnbondingDelegationEntry {
                creation_height,
                completion_time,
                initial_balance: amount,
                balance: amount,
            }),
        }
        Ok(())
    }
}

#[cw_serde]
pub struct RedelegationEntry {
    pub creation_height: u64,
    pub completion_time: Timestamp,
    /// Token amount moved to the destination validator.
    pub initial_balance: Uint128,
    /// Shares created on the destination validator.
    pub shares_dst: Decimal,
}

impl RedelegationEntry {
    pub fn is_mature(&self, now: Timestamp) -> bool {
        self.completion_time <= now
    }
}

#[cw_serde]
#[derive(Default)]
pub struct Redelegation {
    pub entries: Vec<RedelegationEntry>,
}

impl Redelegation {
    pub fn add_entry(
        &mut self,
        creation_height: u64,
        completion_time: Timestamp,
        balance: Uint128,
        shares_dst: Decimal,
    ) {
        self.entries.push(RedelegationEntry {
            creation_height,
            completion_time,
            initial_balance: balance,
            shares_dst,
        });
    }
}
