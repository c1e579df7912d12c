//! Integration tests for the multistake staking contract.
//!
//! These tests exercise the contract entry points directly using
//! `cosmwasm_std::testing` mocks, driving full delegation lifecycles
//! through `instantiate` / `execute` / `query`.
//!
//! Run:
//! ```bash
//! cargo test -p multistake-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coin, coins, from_json, Addr, BankMsg, Coin, Decimal, OwnedDeps, SubMsg, Uint128,
};
use multistake_common::{BondStatus, CommissionRates, Description};
use multistake_staking::contract::{execute, instantiate, query};
use multistake_staking::msg::{
    BondedRatioResponse, DelegationResponse, ExecuteMsg, InstantiateMsg, PoolResponse, QueryMsg,
    RedelegationResponse, UnbondingDelegationResponse,
};
use multistake_staking::state::{Params, Validator, DEFAULT_UNBONDING_TIME_SECONDS};
use multistake_staking::ContractError;

// ─── Helpers ───

fn setup(
    deps: &mut OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>,
    bond_denom: &str,
) -> Addr {
    let authority = deps.api.addr_make("authority");
    let msg = InstantiateMsg {
        authority: None,
        params: Some(Params {
            bond_denom: bond_denom.to_string(),
            ..Params::default()
        }),
    };
    let info = message_info(&authority, &[]);
    instantiate(deps.as_mut(), mock_env(), info, msg).unwrap();
    authority
}

fn create_validator(
    deps: &mut OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>,
    operator: &Addr,
    deposit: Coin,
) {
    let msg = ExecuteMsg::CreateValidator {
        consensus_pubkey: "cosmosvalconspub1zcjduepq".to_string(),
        description: Description {
            moniker: format!("node-{}", deposit.denom),
            ..Description::default()
        },
        commission: CommissionRates::new(
            Decimal::percent(5),
            Decimal::percent(20),
            Decimal::percent(1),
        ),
        min_self_delegation: Uint128::one(),
    };
    let info = message_info(operator, &[deposit]);
    execute(deps.as_mut(), mock_env(), info, msg).unwrap();
}

fn bond_validator(
    deps: &mut OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>,
    authority: &Addr,
    operator: &Addr,
) {
    let info = message_info(authority, &[]);
    execute(
        deps.as_mut(),
        mock_env(),
        info,
        ExecuteMsg::BondValidator {
            validator_address: operator.to_string(),
        },
    )
    .unwrap();
}

fn delegate(
    deps: &mut OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>,
    user: &Addr,
    operator: &Addr,
    amount: Coin,
) {
    let info = message_info(user, &[amount]);
    execute(
        deps.as_mut(),
        mock_env(),
        info,
        ExecuteMsg::Delegate {
            validator_address: operator.to_string(),
        },
    )
    .unwrap();
}

fn query_pool(
    deps: &OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>,
) -> PoolResponse {
    from_json(query(deps.as_ref(), mock_env(), QueryMsg::Pool {}).unwrap()).unwrap()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_full_staking_lifecycle() {
    // Create a validator, bond it, delegate, undelegate and finally
    // collect the matured unbonding entry.

    let mut deps = mock_dependencies();
    let authority = setup(&mut deps, "urio");
    let operator = deps.api.addr_make("operator");
    let user = deps.api.addr_make("user");

    // 1. Register and bond a validator with a 1_000_000 self-delegation
    create_validator(&mut deps, &operator, coin(1_000_000, "urio"));
    bond_validator(&mut deps, &authority, &operator);

    // 2. User delegates 500_000
    delegate(&mut deps, &user, &operator, coin(500_000, "urio"));

    let res: DelegationResponse = from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::Delegation {
                delegator_address: user.to_string(),
                validator_address: operator.to_string(),
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(res.shares, Decimal::from_ratio(500_000u128, 1u128));
    assert_eq!(res.balance, coin(500_000, "urio"));

    let pool = query_pool(&deps);
    assert_eq!(pool.bonded, vec![coin(1_500_000, "urio")]);
    assert_eq!(pool.not_bonded, vec![coin(0, "urio")]);

    // 3. User undelegates 200_000; the tokens leave the bonded pool at once
    let env = mock_env();
    let info = message_info(&user, &[]);
    execute(
        deps.as_mut(),
        env.clone(),
        info,
        ExecuteMsg::Undelegate {
            validator_address: operator.to_string(),
            amount: coin(200_000, "urio"),
        },
    )
    .unwrap();

    let pool = query_pool(&deps);
    assert_eq!(pool.bonded, vec![coin(1_300_000, "urio")]);
    assert_eq!(pool.not_bonded, vec![coin(200_000, "urio")]);

    let ubd: UnbondingDelegationResponse = from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::UnbondingDelegation {
                delegator_address: user.to_string(),
                validator_address: operator.to_string(),
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(ubd.entries.len(), 1);
    assert_eq!(ubd.entries[0].balance, Uint128::new(200_000));
    assert_eq!(
        ubd.entries[0].completion_time,
        env.block.time.plus_seconds(DEFAULT_UNBONDING_TIME_SECONDS)
    );

    // 4. Completion is refused while the entry is still maturing
    let info = message_info(&user, &[]);
    let err = execute(
        deps.as_mut(),
        mock_env(),
        info,
        ExecuteMsg::CompleteUnbonding {
            validator_address: operator.to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::NoMaturedEntries));

    // 5. After the unbonding period the balance is paid out
    let mut env = mock_env();
    env.block.time = env.block.time.plus_seconds(DEFAULT_UNBONDING_TIME_SECONDS + 1);
    let info = message_info(&user, &[]);
    let res = execute(
        deps.as_mut(),
        env,
        info,
        ExecuteMsg::CompleteUnbonding {
            validator_address: operator.to_string(),
        },
    )
    .unwrap();
    assert_eq!(
        res.messages,
        vec![SubMsg::new(BankMsg::Send {
            to_address: user.to_string(),
            amount: coins(200_000, "urio"),
        })]
    );

    let pool = query_pool(&deps);
    assert_eq!(pool.bonded, vec![coin(1_300_000, "urio")]);
    assert_eq!(pool.not_bonded, vec![coin(0, "urio")]);

    // 6. The unbonding record is gone
    let err = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::UnbondingDelegation {
            delegator_address: user.to_string(),
            validator_address: operator.to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ContractError::UnbondingDelegationNotFound { .. }
    ));

    eprintln!("test_full_staking_lifecycle passed");
}

#[test]
fn test_multi_denom_staking() {
    // Two validators on two eligible denoms, plus rejection of a coin
    // outside the policy.

    let mut deps = mock_dependencies();
    let authority = setup(&mut deps, "urio,urst");
    let val_rio = deps.api.addr_make("val-rio");
    let val_rst = deps.api.addr_make("val-rst");
    let user = deps.api.addr_make("user");

    let denoms: Vec<String> =
        from_json(query(deps.as_ref(), mock_env(), QueryMsg::BondDenoms {}).unwrap()).unwrap();
    assert_eq!(denoms, vec!["urio", "urst"]);

    // 1. One validator per denom, both bonded
    create_validator(&mut deps, &val_rio, coin(1_000, "urio"));
    create_validator(&mut deps, &val_rst, coin(2_000, "urst"));
    bond_validator(&mut deps, &authority, &val_rio);
    bond_validator(&mut deps, &authority, &val_rst);

    // 2. Delegations land on the matching validator
    delegate(&mut deps, &user, &val_rio, coin(500, "urio"));
    delegate(&mut deps, &user, &val_rst, coin(250, "urst"));

    let pool = query_pool(&deps);
    assert_eq!(pool.bonded, vec![coin(1_500, "urio"), coin(2_250, "urst")]);
    assert_eq!(pool.not_bonded, vec![coin(0, "urio"), coin(0, "urst")]);

    // 3. A validator cannot be created with a coin outside the policy
    let msg = ExecuteMsg::CreateValidator {
        consensus_pubkey: "cosmosvalconspub1zcjduepq".to_string(),
        description: Description {
            moniker: "btc-node".to_string(),
            ..Description::default()
        },
        commission: CommissionRates::new(
            Decimal::percent(5),
            Decimal::percent(20),
            Decimal::percent(1),
        ),
        min_self_delegation: Uint128::one(),
    };
    let outsider = deps.api.addr_make("outsider");
    let info = message_info(&outsider, &coins(1_000, "ubtc"));
    let err = execute(deps.as_mut(), mock_env(), info, msg).unwrap_err();
    assert!(matches!(
        err,
        ContractError::UnsupportedDenom { ref denom, ref eligible }
            if denom == "ubtc" && eligible == "urio,urst"
    ));

    // 4. An eligible denom still has to match the validator's own denom
    let info = message_info(&user, &coins(100, "urst"));
    let err = execute(
        deps.as_mut(),
        mock_env(),
        info,
        ExecuteMsg::Delegate {
            validator_address: val_rio.to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::BondDenomMismatch { .. }));

    // 5. Bonded ratio spans every eligible denom
    deps.querier
        .bank
        .update_balance(deps.api.addr_make("whale-rio"), coins(6_000, "urio"));
    deps.querier
        .bank
        .update_balance(deps.api.addr_make("whale-rst"), coins(9_000, "urst"));

    let res: BondedRatioResponse =
        from_json(query(deps.as_ref(), mock_env(), QueryMsg::BondedRatio {}).unwrap()).unwrap();
    assert_eq!(res.bonded_tokens, Uint128::new(3_750));
    assert_eq!(res.staking_token_supply, Uint128::new(15_000));
    assert_eq!(res.ratio, Decimal::percent(25));

    eprintln!("test_multi_denom_staking passed");
}

#[test]
fn test_redelegation_lifecycle() {
    // Move stake between validators and complete the redelegation once
    // it matures.

    let mut deps = mock_dependencies();
    let authority = setup(&mut deps, "urio");
    let val_a = deps.api.addr_make("val-a");
    let val_b = deps.api.addr_make("val-b");
    let val_c = deps.api.addr_make("val-c");
    let user = deps.api.addr_make("user");

    create_validator(&mut deps, &val_a, coin(1_000, "urio"));
    create_validator(&mut deps, &val_b, coin(1_000, "urio"));
    create_validator(&mut deps, &val_c, coin(1_000, "urio"));
    bond_validator(&mut deps, &authority, &val_a);

    delegate(&mut deps, &user, &val_a, coin(600, "urio"));

    // 1. Redelegate 400 from the bonded val_a to the unbonded val_b
    let info = message_info(&user, &[]);
    execute(
        deps.as_mut(),
        mock_env(),
        info,
        ExecuteMsg::BeginRedelegate {
            src_validator_address: val_a.to_string(),
            dst_validator_address: val_b.to_string(),
            amount: coin(400, "urio"),
        },
    )
    .unwrap();

    let val: Validator = from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::Validator {
                address: val_b.to_string(),
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(val.tokens, Uint128::new(1_400));
    assert_eq!(val.status, BondStatus::Unbonded);

    // src was bonded, dst is not, so the tokens switched pools
    let pool = query_pool(&deps);
    assert_eq!(pool.bonded, vec![coin(1_200, "urio")]);
    assert_eq!(pool.not_bonded, vec![coin(2_400, "urio")]);

    let red: RedelegationResponse = from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::Redelegation {
                delegator_address: user.to_string(),
                src_validator_address: val_a.to_string(),
                dst_validator_address: val_b.to_string(),
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(red.entries.len(), 1);
    assert_eq!(red.entries[0].initial_balance, Uint128::new(400));

    // 2. The freshly arrived stake cannot move on yet
    let info = message_info(&user, &[]);
    let err = execute(
        deps.as_mut(),
        mock_env(),
        info,
        ExecuteMsg::BeginRedelegate {
            src_validator_address: val_b.to_string(),
            dst_validator_address: val_c.to_string(),
            amount: coin(100, "urio"),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::TransitiveRedelegation { .. }));

    // 3. Complete after maturity, then the onward hop is allowed
    let mut env = mock_env();
    env.block.time = env.block.time.plus_seconds(DEFAULT_UNBONDING_TIME_SECONDS + 1);
    let info = message_info(&user, &[]);
    execute(
        deps.as_mut(),
        env.clone(),
        info,
        ExecuteMsg::CompleteRedelegation {
            src_validator_address: val_a.to_string(),
            dst_validator_address: val_b.to_string(),
        },
    )
    .unwrap();

    let err = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::Redelegation {
            delegator_address: user.to_string(),
            src_validator_address: val_a.to_string(),
            dst_validator_address: val_b.to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::RedelegationNotFound { .. }));

    let info = message_info(&user, &[]);
    execute(
        deps.as_mut(),
        env,
        info,
        ExecuteMsg::BeginRedelegate {
            src_validator_address: val_b.to_string(),
            dst_validator_address: val_c.to_string(),
            amount: coin(100, "urio"),
        },
    )
    .unwrap();

    eprintln!("test_redelegation_lifecycle passed");
}

#[test]
fn test_cancel_unbonding_restores_stake() {
    // Cancel part of an unbonding entry, let the rest mature, and check
    // that every token ends up accounted for.

    let mut deps = mock_dependencies();
    let authority = setup(&mut deps, "urio");
    let operator = deps.api.addr_make("operator");
    let user = deps.api.addr_make("user");

    create_validator(&mut deps, &operator, coin(1_000, "urio"));
    bond_validator(&mut deps, &authority, &operator);
    delegate(&mut deps, &user, &operator, coin(500, "urio"));

    // 1. Undelegate 300
    let env = mock_env();
    let info = message_info(&user, &[]);
    execute(
        deps.as_mut(),
        env.clone(),
        info,
        ExecuteMsg::Undelegate {
            validator_address: operator.to_string(),
            amount: coin(300, "urio"),
        },
    )
    .unwrap();

    // 2. Change of heart: 120 of it goes back to the validator
    let info = message_info(&user, &[]);
    execute(
        deps.as_mut(),
        mock_env(),
        info,
        ExecuteMsg::CancelUnbondingDelegation {
            validator_address: operator.to_string(),
            amount: coin(120, "urio"),
            creation_height: env.block.height,
        },
    )
    .unwrap();

    let res: DelegationResponse = from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::Delegation {
                delegator_address: user.to_string(),
                validator_address: operator.to_string(),
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(res.shares, Decimal::from_ratio(320u128, 1u128));

    let pool = query_pool(&deps);
    assert_eq!(pool.bonded, vec![coin(1_320, "urio")]);
    assert_eq!(pool.not_bonded, vec![coin(180, "urio")]);

    // 3. The remaining 180 matures and is paid out
    let mut env = mock_env();
    env.block.time = env.block.time.plus_seconds(DEFAULT_UNBONDING_TIME_SECONDS + 1);
    let info = message_info(&user, &[]);
    let res = execute(
        deps.as_mut(),
        env,
        info,
        ExecuteMsg::CompleteUnbonding {
            validator_address: operator.to_string(),
        },
    )
    .unwrap();
    assert_eq!(
        res.messages,
        vec![SubMsg::new(BankMsg::Send {
            to_address: user.to_string(),
            amount: coins(180, "urio"),
        })]
    );

    let pool = query_pool(&deps);
    assert_eq!(pool.bonded, vec![coin(1_320, "urio")]);
    assert_eq!(pool.not_bonded, vec![coin(0, "urio")]);

    eprintln!("test_cancel_unbonding_restores_stake passed");
}

#[test]
fn test_validator_set_queries() {
    let mut deps = mock_dependencies();
    setup(&mut deps, "urio");

    for (name, deposit) in [("val-1", 100u128), ("val-2", 200), ("val-3", 300)] {
        let operator = deps.api.addr_make(name);
        create_validator(&mut deps, &operator, coin(deposit, "urio"));
    }

    let all: Vec<Validator> = from_json(
        query(
            deps.as_ref(),
            mock_env(),
            QueryMsg::Validators {
                start_after: None,
                limit: None,
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(all.len(), 3);

    // page through one at a time
    let mut seen = Vec::new();
    let mut start_after = None;
    loop {
        let page: Vec<Validator> = from_json(
            query(
                deps.as_ref(),
                mock_env(),
                QueryMsg::Validators {
                    start_after: start_after.clone(),
                    limit: Some(1),
                },
            )
            .unwrap(),
        )
        .unwrap();
        match page.as_slice() {
            [] => break,
            [validator] => {
                start_after = Some(validator.operator.to_string());
                seen.push(validator.operator.clone());
            }
            _ => panic!("limit was ignored"),
        }
    }
    assert_eq!(
        seen,
        all.iter().map(|v| v.operator.clone()).collect::<Vec<_>>()
    );

    let ghost = deps.api.addr_make("ghost");
    let err = query(
        deps.as_ref(),
        mock_env(),
        QueryMsg::Validator {
            address: ghost.to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::ValidatorNotFound { .. }));
}
