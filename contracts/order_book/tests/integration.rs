#![cfg(not(tarpaulin_include))]

use cosmwasm_std::{
    attr, entry_point, to_binary, Addr, BankMsg, Binary, Coin, Deps, DepsMut, Env, MessageInfo,
    Response, StdError, StdResult, Uint128,
};
use cw_multi_test::{App, ContractWrapper, Executor};

use gridiron_limit_order_amm_adapter::{Asset, AssetInfo, PoolExecuteMsg, PoolQueryMsg, PoolResponse};
use gridiron_limit_order_book::contract::{execute, instantiate, migrate, reply};
use gridiron_limit_order_book::msg::{ConfigResponse, ExecuteMsg, InstantiateMsg, QueryMsg};
use gridiron_limit_order_book::query::query as order_book_query;
use gridiron_limit_order_types::{Order, OrderStatus};

const OWNER: &str = "owner";
const EXECUTOR: &str = "executor";

/// A minimal stand-in for a real AMM pair: holds two fixed reserves and a
/// `swap_factor` knob so tests can move the simulated spot price without a
/// second contract-store round trip. `to` always receives the output; there
/// is no slippage curve here, only `min_out` enforcement, since exercising
/// the order book's own logic is the point, not reinventing constant-product
/// math.
mod mock_pool {
    use super::*;

    #[cosmwasm_schema::cw_serde]
    pub struct InstantiateMsg {
        pub assets: [Asset; 2],
        /// out = in * num / denom, applied to whichever asset is offered.
        pub rate_num: u128,
        pub rate_denom: u128,
    }

    #[cosmwasm_schema::cw_serde]
    pub struct State {
        pub assets: [Asset; 2],
        pub rate_num: u128,
        pub rate_denom: u128,
    }

    const STATE: cw_storage_plus::Item<State> = cw_storage_plus::Item::new("mock_pool_state");

    #[entry_point]
    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        STATE.save(
            deps.storage,
            &State {
                assets: msg.assets,
                rate_num: msg.rate_num,
                rate_denom: msg.rate_denom,
            },
        )?;
        Ok(Response::new())
    }

    #[entry_point]
    pub fn execute(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: PoolExecuteMsg,
    ) -> StdResult<Response> {
        let state = STATE.load(deps.storage)?;

        match msg {
            PoolExecuteMsg::Swap {
                offer_asset,
                min_out,
                to,
            } => {
                let return_amount = Uint128::new(
                    offer_asset.amount.u128() * state.rate_num / state.rate_denom,
                );

                if return_amount < min_out {
                    return Err(StdError::generic_err("min_out not met"));
                }

                let ask_denom = state
                    .assets
                    .iter()
                    .find(|a| a.info != offer_asset.info)
                    .and_then(|a| match &a.info {
                        AssetInfo::NativeToken { denom } => Some(denom.clone()),
                        AssetInfo::Token { .. } => None,
                    })
                    .ok_or_else(|| StdError::generic_err("ask asset is not native"))?;

                let recipient = to.unwrap_or_default();
                Ok(Response::new()
                    .add_message(BankMsg::Send {
                        to_address: recipient.clone(),
                        amount: vec![Coin {
                            denom: ask_denom,
                            amount: return_amount,
                        }],
                    })
                    .add_attributes(vec![
                        attr("action", "swap"),
                        attr("receiver", recipient),
                        attr("return_amount", return_amount.to_string()),
                    ]))
            }
            // This mock only stands in for a native-offer pool; every order
            // book test here whitelists native denoms only, so a CW20 offer
            // never reaches it.
            PoolExecuteMsg::Receive(_) => {
                Err(StdError::generic_err("mock pool does not support cw20 offers"))
            }
        }
    }

    #[entry_point]
    pub fn query(deps: Deps, _env: Env, msg: PoolQueryMsg) -> StdResult<Binary> {
        match msg {
            PoolQueryMsg::Pool {} => {
                let state = STATE.load(deps.storage)?;
                to_binary(&PoolResponse {
                    assets: state.assets,
                    total_share: Uint128::new(1),
                })
            }
        }
    }
}

fn mock_app(owner: Addr, coins: Vec<Coin>) -> App {
    App::new(|router, _, storage| {
        router.bank.init_balance(storage, &owner, coins).unwrap()
    })
}

fn uusdc() -> AssetInfo {
    AssetInfo::NativeToken {
        denom: "uusdc".to_string(),
    }
}

fn uluna() -> AssetInfo {
    AssetInfo::NativeToken {
        denom: "uluna".to_string(),
    }
}

fn store_pool_code(app: &mut App) -> u64 {
    let pool_contract = Box::new(ContractWrapper::new_with_empty(
        mock_pool::execute,
        mock_pool::instantiate,
        mock_pool::query,
    ));
    app.store_code(pool_contract)
}

fn store_order_book_code(app: &mut App) -> u64 {
    let contract = Box::new(
        ContractWrapper::new_with_empty(execute, instantiate, order_book_query)
            .with_reply_empty(reply)
            .with_migrate_empty(migrate),
    );
    app.store_code(contract)
}

/// Instantiates a pool priced so that 1 uusdc -> 5 uluna, and an order book
/// pointed at it with a generous slippage/duration envelope, both tokens
/// whitelisted.
fn setup() -> (App, Addr, Addr) {
    let owner = Addr::unchecked(OWNER);
    let mut app = mock_app(
        owner.clone(),
        vec![
            Coin {
                denom: "uusdc".to_string(),
                amount: Uint128::new(1_000_000_000),
            },
            Coin {
                denom: "uluna".to_string(),
                amount: Uint128::new(1_000_000_000),
            },
        ],
    );

    let pool_code_id = store_pool_code(&mut app);
    let pool = app
        .instantiate_contract(
            pool_code_id,
            owner.clone(),
            &mock_pool::InstantiateMsg {
                assets: [
                    Asset {
                        info: uusdc(),
                        amount: Uint128::new(1_000_000_000_000),
                    },
                    Asset {
                        info: uluna(),
                        amount: Uint128::new(5_000_000_000_000),
                    },
                ],
                rate_num: 5,
                rate_denom: 1,
            },
            &[],
            "POOL",
            None,
        )
        .unwrap();

    app.send_tokens(
        owner.clone(),
        pool.clone(),
        &[Coin {
            denom: "uluna".to_string(),
            amount: Uint128::new(1_000_000_000),
        }],
    )
    .unwrap();

    let order_book_code_id = store_order_book_code(&mut app);
    let order_book = app
        .instantiate_contract(
            order_book_code_id,
            owner.clone(),
            &InstantiateMsg {
                owner: None,
                executor: EXECUTOR.to_string(),
                pool: pool.to_string(),
                max_slippage_bp: 500,
                min_duration_s: 60,
                max_duration_s: 7 * 24 * 3600,
            },
            &[],
            "ORDER_BOOK",
            None,
        )
        .unwrap();

    app.execute_contract(
        owner.clone(),
        order_book.clone(),
        &ExecuteMsg::WhitelistToken {
            token: uusdc(),
            decimals: 6,
        },
        &[],
    )
    .unwrap();
    app.execute_contract(
        owner,
        order_book.clone(),
        &ExecuteMsg::WhitelistToken {
            token: uluna(),
            decimals: 6,
        },
        &[],
    )
    .unwrap();

    (app, order_book, pool)
}

fn create_order(app: &mut App, order_book: &Addr, owner: &str, target_num: u64, target_denom: u64) -> u64 {
    app.execute_contract(
        Addr::unchecked(owner),
        order_book.clone(),
        &ExecuteMsg::CreateLimitOrder {
            to_token: uluna(),
            target_num,
            target_denom,
            slippage_bp: 100,
            duration_s: 3600,
        },
        &[Coin {
            denom: "uusdc".to_string(),
            amount: Uint128::new(1_000_000),
        }],
    )
    .unwrap();

    let orders: Vec<u64> = app
        .wrap()
        .query_wasm_smart(
            order_book,
            &QueryMsg::GetUserOrders {
                owner: owner.to_string(),
                start_after: None,
                limit: None,
            },
        )
        .unwrap();
    *orders.last().unwrap()
}

#[test]
fn creates_and_reads_back_a_pending_order() {
    let (mut app, order_book, _pool) = setup();
    let order_id = create_order(&mut app, &order_book, "alice", 5, 1);

    let order: Order = app
        .wrap()
        .query_wasm_smart(&order_book, &QueryMsg::GetOrder { order_id })
        .unwrap();

    assert_eq!(order.owner, Addr::unchecked("alice"));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.from_amount, Uint128::new(1_000_000));
}

#[test]
fn executes_an_order_once_price_target_is_met() {
    let (mut app, order_book, _pool) = setup();
    // Target is 5 uluna per uusdc, matching the pool's fixed rate exactly.
    let order_id = create_order(&mut app, &order_book, "alice", 5, 1);

    app.execute_contract(
        Addr::unchecked(EXECUTOR),
        order_book.clone(),
        &ExecuteMsg::ExecuteLimitOrder {
            order_id,
            current_num: 5,
            current_denom: 1,
        },
        &[],
    )
    .unwrap();

    let order: Order = app
        .wrap()
        .query_wasm_smart(&order_book, &QueryMsg::GetOrder { order_id })
        .unwrap();
    assert_eq!(order.status, OrderStatus::Executed);

    let balance = app
        .wrap()
        .query_balance(Addr::unchecked("alice"), "uluna")
        .unwrap();
    assert_eq!(balance.amount, Uint128::new(5_000_000));
}

#[test]
fn only_the_executor_may_trigger_execution() {
    let (mut app, order_book, _pool) = setup();
    let order_id = create_order(&mut app, &order_book, "alice", 5, 1);

    let err = app
        .execute_contract(
            Addr::unchecked("random"),
            order_book,
            &ExecuteMsg::ExecuteLimitOrder {
                order_id,
                current_num: 5,
                current_denom: 1,
            },
            &[],
        )
        .unwrap_err();

    assert!(err.root_cause().to_string().contains("executor"));
}

#[test]
fn owner_can_cancel_and_is_refunded() {
    let (mut app, order_book, _pool) = setup();
    let order_id = create_order(&mut app, &order_book, "alice", 5, 1);

    let balance_before = app
        .wrap()
        .query_balance(Addr::unchecked("alice"), "uusdc")
        .unwrap();

    app.execute_contract(
        Addr::unchecked("alice"),
        order_book.clone(),
        &ExecuteMsg::CancelLimitOrder { order_id },
        &[],
    )
    .unwrap();

    let order: Order = app
        .wrap()
        .query_wasm_smart(&order_book, &QueryMsg::GetOrder { order_id })
        .unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);

    let balance_after = app
        .wrap()
        .query_balance(Addr::unchecked("alice"), "uusdc")
        .unwrap();
    assert_eq!(
        balance_after.amount,
        balance_before.amount + Uint128::new(1_000_000)
    );
}

#[test]
fn non_owner_cannot_cancel() {
    let (mut app, order_book, _pool) = setup();
    let order_id = create_order(&mut app, &order_book, "alice", 5, 1);

    let err = app
        .execute_contract(
            Addr::unchecked("mallory"),
            order_book,
            &ExecuteMsg::CancelLimitOrder { order_id },
            &[],
        )
        .unwrap_err();

    assert!(err.root_cause().to_string().contains("owner"));
}

#[test]
fn execution_below_min_out_leaves_the_order_pending_and_funds_stay_put() {
    let (mut app, order_book, _pool) = setup();
    // Target way above the pool's fixed 5:1 rate: min_out will never be met.
    let order_id = create_order(&mut app, &order_book, "alice", 50, 1);

    app.execute_contract(
        Addr::unchecked(EXECUTOR),
        order_book.clone(),
        &ExecuteMsg::ExecuteLimitOrder {
            order_id,
            current_num: 50,
            current_denom: 1,
        },
        &[],
    )
    .unwrap();

    let order: Order = app
        .wrap()
        .query_wasm_smart(&order_book, &QueryMsg::GetOrder { order_id })
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);

    let balance = app
        .wrap()
        .query_balance(Addr::unchecked("alice"), "uluna")
        .unwrap();
    assert_eq!(balance.amount, Uint128::zero());
}

#[test]
fn expire_orders_sweeps_past_deadline_and_refunds() {
    let (mut app, order_book, _pool) = setup();
    let order_id = create_order(&mut app, &order_book, "alice", 5, 1);

    app.update_block(|block| block.time = block.time.plus_seconds(3601));

    app.execute_contract(
        Addr::unchecked(EXECUTOR),
        order_book.clone(),
        &ExecuteMsg::ExpireOrders { limit: 10 },
        &[],
    )
    .unwrap();

    let order: Order = app
        .wrap()
        .query_wasm_smart(&order_book, &QueryMsg::GetOrder { order_id })
        .unwrap();
    assert_eq!(order.status, OrderStatus::Expired);

    let balance = app
        .wrap()
        .query_balance(Addr::unchecked("alice"), "uusdc")
        .unwrap();
    assert_eq!(balance.amount, Uint128::new(1_000_000_000));
}

#[test]
fn admin_config_is_readable_and_owner_gated() {
    let (mut app, order_book, _pool) = setup();

    let config: ConfigResponse = app
        .wrap()
        .query_wasm_smart(&order_book, &QueryMsg::GetConfig {})
        .unwrap();
    assert_eq!(config.max_slippage_bp, 500);

    let err = app
        .execute_contract(
            Addr::unchecked("random"),
            order_book,
            &ExecuteMsg::SetMaxSlippage {
                max_slippage_bp: 1000,
            },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("Unauthorized"));
}
