use cosmwasm_std::{
    attr, entry_point, from_binary, DepsMut, Env, MessageInfo, Order as MapOrder, Reply, Response,
    StdResult, SubMsg, SubMsgResult, Uint128,
};
use cw2::set_contract_version;
use cw20::Cw20ReceiveMsg;

use gridiron_limit_order_amm_adapter::{build_swap_payload, Asset, AssetInfo};
use gridiron_limit_order_price_math::{min_out, Price};
use gridiron_limit_order_types::{events, Order, OrderStatus};

use crate::error::ContractError;
use crate::msg::{Cw20HookMsg, ExecuteMsg, InstantiateMsg, MigrateMsg};
use crate::ownership::{claim_ownership_into_config, drop_ownership_proposal, propose_new_owner};
use crate::state::{
    Config, InFlightSwap, CONFIG, IN_FLIGHT_SWAP, NEXT_ORDER_ID, ORDERS, ORDERS_BY_OWNER,
    OWNERSHIP_PROPOSAL, WHITELIST,
};

pub(crate) const CONTRACT_NAME: &str = env!("CARGO_PKG_NAME");
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The only `reply` code this contract ever dispatches: the pool swap
/// kicked off by `ExecuteLimitOrder`. Phase B of the two-phase lifecycle
/// lives entirely in `reply`'s handling of this id.
const EXECUTE_SWAP_REPLY_ID: u64 = 1;

const MAX_PAGE_LIMIT: u32 = 100;
const DEFAULT_PAGE_LIMIT: u32 = 30;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let owner = match msg.owner {
        Some(owner) => deps.api.addr_validate(&owner)?,
        None => info.sender.clone(),
    };
    let executor = deps.api.addr_validate(&msg.executor)?;
    let pool = deps.api.addr_validate(&msg.pool)?;

    if msg.min_duration_s == 0 || msg.min_duration_s > msg.max_duration_s {
        return Err(ContractError::InvalidDuration {
            min: msg.min_duration_s,
            max: msg.max_duration_s,
        });
    }

    let config = Config {
        owner,
        executor,
        pool,
        paused: false,
        max_slippage_bp: msg.max_slippage_bp,
        min_duration_s: msg.min_duration_s,
        max_duration_s: msg.max_duration_s,
    };
    CONFIG.save(deps.storage, &config)?;
    NEXT_ORDER_ID.save(deps.storage, &1u64)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "instantiate"),
        attr("owner", config.owner),
        attr("executor", config.executor),
        attr("pool", config.pool),
    ]))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateLimitOrder {
            to_token,
            target_num,
            target_denom,
            slippage_bp,
            duration_s,
        } => {
            let coin = one_coin(&info)?;
            let from_token = AssetInfo::NativeToken { denom: coin.denom };
            create_limit_order(
                deps,
                env,
                info.sender,
                from_token,
                coin.amount,
                to_token,
                target_num,
                target_denom,
                slippage_bp,
                duration_s,
            )
        }
        ExecuteMsg::Receive(cw20_msg) => receive_cw20(deps, env, info, cw20_msg),
        ExecuteMsg::CancelLimitOrder { order_id } => {
            cancel_limit_order(deps, env, info, order_id)
        }
        ExecuteMsg::ExecuteLimitOrder {
            order_id,
            current_num,
            current_denom,
        } => execute_limit_order(deps, env, info, order_id, current_num, current_denom),
        ExecuteMsg::ExpireOrders { limit } => expire_orders(deps, env, limit),
        ExecuteMsg::SetPaused { paused } => set_paused(deps, info, paused),
        ExecuteMsg::SetMaxSlippage { max_slippage_bp } => {
            set_max_slippage(deps, info, max_slippage_bp)
        }
        ExecuteMsg::SetExecutor { executor } => set_executor(deps, info, executor),
        ExecuteMsg::SetPool { pool } => set_pool(deps, info, pool),
        ExecuteMsg::WhitelistToken { token, decimals } => {
            whitelist_token(deps, info, token, decimals)
        }
        ExecuteMsg::RemoveToken { token } => remove_token(deps, info, token),
        ExecuteMsg::ProposeNewOwner { owner, expires_in } => {
            let config = CONFIG.load(deps.storage)?;
            propose_new_owner(
                deps,
                info,
                env,
                owner,
                expires_in,
                config.owner,
                OWNERSHIP_PROPOSAL,
            )
        }
        ExecuteMsg::DropOwnershipProposal {} => {
            let config = CONFIG.load(deps.storage)?;
            drop_ownership_proposal(deps, info, config.owner, OWNERSHIP_PROPOSAL)
        }
        ExecuteMsg::ClaimOwnership {} => {
            claim_ownership_into_config(deps, info, env, OWNERSHIP_PROPOSAL)
        }
    }
}

/// `info.funds` must carry exactly one coin — the native payment for
/// `createLimitOrder`. Mirrors the single-offer-asset convention the pool's
/// own native-offer swap uses.
fn one_coin(info: &MessageInfo) -> Result<cosmwasm_std::Coin, ContractError> {
    match info.funds.as_slice() {
        [coin] if !coin.amount.is_zero() => Ok(coin.clone()),
        [_] => Err(ContractError::ZeroAmount {}),
        _ => Err(ContractError::ZeroAmount {}),
    }
}

fn receive_cw20(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let from_token = AssetInfo::Token {
        contract_addr: info.sender.clone(),
    };
    let owner = deps.api.addr_validate(&cw20_msg.sender)?;

    match from_binary(&cw20_msg.msg)? {
        Cw20HookMsg::CreateLimitOrder {
            to_token,
            target_num,
            target_denom,
            slippage_bp,
            duration_s,
        } => create_limit_order(
            deps,
            env,
            owner,
            from_token,
            cw20_msg.amount,
            to_token,
            target_num,
            target_denom,
            slippage_bp,
            duration_s,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn create_limit_order(
    deps: DepsMut,
    env: Env,
    owner: cosmwasm_std::Addr,
    from_token: AssetInfo,
    from_amount: Uint128,
    to_token: AssetInfo,
    target_num: u64,
    target_denom: u64,
    slippage_bp: u16,
    duration_s: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if config.paused {
        return Err(ContractError::Paused {});
    }
    if from_token == to_token {
        return Err(ContractError::SameAsset {});
    }
    if from_amount.is_zero() {
        return Err(ContractError::ZeroAmount {});
    }
    if slippage_bp > config.max_slippage_bp {
        return Err(ContractError::SlippageTooHigh {
            given: slippage_bp,
            max: config.max_slippage_bp,
        });
    }
    if duration_s < config.min_duration_s || duration_s > config.max_duration_s {
        return Err(ContractError::InvalidDuration {
            min: config.min_duration_s,
            max: config.max_duration_s,
        });
    }
    if !WHITELIST.has(deps.storage, from_token.to_string()) {
        return Err(ContractError::InvalidToken(from_token.to_string()));
    }
    if !WHITELIST.has(deps.storage, to_token.to_string()) {
        return Err(ContractError::InvalidToken(to_token.to_string()));
    }

    // Validates denom > 0 and that the fraction fits the price value type.
    Price::from_parts(target_num, target_denom)?;

    let order_id = NEXT_ORDER_ID.update(deps.storage, |id| -> StdResult<_> { Ok(id + 1) })?;
    let order_id = order_id - 1;

    let now = env.block.time.seconds();
    let order = Order {
        order_id,
        owner: owner.clone(),
        from_token,
        from_amount,
        to_token,
        target_num,
        target_denom,
        slippage_bp,
        created_at: now,
        expires_at: now + duration_s,
        status: OrderStatus::Pending,
    };

    ORDERS.save(deps.storage, order_id, &order)?;
    ORDERS_BY_OWNER.save(deps.storage, (&owner, order_id), &())?;

    Ok(Response::new()
        .add_event(events::order_created(&order))
        .add_attribute("action", "create_limit_order"))
}

fn cancel_limit_order(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    order_id: u64,
) -> Result<Response, ContractError> {
    let mut order = ORDERS
        .load(deps.storage, order_id)
        .map_err(|_| ContractError::OrderNotFound(order_id))?;

    if order.owner != info.sender {
        return Err(ContractError::NotOwner {});
    }
    if !order.is_pending() {
        return Err(ContractError::NotPending {});
    }

    order.status = OrderStatus::Cancelled;
    ORDERS.save(deps.storage, order_id, &order)?;

    let refund = Asset {
        info: order.from_token.clone(),
        amount: order.from_amount,
    };

    Ok(Response::new()
        .add_message(refund.transfer_msg(&order.owner)?)
        .add_event(events::order_cancelled(order_id))
        .add_attribute("action", "cancel_limit_order"))
}

fn execute_limit_order(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    order_id: u64,
    current_num: u64,
    current_denom: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if info.sender != config.executor {
        return Err(ContractError::NotExecutor {});
    }
    if config.paused {
        return Err(ContractError::Paused {});
    }

    let order = ORDERS
        .load(deps.storage, order_id)
        .map_err(|_| ContractError::OrderNotFound(order_id))?;

    if !order.is_pending() {
        return Err(ContractError::NotPending {});
    }
    if order.is_expired(env.block.time.seconds()) {
        return Err(ContractError::Expired {});
    }

    // Trade economics always come from the order's stored target, never the
    // executor-supplied current price — that price is recorded on the
    // emitted event only.
    let target_price = order.target_price()?;
    let min_amount_out = min_out(order.from_amount.u128(), target_price, order.slippage_bp)?;

    let swap_msg = build_swap_payload(
        &config.pool,
        &order.from_token,
        order.from_amount,
        &order.to_token,
        Uint128::new(min_amount_out),
        &env.contract.address,
    );

    IN_FLIGHT_SWAP.save(
        deps.storage,
        &InFlightSwap {
            order_id,
            min_out: Uint128::new(min_amount_out),
            current_num,
            current_denom,
        },
    )?;

    Ok(Response::new()
        .add_submessage(SubMsg::reply_always(swap_msg, EXECUTE_SWAP_REPLY_ID))
        .add_attribute("action", "execute_limit_order")
        .add_attribute("order_id", order_id.to_string()))
}

fn expire_orders(deps: DepsMut, env: Env, limit: u32) -> Result<Response, ContractError> {
    let limit = limit.min(MAX_PAGE_LIMIT) as usize;
    let now = env.block.time.seconds();

    let candidates: Vec<(u64, Order)> = ORDERS
        .range(deps.storage, None, None, MapOrder::Ascending)
        .filter_map(|item| item.ok())
        .filter(|(_, order)| order.is_pending() && order.is_expired(now))
        .take(limit)
        .collect();

    let mut response = Response::new().add_attribute("action", "expire_orders");

    for (order_id, mut order) in candidates {
        order.status = OrderStatus::Expired;
        ORDERS.save(deps.storage, order_id, &order)?;

        let refund = Asset {
            info: order.from_token.clone(),
            amount: order.from_amount,
        };
        response = response
            .add_message(refund.transfer_msg(&order.owner)?)
            .add_event(events::order_expired(order_id));
    }

    Ok(response)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    if msg.id != EXECUTE_SWAP_REPLY_ID {
        return Err(ContractError::NoInFlightSwap {});
    }

    let in_flight = IN_FLIGHT_SWAP
        .load(deps.storage)
        .map_err(|_| ContractError::NoInFlightSwap {})?;
    IN_FLIGHT_SWAP.remove(deps.storage);

    let mut order = ORDERS
        .load(deps.storage, in_flight.order_id)
        .map_err(|_| ContractError::OrderNotFound(in_flight.order_id))?;

    match msg.result {
        SubMsgResult::Err(reason) => Ok(Response::new()
            .add_event(events::order_execution_failed(in_flight.order_id, reason))
            .add_attribute("action", "execute_limit_order_failed")),
        SubMsgResult::Ok(sub_response) => {
            let output = parse_return_amount(&sub_response.events);

            match output {
                Some(amount) if amount >= in_flight.min_out => {
                    order.status = OrderStatus::Executed;
                    ORDERS.save(deps.storage, in_flight.order_id, &order)?;

                    let payout = Asset {
                        info: order.to_token.clone(),
                        amount,
                    };

                    Ok(Response::new()
                        .add_message(payout.transfer_msg(&order.owner)?)
                        .add_event(events::order_executed(
                            in_flight.order_id,
                            amount,
                            in_flight.current_num,
                            in_flight.current_denom,
                        ))
                        .add_attribute("action", "execute_limit_order_success"))
                }
                _ => {
                    // Either the pool refunded the original input (no usable
                    // `return_amount` attribute) or returned less than
                    // `min_out`. Either way the order stays Pending and
                    // whatever came back already sits in this contract's own
                    // balance — nothing further to move.
                    Ok(Response::new()
                        .add_event(events::order_execution_failed(
                            in_flight.order_id,
                            "pool returned below min_out or refunded the input",
                        ))
                        .add_attribute("action", "execute_limit_order_failed"))
                }
            }
        }
    }
}

/// Pulls `return_amount` off the pool's own wasm response events. Every
/// `Response::add_attributes` a sub-call makes surfaces here tagged with
/// event type `wasm`.
fn parse_return_amount(events: &[cosmwasm_std::Event]) -> Option<Uint128> {
    events
        .iter()
        .filter(|e| e.ty == "wasm")
        .find_map(|e| e.attributes.iter().find(|a| a.key == "return_amount"))
        .and_then(|a| a.value.parse::<u128>().ok())
        .map(Uint128::new)
}

fn set_paused(deps: DepsMut, info: MessageInfo, paused: bool) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }
    config.paused = paused;
    CONFIG.save(deps.storage, &config)?;
    Ok(Response::new()
        .add_attribute("action", "set_paused")
        .add_attribute("paused", paused.to_string()))
}

fn set_max_slippage(
    deps: DepsMut,
    info: MessageInfo,
    max_slippage_bp: u16,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }
    config.max_slippage_bp = max_slippage_bp;
    CONFIG.save(deps.storage, &config)?;
    Ok(Response::new()
        .add_attribute("action", "set_max_slippage")
        .add_attribute("max_slippage_bp", max_slippage_bp.to_string()))
}

fn set_executor(
    deps: DepsMut,
    info: MessageInfo,
    executor: String,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }
    config.executor = deps.api.addr_validate(&executor)?;
    CONFIG.save(deps.storage, &config)?;
    Ok(Response::new()
        .add_attribute("action", "set_executor")
        .add_attribute("executor", config.executor))
}

fn set_pool(deps: DepsMut, info: MessageInfo, pool: String) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }
    config.pool = deps.api.addr_validate(&pool)?;
    CONFIG.save(deps.storage, &config)?;
    Ok(Response::new()
        .add_attribute("action", "set_pool")
        .add_attribute("pool", config.pool))
}

fn whitelist_token(
    deps: DepsMut,
    info: MessageInfo,
    token: AssetInfo,
    decimals: u8,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }
    token.check(deps.api)?;
    WHITELIST.save(deps.storage, token.to_string(), &decimals)?;
    Ok(Response::new()
        .add_attribute("action", "whitelist_token")
        .add_attribute("token", token.to_string())
        .add_attribute("decimals", decimals.to_string()))
}

fn remove_token(
    deps: DepsMut,
    info: MessageInfo,
    token: AssetInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }
    WHITELIST.remove(deps.storage, token.to_string());
    Ok(Response::new()
        .add_attribute("action", "remove_token")
        .add_attribute("token", token.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    cw2::ensure_from_older_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new().add_attribute("action", "migrate"))
}
