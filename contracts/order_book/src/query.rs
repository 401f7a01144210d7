use cosmwasm_std::{
    entry_point, to_binary, Addr, Binary, Deps, Env, Order as MapOrder, StdError, StdResult,
};
use cw_storage_plus::Bound;

use gridiron_limit_order_types::Order;

use crate::msg::{ConfigResponse, QueryMsg};
use crate::state::{CONFIG, ORDERS, ORDERS_BY_OWNER, WHITELIST};

const MAX_PAGE_LIMIT: u32 = 100;
const DEFAULT_PAGE_LIMIT: u32 = 30;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::GetOrder { order_id } => to_binary(&ORDERS.load(deps.storage, order_id)?),
        QueryMsg::GetPendingOrders { start_after, limit } => {
            to_binary(&get_pending_orders(deps, start_after, limit)?)
        }
        QueryMsg::GetUserOrders {
            owner,
            start_after,
            limit,
        } => to_binary(&get_user_orders(deps, owner, start_after, limit)?),
        QueryMsg::GetPool {} => to_binary(&CONFIG.load(deps.storage)?.pool),
        QueryMsg::GetExecutor {} => to_binary(&CONFIG.load(deps.storage)?.executor),
        QueryMsg::IsPaused {} => to_binary(&CONFIG.load(deps.storage)?.paused),
        QueryMsg::GetMaxSlippage {} => to_binary(&CONFIG.load(deps.storage)?.max_slippage_bp),
        QueryMsg::GetConfig {} => to_binary(&query_config(deps)?),
        QueryMsg::GetTokenDecimals { token } => {
            let decimals = WHITELIST
                .load(deps.storage, token.to_string())
                .map_err(|_| StdError::generic_err(format!("token {token} is not whitelisted")))?;
            to_binary(&decimals)
        }
    }
}

fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        owner: config.owner.to_string(),
        executor: config.executor.to_string(),
        pool: config.pool.to_string(),
        paused: config.paused,
        max_slippage_bp: config.max_slippage_bp,
        min_duration_s: config.min_duration_s,
        max_duration_s: config.max_duration_s,
    })
}

/// Every Pending order, oldest id first, paginated by `order_id`. Cancelled,
/// expired and executed orders never show up here — the executor's sweep
/// only ever needs the triggerable set.
fn get_pending_orders(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Vec<Order>> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    ORDERS
        .range(deps.storage, start, None, MapOrder::Ascending)
        .filter(|item| {
            item.as_ref()
                .map(|(_, order)| order.is_pending())
                .unwrap_or(true)
        })
        .take(limit)
        .map(|item| item.map(|(_, order)| order))
        .collect()
}

/// All order ids ever created by `owner`, oldest first, paginated. Includes
/// terminal orders — callers wanting only the live set should cross-reference
/// against [`QueryMsg::GetOrder`].
fn get_user_orders(
    deps: Deps,
    owner: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Vec<u64>> {
    let owner: Addr = deps.api.addr_validate(&owner)?;
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT) as usize;
    let start = start_after.map(Bound::exclusive);

    ORDERS_BY_OWNER
        .prefix(&owner)
        .range(deps.storage, start, None, MapOrder::Ascending)
        .take(limit)
        .map(|item| item.map(|(order_id, ())| order_id))
        .collect()
}
