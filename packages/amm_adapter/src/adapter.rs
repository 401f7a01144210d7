use cosmwasm_std::{coins, to_binary, Addr, CosmosMsg, QuerierWrapper, Uint128, WasmMsg};
use cw20::Cw20ExecuteMsg;

use crate::asset::{Asset, AssetInfo};
use crate::error::AdapterError;
use crate::pool::{PoolCw20HookMsg, PoolExecuteMsg, PoolQueryMsg, PoolResponse, PoolSnapshot};

/// Reads current reserves from `pool_addr` and returns them in the caller's
/// `(from, to)` sense, adjusted for the supplied decimals. The adapter does
/// not discover pools or pairs — `pool_addr` is the caller's configuration.
pub fn get_reserves(
    querier: &QuerierWrapper,
    pool_addr: &Addr,
    from: &AssetInfo,
    to: &AssetInfo,
    decimals_from: u8,
    decimals_to: u8,
) -> Result<PoolSnapshot, AdapterError> {
    let response: PoolResponse = querier
        .query_wasm_smart(pool_addr, &PoolQueryMsg::Pool {})
        .map_err(|e| AdapterError::PoolUnavailable(e.to_string()))?;

    let (reserve_from, reserve_to) = response
        .reserves_for(from, to)
        .ok_or_else(|| AdapterError::PoolUnavailable("asset not found in pool".to_string()))?;

    Ok(PoolSnapshot {
        reserve_from: reserve_from.u128(),
        reserve_to: reserve_to.u128(),
        decimals_from,
        decimals_to,
    })
}

/// Builds the message that, when dispatched, swaps exactly `from_amount` of
/// `from_token` for at least `min_out` of `to_token` and delivers the output
/// to `recipient`. A two-asset pool infers the ask side from whichever asset
/// isn't offered, so `to_token` only needs to be distinct from `from_token`
/// — callers that got this far already validated that via `from_token !=
/// to_token` at order-creation time.
///
/// A native offer dispatches straight to `pool_addr` with the payment
/// attached as `funds`, matching the pool's own native-offer swap entry
/// point. A CW20 offer cannot move via a bare execute on the pool, so it
/// instead dispatches to the *token's* contract as a
/// `Cw20ExecuteMsg::Send`, which is what actually moves `from_amount` of the
/// CW20 to `pool_addr` and carries the swap terms as that call's hook
/// payload — the same `Receive`/hook-message duality
/// `order_book::msg::ExecuteMsg::Receive` already uses on the deposit side.
pub fn build_swap_payload(
    pool_addr: &Addr,
    from_token: &AssetInfo,
    from_amount: Uint128,
    to_token: &AssetInfo,
    min_out: Uint128,
    recipient: &Addr,
) -> CosmosMsg {
    debug_assert_ne!(from_token, to_token);

    match from_token {
        AssetInfo::NativeToken { denom } => {
            let offer_asset = Asset {
                info: from_token.clone(),
                amount: from_amount,
            };
            let msg = PoolExecuteMsg::Swap {
                offer_asset,
                min_out,
                to: Some(recipient.to_string()),
            };

            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: pool_addr.to_string(),
                msg: to_binary(&msg).unwrap(),
                funds: coins(from_amount.u128(), denom),
            })
        }
        AssetInfo::Token { contract_addr } => {
            let hook = PoolCw20HookMsg::Swap {
                min_out,
                to: Some(recipient.to_string()),
            };
            let send = Cw20ExecuteMsg::Send {
                contract: pool_addr.to_string(),
                amount: from_amount,
                msg: to_binary(&hook).unwrap(),
            };

            CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: contract_addr.to_string(),
                msg: to_binary(&send).unwrap(),
                funds: vec![],
            })
        }
    }
}
