use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;
use cw20::Cw20ReceiveMsg;

use crate::asset::{Asset, AssetInfo};

/// Snapshot of a pool's reserves, carried alongside the decimals needed to
/// turn the ratio into a human-comparable spot price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub reserve_from: u128,
    pub reserve_to: u128,
    pub decimals_from: u8,
    pub decimals_to: u8,
}

/// Query surface exposed by the single pool contract the order book swaps
/// through. Only the one variant the adapter needs is modeled — this is a
/// single-pool direct-pair design, not a router.
#[cw_serde]
#[derive(QueryResponses)]
pub enum PoolQueryMsg {
    #[returns(PoolResponse)]
    Pool {},
}

#[cw_serde]
pub struct PoolResponse {
    pub assets: [Asset; 2],
    pub total_share: Uint128,
}

/// Execute surface exposed by the pool contract. `Swap` is a fixed-input
/// swap for a native offer: the pool chooses the output amount and reverts
/// unless it is at least `min_out`. A CW20 offer cannot move via a bare
/// execute — it has to arrive through the CW20 contract's own `Send`, which
/// is why `Receive` exists here too, mirroring the same native/CW20 duality
/// `order_book::msg::ExecuteMsg` exposes for `createLimitOrder`.
#[cw_serde]
pub enum PoolExecuteMsg {
    Swap {
        offer_asset: Asset,
        min_out: Uint128,
        to: Option<String>,
    },
    Receive(Cw20ReceiveMsg),
}

/// Payload carried inside a CW20 offer's `Cw20ReceiveMsg.msg`, decoded by
/// the pool's `Receive` handler. The offer asset and amount are already
/// implied by the CW20 `Send` itself (the calling contract address is the
/// token, `Cw20ReceiveMsg.amount` is the amount), so only the ask-side
/// terms need to travel here.
#[cw_serde]
pub enum PoolCw20HookMsg {
    Swap {
        min_out: Uint128,
        to: Option<String>,
    },
}

impl PoolResponse {
    /// Pick out the reserve pair in the caller's `(from, to)` sense.
    pub fn reserves_for(&self, from: &AssetInfo, to: &AssetInfo) -> Option<(Uint128, Uint128)> {
        let from_reserve = self.assets.iter().find(|a| &a.info == from)?.amount;
        let to_reserve = self.assets.iter().find(|a| &a.info == to)?.amount;
        Some((from_reserve, to_reserve))
    }
}
