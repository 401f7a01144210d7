use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::{Item, Map};

use gridiron_limit_order_types::Order;

/// Contract-wide configuration. Single-writer by construction: only
/// `config.owner` may call any `set_*`/`whitelist_token`/`remove_token`
/// entry point.
#[cw_serde]
pub struct Config {
    pub owner: Addr,
    pub executor: Addr,
    pub pool: Addr,
    pub paused: bool,
    pub max_slippage_bp: u16,
    pub min_duration_s: u64,
    pub max_duration_s: u64,
}

/// Two-step transfer of `Config.owner`, mirroring the handover dance every
/// pair contract in this stack exposes so a single bad transaction can never
/// hand the contract to an unreachable address.
#[cw_serde]
pub struct OwnershipProposal {
    pub owner: Addr,
    pub expires_at: u64,
}

/// The swap context persisted between phase A (`execute`, which dispatches
/// the pool swap as a `SubMsg`) and phase B (`reply`, the sole place a
/// `Pending` order becomes `Executed`). Cleared as soon as `reply` reads it.
#[cw_serde]
pub struct InFlightSwap {
    pub order_id: u64,
    pub min_out: Uint128,
    pub current_num: u64,
    pub current_denom: u64,
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const OWNERSHIP_PROPOSAL: Item<OwnershipProposal> = Item::new("ownership_proposal");
pub const NEXT_ORDER_ID: Item<u64> = Item::new("next_order_id");
pub const IN_FLIGHT_SWAP: Item<InFlightSwap> = Item::new("in_flight_swap");

pub const ORDERS: Map<u64, Order> = Map::new("orders");

/// Secondary index serving `getUserOrders` without a linear scan over
/// `ORDERS`. Keyed `(owner, order_id)`; the value is a unit marker.
pub const ORDERS_BY_OWNER: Map<(&Addr, u64), ()> = Map::new("orders_by_owner");

/// The set of tokens admissible as `from_token`/`to_token`, together with
/// the decimals `price_to_fraction`/`spot_price` need at order-creation
/// time. Populated only by `whitelist_token`. Keyed by `AssetInfo::to_string()`
/// (`cw-storage-plus` has no blanket `PrimaryKey` impl for an arbitrary enum,
/// and this mirrors how the rest of this stack keys `Map`s on a token's
/// string form rather than implementing a custom key type for one lookup).
pub const WHITELIST: Map<String, u8> = Map::new("whitelist");
