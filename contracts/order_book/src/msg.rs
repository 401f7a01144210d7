use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;
use cw20::Cw20ReceiveMsg;

use gridiron_limit_order_amm_adapter::AssetInfo;
use gridiron_limit_order_types::Order;

#[cw_serde]
pub struct InstantiateMsg {
    /// Defaults to the instantiating address when omitted.
    pub owner: Option<String>,
    pub executor: String,
    pub pool: String,
    pub max_slippage_bp: u16,
    pub min_duration_s: u64,
    pub max_duration_s: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Locks the attached native payment and creates a standing order to
    /// swap it for `to_token` once the pool's spot price reaches
    /// `target_num / target_denom` or better. `from_token`/`from_amount`
    /// are the single coin attached in `info.funds`, not explicit
    /// arguments — the same convention the pool's own native-offer swap
    /// uses. CW20 deposits go through [`ExecuteMsg::Receive`] instead.
    CreateLimitOrder {
        to_token: AssetInfo,
        target_num: u64,
        target_denom: u64,
        slippage_bp: u16,
        duration_s: u64,
    },
    /// CW20 deposit hook: `cw20_msg.sender` is the order owner,
    /// `cw20_msg.amount` is `from_amount`, the calling CW20 contract address
    /// is `from_token`, and `cw20_msg.msg` decodes to [`Cw20HookMsg`].
    Receive(Cw20ReceiveMsg),
    /// Cancels a Pending order owned by the caller and refunds its deposit.
    CancelLimitOrder { order_id: u64 },
    /// Dispatches the pool swap for a triggerable Pending order.
    /// `current_num`/`current_denom` are recorded on the emitted event only
    /// — trade economics always come from the order's stored target.
    ExecuteLimitOrder {
        order_id: u64,
        current_num: u64,
        current_denom: u64,
    },
    /// Sweeps up to `limit` expired Pending orders, refunding each.
    ExpireOrders { limit: u32 },

    SetPaused { paused: bool },
    SetMaxSlippage { max_slippage_bp: u16 },
    SetExecutor { executor: String },
    SetPool { pool: String },
    WhitelistToken { token: AssetInfo, decimals: u8 },
    RemoveToken { token: AssetInfo },

    ProposeNewOwner { owner: String, expires_in: u64 },
    DropOwnershipProposal {},
    ClaimOwnership {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Order)]
    GetOrder { order_id: u64 },
    #[returns(Vec<Order>)]
    GetPendingOrders {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(Vec<u64>)]
    GetUserOrders {
        owner: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(cosmwasm_std::Addr)]
    GetPool {},
    #[returns(cosmwasm_std::Addr)]
    GetExecutor {},
    #[returns(bool)]
    IsPaused {},
    #[returns(u16)]
    GetMaxSlippage {},
    #[returns(ConfigResponse)]
    GetConfig {},
    /// Decimals recorded for a whitelisted token at `whitelist_token` time.
    /// The executor needs this to build a decimal-correct `Price` for its
    /// own `current_num`/`current_denom` logging, the same registry
    /// `createLimitOrder`'s validation reads from.
    #[returns(u8)]
    GetTokenDecimals { token: AssetInfo },
}

#[cw_serde]
pub struct ConfigResponse {
    pub owner: String,
    pub executor: String,
    pub pool: String,
    pub paused: bool,
    pub max_slippage_bp: u16,
    pub min_duration_s: u64,
    pub max_duration_s: u64,
}

#[cw_serde]
pub struct MigrateMsg {}

/// Payload carried inside [`ExecuteMsg::Receive`]'s `Cw20ReceiveMsg.msg`.
#[cw_serde]
pub enum Cw20HookMsg {
    CreateLimitOrder {
        to_token: AssetInfo,
        target_num: u64,
        target_denom: u64,
        slippage_bp: u16,
        duration_s: u64,
    },
}
