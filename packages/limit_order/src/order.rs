use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};

use gridiron_limit_order_amm_adapter::AssetInfo;
use gridiron_limit_order_price_math::{Price, PriceError};

/// An order's position in its lifecycle. Transitions are restricted to
/// `Pending -> Executed`, `Pending -> Cancelled`, `Pending -> Expired`;
/// every other state is terminal and absorbing.
#[cw_serde]
#[derive(Copy, Eq, PartialOrd, Ord)]
pub enum OrderStatus {
    Pending = 0,
    Executed = 1,
    Cancelled = 2,
    Expired = 3,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderStatus::Pending),
            1 => Some(OrderStatus::Executed),
            2 => Some(OrderStatus::Cancelled),
            3 => Some(OrderStatus::Expired),
            _ => None,
        }
    }
}

/// A user's standing instruction to swap a held amount when the AMM's spot
/// price reaches `target_num / target_denom` or better.
#[cw_serde]
pub struct Order {
    pub order_id: u64,
    pub owner: Addr,
    pub from_token: AssetInfo,
    pub from_amount: Uint128,
    pub to_token: AssetInfo,
    pub target_num: u64,
    pub target_denom: u64,
    pub slippage_bp: u16,
    pub created_at: u64,
    pub expires_at: u64,
    pub status: OrderStatus,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    /// The stored `target_num/target_denom` fraction as a [`Price`], ready
    /// for [`gridiron_limit_order_price_math::min_out`].
    pub fn target_price(&self) -> Result<Price, PriceError> {
        Price::from_parts(self.target_num, self.target_denom)
    }
}
