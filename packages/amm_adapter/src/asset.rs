use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_binary, Addr, Api, BankMsg, Coin, CosmosMsg, StdResult, Uint128, WasmMsg};
use cw20::Cw20ExecuteMsg;

/// A token the order book can hold: either a native chain denom or a CW20
/// contract address. This is the `TokenId` of the limit order data model —
/// whitelisting, decimals lookup and the AMM adapter all key off it.
#[cw_serde]
#[derive(Eq, Hash)]
pub enum AssetInfo {
    Token { contract_addr: Addr },
    NativeToken { denom: String },
}

impl fmt::Display for AssetInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssetInfo::NativeToken { denom } => write!(f, "{denom}"),
            AssetInfo::Token { contract_addr } => write!(f, "{contract_addr}"),
        }
    }
}

impl AssetInfo {
    pub fn is_native_token(&self) -> bool {
        matches!(self, AssetInfo::NativeToken { .. })
    }

    pub fn check(&self, api: &dyn Api) -> StdResult<()> {
        if let AssetInfo::Token { contract_addr } = self {
            api.addr_validate(contract_addr.as_str())?;
        }
        Ok(())
    }
}

/// An amount of a specific [`AssetInfo`], e.g. the payment attached to
/// `createLimitOrder` or the offer side of a pool swap.
#[cw_serde]
pub struct Asset {
    pub info: AssetInfo,
    pub amount: Uint128,
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.info)
    }
}

impl Asset {
    /// Builds the message that delivers this asset to `recipient`: a
    /// `BankMsg::Send` for a native coin, a `Cw20ExecuteMsg::Transfer` wasm
    /// call for a CW20 token. Used both for refunds (`cancel`/`expire`) and
    /// for the reply-side payout once a swap is confirmed.
    pub fn transfer_msg(&self, recipient: &Addr) -> StdResult<CosmosMsg> {
        match &self.info {
            AssetInfo::NativeToken { denom } => Ok(CosmosMsg::Bank(BankMsg::Send {
                to_address: recipient.to_string(),
                amount: vec![Coin {
                    denom: denom.clone(),
                    amount: self.amount,
                }],
            })),
            AssetInfo::Token { contract_addr } => Ok(CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: contract_addr.to_string(),
                msg: to_binary(&Cw20ExecuteMsg::Transfer {
                    recipient: recipient.to_string(),
                    amount: self.amount,
                })?,
                funds: vec![],
            })),
        }
    }
}
