use cosmwasm_std::StdError;
use thiserror::Error;

use gridiron_limit_order_amm_adapter::AdapterError;
use gridiron_limit_order_price_math::PriceError;

/// This enum describes order book contract errors
#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Price(#[from] PriceError),

    #[error("{0}")]
    Adapter(#[from] AdapterError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Contract is paused")]
    Paused {},

    #[error("Token {0} is not whitelisted")]
    InvalidToken(String),

    #[error("from_token and to_token must differ")]
    SameAsset {},

    #[error("Amount must be greater than zero")]
    ZeroAmount {},

    #[error("Slippage {given} bp exceeds the configured maximum of {max} bp")]
    SlippageTooHigh { given: u16, max: u16 },

    #[error("Duration must be between {min} and {max} seconds")]
    InvalidDuration { min: u64, max: u64 },

    #[error("Order {0} does not exist")]
    OrderNotFound(u64),

    #[error("Order is not in Pending status")]
    NotPending {},

    #[error("Order has already expired")]
    Expired {},

    #[error("Caller is not the order owner")]
    NotOwner {},

    #[error("Caller is not the configured executor")]
    NotExecutor {},

    #[error("No swap is currently in flight")]
    NoInFlightSwap {},
}
