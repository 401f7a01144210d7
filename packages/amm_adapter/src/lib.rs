//! The single dependency boundary onto the external AMM pool an order book
//! contract swaps through. Nothing else about the AMM leaks past this
//! crate: callers see [`PoolSnapshot`] and a [`cosmwasm_std::CosmosMsg`],
//! never the pool's own message types directly.

pub mod adapter;
pub mod asset;
pub mod error;
pub mod pool;

pub use adapter::{build_swap_payload, get_reserves};
pub use asset::{Asset, AssetInfo};
pub use error::AdapterError;
pub use pool::{PoolCw20HookMsg, PoolExecuteMsg, PoolQueryMsg, PoolResponse, PoolSnapshot};
