//! Pure decimal-to-fraction price conversion and min-output arithmetic.
//!
//! Nothing in this crate touches storage, a querier, or an entry point — it
//! exists so the order book contract and the executor compute economics
//! identically without either one trusting the other's arithmetic.

pub mod error;
pub mod price;

pub use error::PriceError;
pub use price::{min_out, spot_price, Price};
