use thiserror::Error;

/// Errors raised by the price math package. Never mutates anything — every
/// variant here corresponds to a precondition violated before arithmetic
/// would otherwise silently misbehave.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum PriceError {
    #[error("price out of range: decimals difference exceeds the safe-integer precision budget")]
    PriceOutOfRange {},

    #[error("pool reserve is zero")]
    ZeroReserve {},

    #[error("input amount is zero")]
    ZeroInput {},
}
