//! Shared value types passed between the executor's own modules. `Order`,
//! `OrderStatus` and the event payload shapes live in `gridiron-limit-order-types`
//! instead — this module only holds executor-local state.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("external I/O error: {0}")]
    ExternalIo(String),

    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] gridiron_limit_order_price_math::PriceError),
}
