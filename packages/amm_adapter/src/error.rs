use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AdapterError {
    #[error("pool unavailable: {0}")]
    PoolUnavailable(String),
}
