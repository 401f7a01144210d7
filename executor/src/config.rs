//! Configuration loading. Every environment variable has a typed field and a
//! documented default; a missing operator key or contract address is a fatal
//! `Configuration` error surfaced at startup, not a panic deep in the sweep.

use anyhow::{Context, Result};

use crate::types::ExecutorError;

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub check_interval_s: u64,
    pub cooldown_s: u64,
    pub operator_key_path: String,
    pub contract_address: String,
    pub chain_rpc_url: String,
    pub amm_query_url: String,
    pub exec_gas: u64,
    pub enable_executor: bool,
    pub status_api_addr: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} is set to an invalid value: {e}")),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e.into()),
    }
}

/// Loads configuration from process environment, falling back to a `.env`
/// file in the working directory if present. `OPERATOR_KEY_PATH` and
/// `CONTRACT_ADDRESS` have no default and are required once `ENABLE_EXECUTOR`
/// is true.
pub fn load_config() -> Result<ExecutorConfig> {
    dotenv::dotenv().ok();

    let enable_executor: bool = env_or("ENABLE_EXECUTOR", true)?;

    let operator_key_path = std::env::var("OPERATOR_KEY_PATH").unwrap_or_default();
    let contract_address = std::env::var("CONTRACT_ADDRESS").unwrap_or_default();

    if enable_executor {
        if operator_key_path.is_empty() {
            return Err(ExecutorError::Configuration(
                "OPERATOR_KEY_PATH must be set when ENABLE_EXECUTOR is true".to_string(),
            )
            .into());
        }
        if contract_address.is_empty() {
            return Err(ExecutorError::Configuration(
                "CONTRACT_ADDRESS must be set when ENABLE_EXECUTOR is true".to_string(),
            )
            .into());
        }
    }

    Ok(ExecutorConfig {
        check_interval_s: env_or("CHECK_INTERVAL_S", 30u64).context("CHECK_INTERVAL_S")?,
        cooldown_s: env_or("COOLDOWN_S", 300u64).context("COOLDOWN_S")?,
        operator_key_path,
        contract_address,
        chain_rpc_url: std::env::var("CHAIN_RPC_URL")
            .unwrap_or_else(|_| "http://localhost:26657".to_string()),
        amm_query_url: std::env::var("AMM_QUERY_URL")
            .unwrap_or_else(|_| "http://localhost:26657".to_string()),
        exec_gas: env_or("EXEC_GAS", 80_000_000u64).context("EXEC_GAS")?,
        enable_executor,
        status_api_addr: std::env::var("STATUS_API_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8090".to_string()),
    })
}
