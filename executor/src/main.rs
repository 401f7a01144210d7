mod chain_client;
mod config;
mod cooldown;
mod status_api;
mod sweep;
mod types;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use chain_client::{ChainClient, CosmosChainClient};
use cooldown::CooldownTable;
use status_api::ExecutorStatus;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = match config::load_config() {
        Ok(config) => config,
        Err(e) => {
            // The status API still needs to report why, so this is not a
            // bare process exit: fall through with executor disabled.
            error!(error = %e, "configuration error, executor will stay disabled");
            return run_disabled_status_api(e.to_string()).await;
        }
    };

    let cooldown = Arc::new(RwLock::new(CooldownTable::new(config.cooldown_s)));
    let status = Arc::new(ExecutorStatus::new(
        config.enable_executor,
        operator_identifier(&config.operator_key_path),
        config.check_interval_s * 1_000,
        config.cooldown_s * 1_000,
        config.contract_address.clone(),
    ));

    let status_api_task = tokio::spawn(status_api::serve(
        config.status_api_addr.clone(),
        status.clone(),
        cooldown.clone(),
    ));

    if !config.enable_executor {
        info!("ENABLE_EXECUTOR is false, sweep loop will not start");
        status_api_task.await??;
        return Ok(());
    }

    let client: Arc<dyn ChainClient> = Arc::new(build_chain_client(&config)?);

    let sweep_task = tokio::spawn(run_sweep_loop(client, config.clone(), cooldown, status.clone()));

    tokio::select! {
        result = sweep_task => {
            if let Err(e) = result {
                error!(error = %e, "sweep task panicked");
            }
        }
        _ = shutdown_signal() => {
            info!("received shutdown signal, finishing in-flight order before exit");
        }
    }

    Ok(())
}

/// Resolves on Ctrl-C or, on unix targets, SIGTERM — either one is treated
/// as the shutdown request the spec calls for, racing against the sweep
/// loop at the order boundary (the sweep task itself is never aborted
/// mid-order; this future only decides when `main` stops waiting on it).
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn run_sweep_loop(
    client: Arc<dyn ChainClient>,
    config: config::ExecutorConfig,
    cooldown: Arc<RwLock<CooldownTable>>,
    status: Arc<ExecutorStatus>,
) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(config.check_interval_s));

    loop {
        interval.tick().await;

        if status.running.swap(true, Ordering::Relaxed) {
            warn!("previous sweep still marked running, skipping this tick to avoid overlap");
            continue;
        }

        let confirmed = sweep::run_sweep(client.as_ref(), &config, &cooldown).await;
        status.sweep_count.fetch_add(1, Ordering::Relaxed);
        status.running.store(false, Ordering::Relaxed);

        if confirmed > 0 {
            info!(confirmed, "sweep finished");
        }
    }
}

fn build_chain_client(config: &config::ExecutorConfig) -> anyhow::Result<CosmosChainClient> {
    use cosmrs::crypto::secp256k1::SigningKey;

    let key_bytes = std::fs::read(&config.operator_key_path)
        .map_err(|e| anyhow::anyhow!("failed to read OPERATOR_KEY_PATH: {e}"))?;
    let signing_key = SigningKey::from_slice(&key_bytes)
        .map_err(|e| anyhow::anyhow!("invalid operator signing key: {e}"))?;
    let account = signing_key
        .public_key()
        .account_id("cosmos")
        .map_err(|e| anyhow::anyhow!("failed to derive operator account: {e}"))?;

    CosmosChainClient::new(
        &config.chain_rpc_url,
        signing_key,
        account,
        "gridiron-1",
        "uusdc",
    )
    .map_err(|e| anyhow::anyhow!(e.to_string()))
}

/// The status API reports the key path rather than the derived bech32
/// address: deriving it would mean loading the key before the status API
/// starts, defeating the point of serving `/health` before key load can fail.
fn operator_identifier(key_path: &str) -> String {
    if key_path.is_empty() {
        "unconfigured".to_string()
    } else {
        key_path.to_string()
    }
}

/// Serves only `/health`/`/executor/status` forever, with the executor
/// permanently disabled, for the startup-configuration-error path.
async fn run_disabled_status_api(reason: String) -> anyhow::Result<()> {
    let cooldown = Arc::new(RwLock::new(CooldownTable::new(0)));
    let status = Arc::new(ExecutorStatus::new(
        false,
        "unconfigured".to_string(),
        0,
        0,
        format!("unavailable: {reason}"),
    ));

    status_api::serve("127.0.0.1:8090".to_string(), status, cooldown).await
}
