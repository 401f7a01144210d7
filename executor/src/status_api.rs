//! Minimal HTTP status surface: `GET /health` and `GET /executor/status`.
//! No authentication — meant to be reached only from the operator's own
//! network. Runs as its own `tokio` task, independent of the sweep loop, and
//! reads status fields the sweep updates atomically through `ExecutorStatus`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::cooldown::CooldownTable;

/// In-memory counters and flags the sweep task updates as a single atomic
/// write per field — the minimal safe sharing primitive the concurrency
/// model calls for, no broader lock needed since the status API never
/// writes.
pub struct ExecutorStatus {
    pub enabled: AtomicBool,
    pub running: AtomicBool,
    pub operator_address: String,
    pub check_interval_ms: u64,
    pub cooldown_ms: u64,
    pub contract_address: String,
    pub sweep_count: AtomicUsize,
}

impl ExecutorStatus {
    pub fn new(
        enabled: bool,
        operator_address: String,
        check_interval_ms: u64,
        cooldown_ms: u64,
        contract_address: String,
    ) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            running: AtomicBool::new(false),
            operator_address,
            check_interval_ms,
            cooldown_ms,
            contract_address,
            sweep_count: AtomicUsize::new(0),
        }
    }
}

#[derive(Clone)]
struct ApiState {
    status: Arc<ExecutorStatus>,
    cooldown: Arc<RwLock<CooldownTable>>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    executor: HealthExecutor,
}

#[derive(Serialize)]
struct HealthExecutor {
    enabled: bool,
    running: bool,
}

#[derive(Serialize)]
struct ExecutorStatusResponse {
    running: bool,
    operator_address: String,
    check_interval_ms: u64,
    cooldown_ms: u64,
    attempted_count: usize,
    contract_address: String,
    sweep_count: usize,
}

async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "gridiron-limit-order-executor",
        executor: HealthExecutor {
            enabled: state.status.enabled.load(Ordering::Relaxed),
            running: state.status.running.load(Ordering::Relaxed),
        },
    })
}

async fn executor_status(State(state): State<ApiState>) -> Json<ExecutorStatusResponse> {
    let attempted_count = state.cooldown.read().await.attempted_count();

    Json(ExecutorStatusResponse {
        running: state.status.running.load(Ordering::Relaxed),
        operator_address: state.status.operator_address.clone(),
        check_interval_ms: state.status.check_interval_ms,
        cooldown_ms: state.status.cooldown_ms,
        attempted_count,
        contract_address: state.status.contract_address.clone(),
        sweep_count: state.status.sweep_count.load(Ordering::Relaxed),
    })
}

/// Operator intervention only — not on-chain surface. Clears a single
/// order's cooldown entry so the next sweep retries it immediately instead
/// of waiting out the deferral.
async fn clear_cooldown(
    State(state): State<ApiState>,
    Path(order_id): Path<u64>,
) -> Json<serde_json::Value> {
    state.cooldown.write().await.clear(order_id);
    Json(serde_json::json!({ "cleared": order_id }))
}

/// Operator intervention only. Clears every cooldown entry.
async fn clear_all_cooldowns(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let cleared = state.cooldown.read().await.attempted_count();
    state.cooldown.write().await.clear_all();
    Json(serde_json::json!({ "cleared_count": cleared }))
}

/// Serves the status API on `addr` until the process exits. Started before
/// the operator key is loaded so a fatal configuration error still leaves a
/// reachable `/health` endpoint reporting `executor.enabled=false`.
pub async fn serve(
    addr: String,
    status: Arc<ExecutorStatus>,
    cooldown: Arc<RwLock<CooldownTable>>,
) -> anyhow::Result<()> {
    let state = ApiState { status, cooldown };

    let app = Router::new()
        .route("/health", get(health))
        .route("/executor/status", get(executor_status))
        .route("/executor/cooldown/:order_id", delete(clear_cooldown))
        .route("/executor/cooldown", delete(clear_all_cooldowns))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr, "status API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
