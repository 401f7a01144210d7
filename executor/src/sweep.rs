//! The per-sweep algorithm: fetch pending orders, skip cooled-down and
//! stale ones, compare spot price against each order's target, and submit
//! `executeLimitOrder` for every order whose condition is met. One sweep is
//! the unit of ordering — no two sweeps run concurrently, and the sweep
//! processes orders strictly sequentially.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;
use tracing::{info, warn};

use gridiron_limit_order_price_math::{spot_price, Price};
use gridiron_limit_order_types::Order;

use crate::chain_client::ChainClient;
use crate::config::ExecutorConfig;
use crate::cooldown::CooldownTable;

fn current_unix_time() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the unix epoch")
        .as_secs()
}

/// Runs one sweep over every currently-pending order. Returns the number of
/// `executeLimitOrder` transactions confirmed during this sweep.
pub async fn run_sweep(
    client: &dyn ChainClient,
    config: &ExecutorConfig,
    cooldown: &Arc<RwLock<CooldownTable>>,
) -> usize {
    let now = current_unix_time();
    run_sweep_at(client, config, cooldown, now).await
}

async fn run_sweep_at(
    client: &dyn ChainClient,
    config: &ExecutorConfig,
    cooldown: &Arc<RwLock<CooldownTable>>,
    now: u64,
) -> usize {
    let orders = match client.get_pending_orders(&config.contract_address).await {
        Ok(orders) => orders,
        Err(e) => {
            warn!(error = %e, "failed to fetch pending orders, skipping this sweep");
            return 0;
        }
    };

    if orders.is_empty() {
        return 0;
    }

    let pool = match client.get_pool(&config.contract_address).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "failed to fetch pool address, skipping this sweep");
            return 0;
        }
    };

    let mut confirmed = 0;

    for order in orders {
        if process_order(client, config, cooldown, &pool, &order, now).await {
            confirmed += 1;
        }
    }

    confirmed
}

/// Step b-g of the per-order algorithm. Step a (the cooldown check) happens
/// in the caller-adjacent read below; returns `true` iff the order's
/// `executeLimitOrder` transaction was confirmed this sweep.
async fn process_order(
    client: &dyn ChainClient,
    config: &ExecutorConfig,
    cooldown: &Arc<RwLock<CooldownTable>>,
    pool: &str,
    order: &Order,
    now: u64,
) -> bool {
    let order_id = order.order_id;

    {
        let table = cooldown.read().await;
        if table.is_cooling_down(order_id, now) {
            return false;
        }
    }

    // Re-fetch: the order passed into this sweep is a snapshot from step 1;
    // confirm it still exists and is still pending before spending an RPC
    // round trip on pricing.
    let current = match client.get_order(&config.contract_address, order_id).await {
        Ok(Some(order)) => order,
        Ok(None) => {
            cooldown.write().await.clear(order_id);
            return false;
        }
        Err(e) => {
            warn!(order_id, error = %e, "failed to refetch order, skipping");
            return false;
        }
    };

    if !current.is_pending() {
        cooldown.write().await.clear(order_id);
        return false;
    }

    if current.is_expired(now) {
        cooldown.write().await.clear(order_id);
        return false;
    }

    let decimals_from = match client
        .get_token_decimals(&config.contract_address, &current.from_token)
        .await
    {
        Ok(d) => d,
        Err(e) => {
            warn!(order_id, error = %e, "failed to fetch from_token decimals, skipping");
            return false;
        }
    };
    let decimals_to = match client
        .get_token_decimals(&config.contract_address, &current.to_token)
        .await
    {
        Ok(d) => d,
        Err(e) => {
            warn!(order_id, error = %e, "failed to fetch to_token decimals, skipping");
            return false;
        }
    };

    let snapshot = match client
        .get_pool_snapshot(
            pool,
            &current.from_token,
            &current.to_token,
            decimals_from,
            decimals_to,
        )
        .await
    {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(order_id, error = %e, "failed to fetch pool reserves, skipping");
            return false;
        }
    };

    let p = match spot_price(
        snapshot.reserve_from,
        snapshot.reserve_to,
        snapshot.decimals_from,
        snapshot.decimals_to,
    ) {
        Ok(p) => p,
        Err(e) => {
            warn!(order_id, error = %e, "failed to compute spot price, skipping");
            return false;
        }
    };

    let target = current.target_num as f64 / current.target_denom as f64;
    if p > target {
        return false;
    }

    let (current_num, current_denom) = match Price::from_decimal(p, decimals_from, decimals_to) {
        Ok(price) => (price.num(), price.denom()),
        Err(_) => (current.target_num, current.target_denom),
    };

    // Recorded before submission: a crash between this line and confirmation
    // leaves a cooldown entry in place rather than allowing an immediate
    // retry against a transaction that may still land.
    cooldown.write().await.record_attempt(order_id, now);

    match client
        .execute_limit_order(
            &config.contract_address,
            order_id,
            current_num,
            current_denom,
            config.exec_gas,
        )
        .await
    {
        Ok(true) => {
            info!(order_id, spot_price = p, target, "executeLimitOrder confirmed");
            cooldown.write().await.clear(order_id);
            true
        }
        Ok(false) | Err(_) => {
            warn!(order_id, "executeLimitOrder did not confirm, leaving cooldown in place");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain_client::mock::MockChainClient;
    use cosmwasm_std::testing::MockApi;
    use cosmwasm_std::Uint128;
    use gridiron_limit_order_amm_adapter::AssetInfo;
    use gridiron_limit_order_types::OrderStatus;

    fn config() -> ExecutorConfig {
        ExecutorConfig {
            check_interval_s: 30,
            cooldown_s: 300,
            operator_key_path: "key.json".to_string(),
            contract_address: "order_book0000".to_string(),
            chain_rpc_url: "http://localhost:26657".to_string(),
            amm_query_url: "http://localhost:26657".to_string(),
            exec_gas: 80_000_000,
            enable_executor: true,
            status_api_addr: "127.0.0.1:8090".to_string(),
        }
    }

    fn sample_order(api: &MockApi, order_id: u64, target_num: u64, target_denom: u64) -> Order {
        Order {
            order_id,
            owner: api.addr_validate("owner000000000000000000000000000000").unwrap(),
            from_token: AssetInfo::NativeToken {
                denom: "uusdc".to_string(),
            },
            from_amount: Uint128::new(1_000_000),
            to_token: AssetInfo::NativeToken {
                denom: "uluna".to_string(),
            },
            target_num,
            target_denom,
            slippage_bp: 100,
            created_at: 1_000,
            expires_at: 100_000,
            status: OrderStatus::Pending,
        }
    }

    #[tokio::test]
    async fn triggers_execution_when_spot_price_meets_target() {
        let api = MockApi::default();
        let order = sample_order(&api, 1, 5, 1);

        let client = MockChainClient {
            orders: std::sync::Mutex::new(vec![order]),
            pool: std::sync::Mutex::new("pool0000".to_string()),
            pool_snapshot: std::sync::Mutex::new(Some(gridiron_limit_order_amm_adapter::PoolSnapshot {
                reserve_from: 1_000_000_000,
                reserve_to: 5_000_000_000,
                decimals_from: 6,
                decimals_to: 6,
            })),
            executions: std::sync::Mutex::new(vec![]),
            fail_execution: std::sync::Mutex::new(false),
            decimals: std::sync::Mutex::new(Default::default()),
        };

        let cooldown = Arc::new(RwLock::new(CooldownTable::new(300)));
        let confirmed = run_sweep_at(&client, &config(), &cooldown, 2_000).await;

        assert_eq!(confirmed, 1);
        assert_eq!(*client.executions.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn does_not_trigger_when_spot_price_is_above_target() {
        let api = MockApi::default();
        let order = sample_order(&api, 1, 1, 1);

        let client = MockChainClient {
            orders: std::sync::Mutex::new(vec![order]),
            pool: std::sync::Mutex::new("pool0000".to_string()),
            pool_snapshot: std::sync::Mutex::new(Some(gridiron_limit_order_amm_adapter::PoolSnapshot {
                reserve_from: 1_000_000_000,
                reserve_to: 5_000_000_000,
                decimals_from: 6,
                decimals_to: 6,
            })),
            executions: std::sync::Mutex::new(vec![]),
            fail_execution: std::sync::Mutex::new(false),
            decimals: std::sync::Mutex::new(Default::default()),
        };

        let cooldown = Arc::new(RwLock::new(CooldownTable::new(300)));
        let confirmed = run_sweep_at(&client, &config(), &cooldown, 2_000).await;

        assert_eq!(confirmed, 0);
        assert!(client.executions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn skips_an_order_still_in_cooldown() {
        let api = MockApi::default();
        let order = sample_order(&api, 1, 5, 1);

        let client = MockChainClient {
            orders: std::sync::Mutex::new(vec![order]),
            pool: std::sync::Mutex::new("pool0000".to_string()),
            pool_snapshot: std::sync::Mutex::new(Some(gridiron_limit_order_amm_adapter::PoolSnapshot {
                reserve_from: 1_000_000_000,
                reserve_to: 5_000_000_000,
                decimals_from: 6,
                decimals_to: 6,
            })),
            executions: std::sync::Mutex::new(vec![]),
            fail_execution: std::sync::Mutex::new(false),
            decimals: std::sync::Mutex::new(Default::default()),
        };

        let cooldown = Arc::new(RwLock::new(CooldownTable::new(300)));
        cooldown.write().await.record_attempt(1, 1_900);

        let confirmed = run_sweep_at(&client, &config(), &cooldown, 2_000).await;

        assert_eq!(confirmed, 0);
        assert!(client.executions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn drops_cooldown_for_an_order_that_already_expired() {
        let api = MockApi::default();
        let mut order = sample_order(&api, 1, 5, 1);
        order.expires_at = 1_500;

        let client = MockChainClient {
            orders: std::sync::Mutex::new(vec![order]),
            pool: std::sync::Mutex::new("pool0000".to_string()),
            pool_snapshot: std::sync::Mutex::new(None),
            executions: std::sync::Mutex::new(vec![]),
            fail_execution: std::sync::Mutex::new(false),
            decimals: std::sync::Mutex::new(Default::default()),
        };

        let cooldown = Arc::new(RwLock::new(CooldownTable::new(300)));
        cooldown.write().await.record_attempt(1, 1_000);

        let confirmed = run_sweep_at(&client, &config(), &cooldown, 2_000).await;

        assert_eq!(confirmed, 0);
        assert_eq!(cooldown.read().await.attempted_count(), 0);
    }

    #[tokio::test]
    async fn leaves_cooldown_in_place_when_execution_fails() {
        let api = MockApi::default();
        let order = sample_order(&api, 1, 5, 1);

        let client = MockChainClient {
            orders: std::sync::Mutex::new(vec![order]),
            pool: std::sync::Mutex::new("pool0000".to_string()),
            pool_snapshot: std::sync::Mutex::new(Some(gridiron_limit_order_amm_adapter::PoolSnapshot {
                reserve_from: 1_000_000_000,
                reserve_to: 5_000_000_000,
                decimals_from: 6,
                decimals_to: 6,
            })),
            executions: std::sync::Mutex::new(vec![]),
            fail_execution: std::sync::Mutex::new(true),
            decimals: std::sync::Mutex::new(Default::default()),
        };

        let cooldown = Arc::new(RwLock::new(CooldownTable::new(300)));
        let confirmed = run_sweep_at(&client, &config(), &cooldown, 2_000).await;

        assert_eq!(confirmed, 0);
        assert_eq!(cooldown.read().await.attempted_count(), 1);
    }
}
