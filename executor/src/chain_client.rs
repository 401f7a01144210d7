//! The executor's one dependency boundary onto the chain: querying contract
//! state and broadcasting signed transactions. `ChainClient` is a trait so
//! `sweep.rs`'s decision logic can be driven by a `MockChainClient` test
//! double in unit tests, the same "swap the I/O boundary, keep the decision
//! logic under test" split `cw-multi-test` gives the contract side.

use std::time::Duration;

use async_trait::async_trait;
use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::rpc::{Client, HttpClient};
use cosmrs::tx::{BodyBuilder, Fee, SignDoc, SignerInfo};
use cosmrs::{AccountId, Coin as CosmrsCoin};
use tracing::{debug, warn};

use gridiron_limit_order_amm_adapter::{AssetInfo, PoolQueryMsg, PoolResponse, PoolSnapshot};
use gridiron_limit_order_types::Order;

use crate::types::ExecutorError;

const RPC_TIMEOUT: Duration = Duration::from_secs(10);
const CONFIRMATION_POLLS: u32 = 20;
const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Matches `order_book`'s own `MAX_PAGE_LIMIT` (query.rs) — the largest page
/// the contract will ever hand back in one response, used here to walk
/// every page of pending orders rather than silently stopping at the first.
const PENDING_ORDERS_PAGE_LIMIT: u32 = 100;

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_pending_orders(&self, contract: &str) -> Result<Vec<Order>, ExecutorError>;

    async fn get_order(&self, contract: &str, order_id: u64) -> Result<Option<Order>, ExecutorError>;

    /// The pool address the order book currently swaps through. Queried
    /// once per sweep rather than cached, since `setPool` can change it.
    async fn get_pool(&self, contract: &str) -> Result<String, ExecutorError>;

    /// Decimals recorded for `token` in the contract's whitelist, the same
    /// registry `price_to_fraction`/`spot_price` need at order-creation
    /// time. Looked up per order rather than cached locally, since
    /// `whitelist_token`/`remove_token` can change the registry at any time.
    async fn get_token_decimals(
        &self,
        contract: &str,
        token: &AssetInfo,
    ) -> Result<u8, ExecutorError>;

    async fn get_pool_snapshot(
        &self,
        pool: &str,
        from: &AssetInfo,
        to: &AssetInfo,
        decimals_from: u8,
        decimals_to: u8,
    ) -> Result<PoolSnapshot, ExecutorError>;

    /// Signs and broadcasts `executeLimitOrder(order_id, current_num,
    /// current_denom)`, then polls for inclusion. Returns `true` only once
    /// the transaction is confirmed; a timeout or broadcast failure returns
    /// an error instead, never a bare `false`, so the caller always knows
    /// whether a cooldown should be left in place because a tx may still be
    /// pending.
    async fn execute_limit_order(
        &self,
        contract: &str,
        order_id: u64,
        current_num: u64,
        current_denom: u64,
        gas: u64,
    ) -> Result<bool, ExecutorError>;
}

/// Real chain I/O via `cosmrs` tx building/signing and `tendermint-rpc`
/// broadcast/query. One `HttpClient` per process, matching the single
/// operator-wallet-per-instance constraint.
pub struct CosmosChainClient {
    rpc: HttpClient,
    signing_key: SigningKey,
    account: AccountId,
    chain_id: cosmrs::tendermint::chain::Id,
    gas_price_denom: String,
}

impl CosmosChainClient {
    pub fn new(
        rpc_url: &str,
        signing_key: SigningKey,
        account: AccountId,
        chain_id: &str,
        gas_price_denom: &str,
    ) -> Result<Self, ExecutorError> {
        let rpc = HttpClient::new(rpc_url)
            .map_err(|e| ExecutorError::Configuration(format!("invalid CHAIN_RPC_URL: {e}")))?;
        let chain_id = chain_id
            .parse()
            .map_err(|e| ExecutorError::Configuration(format!("invalid chain id: {e}")))?;

        Ok(Self {
            rpc,
            signing_key,
            account,
            chain_id,
            gas_price_denom: gas_price_denom.to_string(),
        })
    }

    async fn query_smart<T: serde::Serialize, R: serde::de::DeserializeOwned>(
        &self,
        contract: &str,
        msg: &T,
    ) -> Result<R, ExecutorError> {
        let contract: AccountId = contract
            .parse()
            .map_err(|e| ExecutorError::Configuration(format!("invalid contract address: {e}")))?;
        let query_data = serde_json::to_vec(msg)
            .map_err(|e| ExecutorError::ExternalIo(format!("failed to encode query: {e}")))?;

        let path = "/cosmwasm.wasm.v1.Query/SmartContractState";
        let mut data = Vec::new();
        data.extend_from_slice(contract.to_string().as_bytes());
        data.extend_from_slice(&query_data);

        let response = tokio::time::timeout(RPC_TIMEOUT, self.rpc.abci_query(
            Some(path.to_string()),
            data,
            None,
            false,
        ))
        .await
        .map_err(|_| ExecutorError::ExternalIo("abci_query timed out".to_string()))?
        .map_err(|e| ExecutorError::ExternalIo(format!("abci_query failed: {e}")))?;

        serde_json::from_slice(&response.value)
            .map_err(|e| ExecutorError::ExternalIo(format!("failed to decode query response: {e}")))
    }
}

#[async_trait]
impl ChainClient for CosmosChainClient {
    async fn get_pending_orders(&self, contract: &str) -> Result<Vec<Order>, ExecutorError> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        enum Query {
            GetPendingOrders {
                start_after: Option<u64>,
                limit: Option<u32>,
            },
        }

        // `GetPendingOrders` caps each response at the contract's own page
        // limit, so a single unpaginated call silently drops ids past the
        // first page. Walk pages by `order_id` (the contract returns them
        // ascending) until a short page confirms there's nothing left.
        let mut orders = Vec::new();
        let mut start_after = None;

        loop {
            let page: Vec<Order> = self
                .query_smart(
                    contract,
                    &Query::GetPendingOrders {
                        start_after,
                        limit: Some(PENDING_ORDERS_PAGE_LIMIT),
                    },
                )
                .await?;

            let page_len = page.len();
            start_after = page.last().map(|o| o.order_id);
            orders.extend(page);

            if page_len < PENDING_ORDERS_PAGE_LIMIT as usize {
                break;
            }
        }

        Ok(orders)
    }

    async fn get_order(&self, contract: &str, order_id: u64) -> Result<Option<Order>, ExecutorError> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        enum Query {
            GetOrder { order_id: u64 },
        }

        match self
            .query_smart::<_, Order>(contract, &Query::GetOrder { order_id })
            .await
        {
            Ok(order) => Ok(Some(order)),
            Err(ExecutorError::ExternalIo(msg)) if msg.contains("not found") => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn get_pool(&self, contract: &str) -> Result<String, ExecutorError> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        enum Query {
            GetPool {},
        }

        self.query_smart(contract, &Query::GetPool {}).await
    }

    async fn get_token_decimals(
        &self,
        contract: &str,
        token: &AssetInfo,
    ) -> Result<u8, ExecutorError> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        enum Query {
            GetTokenDecimals { token: AssetInfo },
        }

        self.query_smart(
            contract,
            &Query::GetTokenDecimals {
                token: token.clone(),
            },
        )
        .await
    }

    async fn get_pool_snapshot(
        &self,
        pool: &str,
        from: &AssetInfo,
        to: &AssetInfo,
        decimals_from: u8,
        decimals_to: u8,
    ) -> Result<PoolSnapshot, ExecutorError> {
        let response: PoolResponse = self.query_smart(pool, &PoolQueryMsg::Pool {}).await?;
        let (reserve_from, reserve_to) = response
            .reserves_for(from, to)
            .ok_or_else(|| ExecutorError::ExternalIo("asset not found in pool response".to_string()))?;

        Ok(PoolSnapshot {
            reserve_from: reserve_from.u128(),
            reserve_to: reserve_to.u128(),
            decimals_from,
            decimals_to,
        })
    }

    async fn execute_limit_order(
        &self,
        contract: &str,
        order_id: u64,
        current_num: u64,
        current_denom: u64,
        gas: u64,
    ) -> Result<bool, ExecutorError> {
        #[derive(serde::Serialize)]
        #[serde(rename_all = "camelCase")]
        enum ExecuteMsg {
            ExecuteLimitOrder {
                order_id: u64,
                current_num: u64,
                current_denom: u64,
            },
        }

        let contract_addr: AccountId = contract
            .parse()
            .map_err(|e| ExecutorError::Configuration(format!("invalid contract address: {e}")))?;

        let msg = serde_json::to_vec(&ExecuteMsg::ExecuteLimitOrder {
            order_id,
            current_num,
            current_denom,
        })
        .map_err(|e| ExecutorError::ExternalIo(format!("failed to encode execute msg: {e}")))?;

        let exec_msg = cosmrs::cosmwasm::MsgExecuteContract {
            sender: self.account.clone(),
            contract: contract_addr,
            msg,
            funds: vec![],
        };

        let account_info = tokio::time::timeout(RPC_TIMEOUT, self.fetch_account_info())
            .await
            .map_err(|_| ExecutorError::ExternalIo("account query timed out".to_string()))??;

        let fee = Fee::from_amount_and_gas(
            CosmrsCoin {
                denom: self.gas_price_denom.parse().map_err(|e| {
                    ExecutorError::Configuration(format!("invalid gas denom: {e}"))
                })?,
                amount: (gas / 20) as u128,
            },
            gas,
        );

        let body = BodyBuilder::new()
            .msg(exec_msg.to_any().map_err(|e| {
                ExecutorError::ExternalIo(format!("failed to encode cosmos message: {e}"))
            })?)
            .memo(format!("executeLimitOrder({order_id})"))
            .finish();

        let auth_info = SignerInfo::single_direct(
            Some(self.signing_key.public_key()),
            account_info.sequence,
        )
        .auth_info(fee);

        let sign_doc = SignDoc::new(&body, &auth_info, &self.chain_id, account_info.account_number)
            .map_err(|e| ExecutorError::ExternalIo(format!("failed to build sign doc: {e}")))?;

        let tx_raw = sign_doc
            .sign(&self.signing_key)
            .map_err(|e| ExecutorError::ExternalIo(format!("signing failed: {e}")))?;

        let tx_bytes = tx_raw
            .to_bytes()
            .map_err(|e| ExecutorError::ExternalIo(format!("failed to serialize tx: {e}")))?;

        let broadcast = tokio::time::timeout(
            RPC_TIMEOUT,
            self.rpc.broadcast_tx_sync(tx_bytes),
        )
        .await
        .map_err(|_| ExecutorError::ExternalIo("broadcast timed out".to_string()))?
        .map_err(|e| ExecutorError::ExternalIo(format!("broadcast failed: {e}")))?;

        if broadcast.code.is_err() {
            return Err(ExecutorError::ExternalIo(format!(
                "tx rejected by mempool: {}",
                broadcast.log
            )));
        }

        self.wait_for_confirmation(&broadcast.hash.to_string()).await
    }
}

impl CosmosChainClient {
    async fn fetch_account_info(&self) -> Result<AccountInfo, ExecutorError> {
        let response = self
            .rpc
            .abci_query(
                Some("/cosmos.auth.v1beta1.Query/Account".to_string()),
                self.account.to_string().into_bytes(),
                None,
                false,
            )
            .await
            .map_err(|e| ExecutorError::ExternalIo(format!("account query failed: {e}")))?;

        #[derive(serde::Deserialize)]
        struct RawAccount {
            account_number: u64,
            sequence: u64,
        }

        let raw: RawAccount = serde_json::from_slice(&response.value)
            .map_err(|e| ExecutorError::ExternalIo(format!("failed to decode account info: {e}")))?;

        Ok(AccountInfo {
            account_number: raw.account_number,
            sequence: raw.sequence,
        })
    }

    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<bool, ExecutorError> {
        for attempt in 0..CONFIRMATION_POLLS {
            tokio::time::sleep(CONFIRMATION_POLL_INTERVAL).await;

            let hash = tx_hash
                .parse()
                .map_err(|e| ExecutorError::ExternalIo(format!("invalid tx hash: {e}")))?;

            match tokio::time::timeout(RPC_TIMEOUT, self.rpc.tx(hash, false)).await {
                Ok(Ok(result)) => {
                    if result.tx_result.code.is_err() {
                        return Err(ExecutorError::ExternalIo(format!(
                            "tx reverted: {}",
                            result.tx_result.log
                        )));
                    }
                    return Ok(true);
                }
                Ok(Err(_)) => {
                    debug!(attempt, tx_hash, "tx not yet included, retrying");
                }
                Err(_) => {
                    warn!(attempt, tx_hash, "confirmation poll timed out");
                }
            }
        }

        Err(ExecutorError::ExternalIo(format!(
            "tx {tx_hash} not confirmed after {CONFIRMATION_POLLS} polls"
        )))
    }
}

struct AccountInfo {
    account_number: u64,
    sequence: u64,
}
