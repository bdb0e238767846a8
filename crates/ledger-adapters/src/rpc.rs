//! EVM JSON-RPC ledger adapter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::{
    Address, IdentityProvider, LedgerCall, LedgerFault, LedgerMutation, LedgerQuery,
    PendingTransaction, ProductId, RawHistory, RawProduct, Receipt, TxHash,
};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::abi;

/// Errors that can occur when talking to the node.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON-RPC error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },
    #[error("Failed to parse response: {0}")]
    Parse(String),
    #[error("Connection failed: {0}")]
    Connection(String),
}

impl RpcError {
    /// Revert reason carried by a node error, if the error is a revert.
    ///
    /// Nodes report reverts either as `data` holding the ABI-encoded
    /// `Error(string)` payload, or only as an `execution reverted: ...`
    /// message.
    pub fn revert_reason(&self) -> Option<String> {
        let RpcError::Rpc { message, data, .. } = self else {
            return None;
        };

        let from_data = data
            .as_ref()
            .and_then(revert_data)
            .and_then(|bytes| abi::decode_revert_reason(&bytes));
        if from_data.is_some() {
            return from_data;
        }

        message
            .strip_prefix("execution reverted")
            .map(|rest| rest.trim_start_matches(':').trim().to_string())
    }
}

/// Revert bytes from an error `data` field: either a hex string or an
/// object with a nested `data` hex string.
fn revert_data(value: &serde_json::Value) -> Option<Vec<u8>> {
    match value {
        serde_json::Value::String(s) => decode_hex(s).ok(),
        serde_json::Value::Object(map) => map.get("data").and_then(revert_data),
        _ => None,
    }
}

impl From<RpcError> for LedgerFault {
    fn from(e: RpcError) -> Self {
        if let Some(reason) = e.revert_reason() {
            return LedgerFault::Reverted { reason };
        }
        match e {
            RpcError::Parse(msg) => LedgerFault::Malformed(msg),
            RpcError::Rpc { code, message, .. } => {
                LedgerFault::Rejected(format!("{message} (code {code})"))
            }
            other => LedgerFault::Transport(other.to_string()),
        }
    }
}

/// Node connection settings.
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub url: String,
    pub contract: Address,
    pub request_timeout: Duration,
    pub receipt_poll_interval: Duration,
}

impl RpcConfig {
    pub fn new(url: impl Into<String>, contract: Address) -> Self {
        Self {
            url: url.into(),
            contract,
            request_timeout: Duration::from_secs(10),
            receipt_poll_interval: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<T> {
    jsonrpc: &'static str,
    method: &'static str,
    params: T,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: serde_json::Value,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// `eth_call` / `eth_sendTransaction` transaction object.
#[derive(Debug, Clone, Serialize)]
struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<String>,
    to: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionReceipt {
    block_number: Option<String>,
    status: Option<String>,
}

fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn decode_hex(s: &str) -> Result<Vec<u8>, RpcError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| RpcError::Parse(format!("bad hex {s:?}: {e}")))
}

fn parse_quantity(s: &str) -> Result<u64, RpcError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16).map_err(|e| RpcError::Parse(format!("bad quantity {s:?}: {e}")))
}

fn parse_tx_hash(s: &str) -> Result<TxHash, RpcError> {
    let bytes = decode_hex(s)?;
    if bytes.len() != 32 {
        return Err(RpcError::Parse(format!("bad transaction hash {s:?}")));
    }
    Ok(TxHash::from_slice(&bytes))
}

/// Low-level JSON-RPC client shared by the ledger and its pending handles.
struct RpcClient {
    client: Client,
    url: String,
    request_id: AtomicU64,
}

impl RpcClient {
    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Call a JSON-RPC method.
    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: P,
    ) -> Result<R, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: self.next_id(),
        };
        trace!(method, id = request.id, "[ledger-rpc] Request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    RpcError::Connection(format!("Cannot connect to {}", self.url))
                } else {
                    RpcError::Http(e)
                }
            })?;

        let rpc_response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::Parse(e.to_string()))?;

        if let Some(error) = rpc_response.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        serde_json::from_value(rpc_response.result)
            .map_err(|e| RpcError::Parse(format!("{method}: {e}")))
    }

    async fn eth_call(&self, request: &CallRequest, block: &str) -> Result<Vec<u8>, RpcError> {
        let result: String = self.call("eth_call", (request, block)).await?;
        decode_hex(&result)
    }
}

/// Ledger backed by an EVM node.
///
/// Signing is left to the node (`eth_sendTransaction` from an unlocked or
/// wallet-managed account); no key material passes through this adapter.
#[derive(Clone)]
pub struct RpcLedger {
    inner: Arc<RpcClient>,
    contract: Address,
    poll_interval: Duration,
}

impl RpcLedger {
    pub fn new(config: RpcConfig) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(2))
            .build()
            .map_err(RpcError::Http)?;

        Ok(Self {
            inner: Arc::new(RpcClient {
                client,
                url: config.url,
                request_id: AtomicU64::new(1),
            }),
            contract: config.contract,
            poll_interval: config.receipt_poll_interval,
        })
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    fn read_request(&self, data: Vec<u8>) -> CallRequest {
        CallRequest {
            from: None,
            to: self.contract.to_checksum(),
            data: encode_hex(&data),
        }
    }

    async fn read(&self, data: Vec<u8>) -> Result<Vec<u8>, LedgerFault> {
        let bytes = self.inner.eth_call(&self.read_request(data), "latest").await?;
        if bytes.is_empty() {
            // No code at the contract address, or a revert without data.
            return Err(LedgerFault::Malformed("empty return data".into()));
        }
        Ok(bytes)
    }
}

#[async_trait]
impl LedgerQuery for RpcLedger {
    async fn get_product(&self, id: ProductId) -> Result<RawProduct, LedgerFault> {
        let bytes = self.read(abi::encode_get_product(id)).await?;
        abi::decode_product(&bytes).map_err(|e| LedgerFault::Malformed(e.to_string()))
    }

    async fn get_history(&self, id: ProductId) -> Result<RawHistory, LedgerFault> {
        let bytes = self.read(abi::encode_get_history(id)).await?;
        abi::decode_history(&bytes).map_err(|e| LedgerFault::Malformed(e.to_string()))
    }
}

#[async_trait]
impl LedgerMutation for RpcLedger {
    async fn submit(
        &self,
        from: Address,
        call: LedgerCall,
    ) -> Result<Box<dyn PendingTransaction>, LedgerFault> {
        let request = CallRequest {
            from: Some(from.to_checksum()),
            to: self.contract.to_checksum(),
            data: encode_hex(&abi::encode_ledger_call(&call)),
        };

        let hash: String = self
            .inner
            .call("eth_sendTransaction", [&request])
            .await?;
        let tx_hash = parse_tx_hash(&hash)?;
        debug!(method = call.method(), tx_hash = %hash, "[ledger-rpc] Transaction sent");

        Ok(Box::new(RpcPending {
            client: Arc::clone(&self.inner),
            request,
            tx_hash,
            hash,
            poll_interval: self.poll_interval,
        }))
    }
}

#[async_trait]
impl IdentityProvider for RpcLedger {
    /// First account the node exposes.
    async fn request_account(&self) -> Result<String, LedgerFault> {
        let accounts: Vec<String> = self.inner.call("eth_accounts", [(); 0]).await?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| LedgerFault::Transport("node exposes no accounts".into()))
    }
}

/// A sent transaction whose receipt has not been observed yet.
struct RpcPending {
    client: Arc<RpcClient>,
    request: CallRequest,
    tx_hash: TxHash,
    hash: String,
    poll_interval: Duration,
}

impl RpcPending {
    /// Re-run a failed transaction as a call at its block to recover the
    /// revert reason. Nodes do not store reasons in receipts.
    async fn replay(&self, block: &str) -> LedgerFault {
        match self.client.eth_call(&self.request, block).await {
            Err(e) => e.into(),
            Ok(_) => {
                warn!(tx_hash = %self.hash, "[ledger-rpc] Failed receipt replayed without revert");
                LedgerFault::reverted("")
            }
        }
    }
}

#[async_trait]
impl PendingTransaction for RpcPending {
    fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    async fn await_finality(self: Box<Self>) -> Result<Receipt, LedgerFault> {
        loop {
            let receipt: Option<TransactionReceipt> = self
                .client
                .call("eth_getTransactionReceipt", [&self.hash])
                .await?;

            let Some(receipt) = receipt else {
                tokio::time::sleep(self.poll_interval).await;
                continue;
            };

            let Some(block) = receipt.block_number else {
                // Pending receipt on some nodes.
                tokio::time::sleep(self.poll_interval).await;
                continue;
            };

            let block_number = parse_quantity(&block)?;
            let succeeded = match receipt.status.as_deref() {
                Some(status) => parse_quantity(status)? == 1,
                None => true,
            };

            if succeeded {
                return Ok(Receipt {
                    tx_hash: self.tx_hash,
                    block_number,
                });
            }
            return Err(self.replay(&block).await);
        }
    }
}
