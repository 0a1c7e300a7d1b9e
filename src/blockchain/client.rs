//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to a JSON-RPC endpoint over HTTP
//! - Query chain state (chain id, nonce, gas price)
//! - Broadcast pre-signed raw transactions
//! - Bound every request with a timeout; a single attempt per call

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::transports::TransportResult;
use async_trait::async_trait;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// The subset of node JSON-RPC an anchor needs.
///
/// Signing is deliberately absent: transactions are signed locally by
/// [`Wallet`](crate::blockchain::Wallet) and only raw bytes cross this seam.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    /// Endpoint identifier for logs and errors.
    fn endpoint(&self) -> &str;

    /// `eth_chainId`.
    async fn chain_id(&self) -> BlockchainResult<u64>;

    /// `eth_getTransactionCount` at the latest block.
    async fn transaction_count(&self, address: Address) -> BlockchainResult<u64>;

    /// `eth_gasPrice` in wei.
    async fn gas_price(&self) -> BlockchainResult<u128>;

    /// `eth_sendRawTransaction`.
    async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash>;

    /// True if the node answers a chain id query.
    async fn is_connected(&self) -> bool {
        self.chain_id().await.is_ok()
    }
}

/// HTTP JSON-RPC client backed by an alloy provider.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_url: String,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// No request is made; an unreachable node is only discovered by the
    /// first call.
    pub fn new(rpc_url: &str, rpc_timeout_secs: u64) -> BlockchainResult<Self> {
        let url: url::Url = rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e))
        })?;

        let provider = Arc::new(ProviderBuilder::new().connect_http(url))
            as Arc<dyn Provider + Send + Sync>;

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            timeout_duration: Duration::from_secs(rpc_timeout_secs),
        })
    }

    async fn call<T, F>(&self, method: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = TransportResult<T>>,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(method, rpc_url = %self.rpc_url, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{} failed: {}", method, e)))
            }
            Err(_) => {
                tracing::warn!(method, rpc_url = %self.rpc_url, "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

#[async_trait]
impl NodeRpc for BlockchainClient {
    fn endpoint(&self) -> &str {
        &self.rpc_url
    }

    async fn chain_id(&self) -> BlockchainResult<u64> {
        self.call("eth_chainId", self.provider.get_chain_id()).await
    }

    async fn transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.call(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address),
        )
        .await
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.call("eth_gasPrice", self.provider.get_gas_price()).await
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash> {
        match timeout(self.timeout_duration, self.provider.send_raw_transaction(raw)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => {
                tracing::warn!(rpc_url = %self.rpc_url, error = %e, "Broadcast failed");
                // A JSON-RPC error object means the node saw and refused the tx.
                match e.as_error_resp() {
                    Some(resp) => Err(BlockchainError::Rejected(resp.message.to_string())),
                    None => Err(BlockchainError::Rpc(format!(
                        "eth_sendRawTransaction failed: {}",
                        e
                    ))),
                }
            }
            Err(_) => {
                tracing::warn!(rpc_url = %self.rpc_url, "Broadcast timeout");
                Err(BlockchainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_rejected() {
        let err = BlockchainClient::new("not a url", 5).unwrap_err();
        assert!(err.to_string().contains("Invalid RPC URL"));
    }

    #[tokio::test]
    async fn test_client_creation_does_not_touch_network() {
        // Nothing listens on port 1; construction must still succeed.
        let client = BlockchainClient::new("http://127.0.0.1:1", 2).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:1");
    }

    #[tokio::test]
    async fn test_unreachable_node_reports_disconnected() {
        let client = BlockchainClient::new("http://127.0.0.1:1", 2).unwrap();
        assert!(!client.is_connected().await);

        let err = client.chain_id().await.unwrap_err();
        assert!(matches!(
            err,
            BlockchainError::Rpc(_) | BlockchainError::Timeout(_)
        ));
    }
}
