//! The chain anchor: one node connection, one signing key.
//!
//! # Submission Flow
//! ```text
//! payload
//!     → hash.rs (canonical JSON → SHA-256)
//!     → NodeRpc::transaction_count (nonce)
//!     → transaction.rs (zero-value self-send, local signing)
//!     → NodeRpc::send_raw_transaction
//!     → AnchorReceipt (tx hash; not a confirmation)
//! ```
//!
//! Every step is a single attempt. Failures go straight back to the caller,
//! who owns any retry policy.

use std::time::SystemTime;

use alloy::primitives::Address;
use serde::Serialize;

use crate::anchor::hash::{ContentHash, Payload};
use crate::anchor::transaction::{AnchorTransaction, GasPrice, TxParams, GWEI};
use crate::anchor::types::{AnchorError, AnchorReceipt, AnchorResult, ConnectionStatus};
use crate::blockchain::client::{BlockchainClient, NodeRpc};
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;
use crate::config::schema::AnchorConfig;
use crate::observability::metrics::{self, SubmissionOutcome};

/// Hash a payload's canonical JSON serialization.
pub fn hash_payload(payload: &Payload) -> ContentHash {
    ContentHash::of_payload(payload)
}

/// Anchors content hashes on chain from a single account.
///
/// # Concurrency
/// The nonce is read from the node on every submission and nothing is
/// reserved locally. Two concurrent `submit_anchor` calls on the same anchor
/// (or on two anchors sharing a key) can read the same nonce; the node then
/// accepts one and rejects or replaces the other. Callers that submit
/// concurrently must serialize submissions themselves.
pub struct ChainAnchor<N: NodeRpc = BlockchainClient> {
    node: N,
    wallet: Wallet,
    params: TxParams,
    status: ConnectionStatus,
}

impl ChainAnchor<BlockchainClient> {
    /// Connect to `config.rpc_url` with `wallet`.
    ///
    /// An unreachable node does not fail construction; it is recorded as
    /// [`ConnectionStatus::Disconnected`] and every later submission fails
    /// fast with [`AnchorError::NotConnected`].
    pub async fn connect(config: &AnchorConfig, wallet: Wallet) -> AnchorResult<Self> {
        let client = BlockchainClient::new(&config.rpc_url, config.rpc_timeout_secs)
            .map_err(|e| AnchorError::Config(e.to_string()))?;

        Self::with_node(client, wallet, TxParams::from(config), config.verify_chain_id).await
    }

    /// Like [`connect`](Self::connect), but a disconnected node is an error.
    pub async fn connect_strict(config: &AnchorConfig, wallet: Wallet) -> AnchorResult<Self> {
        let anchor = Self::connect(config, wallet).await?;
        if let ConnectionStatus::Disconnected { reason } = anchor.status() {
            return Err(AnchorError::Connection {
                endpoint: config.rpc_url.clone(),
                reason: reason.clone(),
            });
        }
        Ok(anchor)
    }
}

impl<N: NodeRpc> ChainAnchor<N> {
    /// Build an anchor over any node transport and probe it once.
    ///
    /// With `verify_chain_id`, a node on a different chain counts as
    /// disconnected.
    pub async fn with_node(
        node: N,
        wallet: Wallet,
        params: TxParams,
        verify_chain_id: bool,
    ) -> AnchorResult<Self> {
        if wallet.chain_id() != params.chain_id {
            return Err(AnchorError::Config(format!(
                "wallet chain id {} does not match configured chain id {}",
                wallet.chain_id(),
                params.chain_id
            )));
        }

        let status = probe(&node, params.chain_id, verify_chain_id).await;
        metrics::record_node_connected(node.endpoint(), status.is_connected());

        match &status {
            ConnectionStatus::Connected => tracing::info!(
                rpc_url = %node.endpoint(),
                address = %wallet.address(),
                chain_id = params.chain_id,
                "Connected to blockchain"
            ),
            ConnectionStatus::Disconnected { reason } => tracing::error!(
                rpc_url = %node.endpoint(),
                reason = %reason,
                "Connection to blockchain failed"
            ),
        }

        Ok(Self {
            node,
            wallet,
            params,
            status,
        })
    }

    /// Connection state recorded at construction.
    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    /// The account anchors are sent from (and to).
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn endpoint(&self) -> &str {
        self.node.endpoint()
    }

    pub fn params(&self) -> &TxParams {
        &self.params
    }

    /// Hash a payload. Pure; never touches the node.
    pub fn hash_payload(&self, payload: &Payload) -> ContentHash {
        hash_payload(payload)
    }

    /// Hash `payload` and anchor the hash.
    pub async fn submit_anchor(&self, payload: &Payload) -> AnchorResult<AnchorReceipt> {
        self.anchor_hash(self.hash_payload(payload)).await
    }

    /// Hash any serializable value canonically and anchor the hash.
    pub async fn submit_serializable<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> AnchorResult<AnchorReceipt> {
        let content_hash = ContentHash::of_serializable(value)?;
        self.anchor_hash(content_hash).await
    }

    /// Anchor a precomputed content hash.
    pub async fn anchor_hash(&self, content_hash: ContentHash) -> AnchorResult<AnchorReceipt> {
        if !self.is_connected() {
            tracing::error!(rpc_url = %self.endpoint(), "Not connected to blockchain");
            metrics::record_submission(SubmissionOutcome::NotConnected);
            return Err(AnchorError::NotConnected);
        }

        match self.broadcast(content_hash).await {
            Ok(receipt) => {
                metrics::record_submission(SubmissionOutcome::Sent);
                tracing::info!(
                    tx_hash = %receipt.tx_hash,
                    content_hash = %content_hash,
                    nonce = receipt.nonce,
                    "Transaction sent"
                );
                Ok(receipt)
            }
            Err(e) => {
                let outcome = match e {
                    BlockchainError::Rejected(_) => SubmissionOutcome::Rejected,
                    _ => SubmissionOutcome::Failed,
                };
                metrics::record_submission(outcome);
                tracing::error!(content_hash = %content_hash, error = %e, "Anchor submission failed");
                Err(AnchorError::Submission(e))
            }
        }
    }

    /// Build the unsigned transaction for `content_hash`.
    ///
    /// Queries the node for the nonce (and the gas price when not fixed).
    pub async fn build_transaction(
        &self,
        content_hash: ContentHash,
    ) -> BlockchainResult<AnchorTransaction> {
        let nonce = self.node.transaction_count(self.address()).await?;
        let gas_price = self.gas_price().await?;

        Ok(AnchorTransaction::new(
            self.address(),
            content_hash,
            nonce,
            gas_price,
            &self.params,
        ))
    }

    async fn broadcast(&self, content_hash: ContentHash) -> BlockchainResult<AnchorReceipt> {
        let tx = self.build_transaction(content_hash).await?;
        let signed = tx.sign(&self.wallet)?;
        let tx_hash = self.node.send_raw_transaction(&signed.raw).await?;

        if tx_hash != signed.tx_hash {
            tracing::warn!(
                node_hash = %tx_hash,
                local_hash = %signed.tx_hash,
                "Node reported a different transaction hash"
            );
        }

        Ok(AnchorReceipt {
            content_hash,
            tx_hash,
            nonce: tx.nonce(),
            submitted_at: SystemTime::now(),
        })
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        match self.params.gas_price {
            GasPrice::Fixed(wei) => Ok(wei),
            GasPrice::Node => {
                let price = self.node.gas_price().await?;
                if price > self.params.max_gas_price_gwei as u128 * GWEI {
                    return Err(BlockchainError::GasPriceTooHigh {
                        current_gwei: u64::try_from(price.div_ceil(GWEI)).unwrap_or(u64::MAX),
                        max_gwei: self.params.max_gas_price_gwei,
                    });
                }
                Ok(price)
            }
        }
    }
}

async fn probe<N: NodeRpc>(node: &N, expected_chain_id: u64, verify_chain_id: bool) -> ConnectionStatus {
    if !verify_chain_id {
        return if node.is_connected().await {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected {
                reason: "node did not answer".to_string(),
            }
        };
    }

    match node.chain_id().await {
        Ok(actual) if actual == expected_chain_id => ConnectionStatus::Connected,
        Ok(actual) => ConnectionStatus::Disconnected {
            reason: BlockchainError::ChainMismatch {
                expected: expected_chain_id,
                actual,
            }
            .to_string(),
        },
        Err(e) => ConnectionStatus::Disconnected {
            reason: e.to_string(),
        },
    }
}

impl<N: NodeRpc> std::fmt::Debug for ChainAnchor<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainAnchor")
            .field("rpc_url", &self.node.endpoint())
            .field("address", &self.wallet.address())
            .field("chain_id", &self.params.chain_id)
            .field("status", &self.status)
            .finish()
    }
}
