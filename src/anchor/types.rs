//! Anchor state, results, and error definitions.

use std::time::SystemTime;

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::anchor::hash::ContentHash;
use crate::blockchain::types::BlockchainError;

/// Node connectivity recorded at construction.
///
/// `Disconnected → Connected` happens only inside the constructor; there is
/// no reconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected { reason: String },
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Disconnected { reason } => write!(f, "disconnected ({})", reason),
        }
    }
}

/// Errors surfaced by [`ChainAnchor`](crate::anchor::ChainAnchor).
#[derive(Debug, Error)]
pub enum AnchorError {
    /// The node could not be reached or refused the handshake.
    #[error("connection to {endpoint} failed: {reason}")]
    Connection { endpoint: String, reason: String },

    /// An operation was attempted while disconnected; no call was made.
    #[error("not connected to blockchain node")]
    NotConnected,

    /// Nonce query, signing, or broadcast failed.
    #[error("anchor submission failed: {0}")]
    Submission(#[from] BlockchainError),

    /// Invalid configuration or wallet.
    #[error("configuration error: {0}")]
    Config(String),

    /// The value to hash could not be represented as JSON.
    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for anchor operations.
pub type AnchorResult<T> = Result<T, AnchorError>;

/// Outcome of a broadcast.
///
/// The transaction was accepted into the node's pool; inclusion in a block
/// is not implied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorReceipt {
    pub content_hash: ContentHash,
    pub tx_hash: TxHash,
    pub nonce: u64,
    pub submitted_at: SystemTime,
}

impl AnchorReceipt {
    /// The transaction hash as `0x`-prefixed lowercase hex.
    pub fn handle(&self) -> String {
        self.tx_hash.to_string()
    }
}
