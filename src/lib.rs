//! Content anchoring on an EVM chain.
//!
//! Hashes structured JSON payloads canonically and anchors the digest in a
//! zero-value self-send transaction signed by a single local key.

pub mod anchor;
pub mod blockchain;
pub mod config;
pub mod observability;

pub use anchor::{hash_payload, AnchorError, AnchorReceipt, ChainAnchor, ContentHash, Payload};
pub use blockchain::{BlockchainClient, NodeRpc, Wallet};
pub use config::AnchorConfig;
