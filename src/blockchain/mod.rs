//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! private key (explicit argument or environment)
//!     → wallet.rs (key loading, local signing)
//! RPC URL (config)
//!     → client.rs (NodeRpc over HTTP with timeouts)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - Transactions are signed in-process; only raw bytes reach the node
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod types;
pub mod wallet;

pub use client::{BlockchainClient, NodeRpc};
pub use types::{BlockchainError, BlockchainResult};
pub use wallet::Wallet;
