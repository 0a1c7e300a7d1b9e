//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`AnchorConfig::rpc_url`].
pub const RPC_URL_ENV_VAR: &str = "CHAIN_ANCHOR_RPC_URL";

/// Chain ID of the Sepolia test network.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Gas cost of a plain value transfer.
pub const TRANSFER_GAS: u64 = 21_000;

/// Root configuration for a chain anchor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID used for EIP-155 replay protection.
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Gas limit attached to every anchor transaction.
    pub gas_limit: u64,

    /// Fixed gas price in gwei. `None` queries the node for every submission.
    pub gas_price_gwei: Option<u64>,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,

    /// Treat a node reporting a different chain ID as disconnected.
    pub verify_chain_id: bool,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            chain_id: SEPOLIA_CHAIN_ID,
            rpc_timeout_secs: 10,
            gas_limit: TRANSFER_GAS,
            gas_price_gwei: Some(10),
            max_gas_price_gwei: 500,
            verify_chain_id: true,
        }
    }
}

impl AnchorConfig {
    /// Create a config for `rpc_url` with every other field defaulted.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Self::default()
        }
    }

    /// Override fields from the process environment.
    ///
    /// Reads `CHAIN_ANCHOR_RPC_URL` if set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(RPC_URL_ENV_VAR) {
            if !url.trim().is_empty() {
                self.rpc_url = url.trim().to_string();
            }
        }
    }
}
