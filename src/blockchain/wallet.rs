//! Wallet management and transaction signing.
//!
//! # Security
//! - The private key is accepted as an explicit argument or read from the
//!   environment by the caller's entrypoint, never from a config file
//! - Keys are never logged or serialized; `Debug` shows only the address
//! - Signing happens in-process; the key never leaves this struct

use alloy::consensus::{SignableTransaction, Signed, TxLegacy};
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "CHAIN_ANCHOR_PRIVATE_KEY";

/// Single-account wallet bound to one chain.
#[derive(Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Chain ID for EIP-155 replay protection.
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `chain_id` - Chain ID for transaction signing
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> BlockchainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        // The parse error never echoes the key material.
        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(
            address = %signer.address(),
            chain_id = chain_id,
            "Wallet initialized"
        );

        Ok(Self { signer, chain_id })
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `CHAIN_ANCHOR_PRIVATE_KEY` from environment.
    pub fn from_env(chain_id: u64) -> BlockchainResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            BlockchainError::Wallet(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key, chain_id)
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain ID this wallet is configured for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign a legacy transaction with EIP-155 replay protection.
    ///
    /// The transaction must carry this wallet's chain ID.
    pub fn sign_transaction(&self, tx: TxLegacy) -> BlockchainResult<Signed<TxLegacy>> {
        if tx.chain_id != Some(self.chain_id) {
            return Err(BlockchainError::ChainMismatch {
                expected: self.chain_id,
                actual: tx.chain_id.unwrap_or_default(),
            });
        }

        let signature = self
            .signer
            .sign_hash_sync(&tx.signature_hash())
            .map_err(|e| BlockchainError::Signing(e.to_string()))?;

        Ok(tx.into_signed(signature))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}
