//! Anchor transaction building and local signing.
//!
//! # Transaction Shape
//! ```text
//! legacy (gasPrice) transaction, EIP-155 chain id
//!   to      = sender (self-send)
//!   value   = 0
//!   data    = 32 raw bytes of the ContentHash
//!   nonce   = node's transaction count for sender
//!   gas     = configured limit (default 21000)
//! ```
//!
//! A plain transfer costs 21000 gas, but the 32 data bytes add up to
//! 512 more. The default limit is kept as configured and only flagged.

use alloy::consensus::{TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{Address, Bytes, TxHash, TxKind, U256};

use crate::anchor::hash::ContentHash;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;
use crate::config::schema::{AnchorConfig, TRANSFER_GAS};

/// Wei per gwei.
pub const GWEI: u128 = 1_000_000_000;

/// Calldata gas per zero byte.
const ZERO_BYTE_GAS: u64 = 4;

/// Calldata gas per non-zero byte.
const NON_ZERO_BYTE_GAS: u64 = 16;

/// Upper bound of the intrinsic gas of any anchor transaction.
pub const MAX_ANCHOR_INTRINSIC_GAS: u64 = TRANSFER_GAS + 32 * NON_ZERO_BYTE_GAS;

/// Intrinsic gas of a call transaction carrying `data`.
pub fn intrinsic_gas(data: &[u8]) -> u64 {
    data.iter().fold(TRANSFER_GAS, |gas, byte| {
        gas + if *byte == 0 { ZERO_BYTE_GAS } else { NON_ZERO_BYTE_GAS }
    })
}

/// Where the gas price of a submission comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPrice {
    /// Fixed price in wei.
    Fixed(u128),
    /// Ask the node (`eth_gasPrice`) for every submission.
    Node,
}

/// Per-network transaction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxParams {
    pub chain_id: u64,
    pub gas_limit: u64,
    pub gas_price: GasPrice,
    /// Ceiling applied to node-quoted prices.
    pub max_gas_price_gwei: u64,
}

impl From<&AnchorConfig> for TxParams {
    fn from(config: &AnchorConfig) -> Self {
        Self {
            chain_id: config.chain_id,
            gas_limit: config.gas_limit,
            gas_price: match config.gas_price_gwei {
                Some(gwei) => GasPrice::Fixed(gwei as u128 * GWEI),
                None => GasPrice::Node,
            },
            max_gas_price_gwei: config.max_gas_price_gwei,
        }
    }
}

impl Default for TxParams {
    fn default() -> Self {
        Self::from(&AnchorConfig::default())
    }
}

/// An unsigned zero-value self-send carrying a content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorTransaction {
    sender: Address,
    content_hash: ContentHash,
    nonce: u64,
    gas_limit: u64,
    gas_price: u128,
    chain_id: u64,
}

impl AnchorTransaction {
    /// Build the transaction anchoring `content_hash` from `sender`.
    pub fn new(
        sender: Address,
        content_hash: ContentHash,
        nonce: u64,
        gas_price: u128,
        params: &TxParams,
    ) -> Self {
        let tx = Self {
            sender,
            content_hash,
            nonce,
            gas_limit: params.gas_limit,
            gas_price,
            chain_id: params.chain_id,
        };

        let required = tx.intrinsic_gas();
        if tx.gas_limit < required {
            tracing::warn!(
                gas_limit = tx.gas_limit,
                intrinsic_gas = required,
                content_hash = %content_hash,
                "Gas limit below intrinsic cost; node may reject the anchor"
            );
        }

        tx
    }

    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Always the sender.
    pub fn recipient(&self) -> Address {
        self.sender
    }

    /// Always zero.
    pub fn value(&self) -> U256 {
        U256::ZERO
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    /// Gas price in wei.
    pub fn gas_price(&self) -> u128 {
        self.gas_price
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    /// The data field: the raw digest bytes.
    pub fn data(&self) -> Bytes {
        Bytes::copy_from_slice(self.content_hash.as_bytes())
    }

    /// Intrinsic gas this transaction actually needs.
    pub fn intrinsic_gas(&self) -> u64 {
        intrinsic_gas(self.content_hash.as_bytes())
    }

    /// Convert to an alloy legacy transaction.
    pub fn to_legacy(&self) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.recipient()),
            value: self.value(),
            input: self.data(),
        }
    }

    /// Sign with `wallet`, which must own the sender address.
    pub fn sign(&self, wallet: &Wallet) -> BlockchainResult<SignedAnchor> {
        if wallet.address() != self.sender {
            return Err(BlockchainError::Wallet(format!(
                "wallet {} cannot sign for sender {}",
                wallet.address(),
                self.sender
            )));
        }

        let envelope = TxEnvelope::from(wallet.sign_transaction(self.to_legacy())?);

        Ok(SignedAnchor {
            tx_hash: *envelope.tx_hash(),
            raw: Bytes::from(envelope.encoded_2718()),
        })
    }
}

/// A signed, encoded anchor transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAnchor {
    /// Keccak hash of `raw`; the identifier the node will report.
    pub tx_hash: TxHash,
    /// EIP-2718 encoding (plain RLP for legacy transactions).
    pub raw: Bytes,
}
