//! Content anchoring subsystem.
//!
//! # Data Flow
//! ```text
//! Payload (JSON object)
//!     → hash.rs (canonical serialization, SHA-256 → ContentHash)
//!     → transaction.rs (AnchorTransaction: zero-value self-send, data = hash)
//!     → connector.rs (ChainAnchor: nonce query, local signing, broadcast)
//!     → AnchorReceipt (transaction hash handle)
//! ```
//!
//! # Guarantees
//! - `hash_payload` is pure and independent of key order
//! - A disconnected anchor never reaches the node
//! - No retries, no confirmation tracking, no persistence

pub mod connector;
pub mod hash;
pub mod transaction;
pub mod types;

pub use connector::{hash_payload, ChainAnchor};
pub use hash::{canonical_json, canonical_json_map, ContentHash, Payload};
pub use transaction::{AnchorTransaction, GasPrice, SignedAnchor, TxParams};
pub use types::{AnchorError, AnchorReceipt, AnchorResult, ConnectionStatus};
