//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)                     environment
//!     → loader.rs (parse & deserialize)     CHAIN_ANCHOR_RPC_URL
//!     → validation.rs (semantic checks)  ←──┘
//!     → AnchorConfig (validated, immutable)
//!     → ChainAnchor::connect
//! ```
//!
//! # Design Decisions
//! - All fields have defaults matching the public Sepolia test network
//! - The signing key is never part of the config file; it is passed to the
//!   wallet explicitly (see `blockchain::wallet`)
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AnchorConfig;
pub use validation::{config_warnings, validate_config, ValidationError};
