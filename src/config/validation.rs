//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, chain id > 0)
//! - Report non-fatal findings such as an undersized gas limit
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AnchorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::anchor::transaction::MAX_ANCHOR_INTRINSIC_GAS;
use crate::config::schema::AnchorConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Offending field.
    pub field: &'static str,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &AnchorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.rpc_url.trim().is_empty() {
        errors.push(ValidationError::new("rpc_url", "RPC URL is required"));
    } else {
        match url::Url::parse(&config.rpc_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::new(
                "rpc_url",
                format!("unsupported scheme '{}', expected http or https", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::new(
                "rpc_url",
                format!("invalid URL '{}': {}", config.rpc_url, e),
            )),
        }
    }

    if config.chain_id == 0 {
        errors.push(ValidationError::new("chain_id", "must be greater than 0"));
    }

    if config.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("rpc_timeout_secs", "must be greater than 0"));
    }

    if config.gas_limit == 0 {
        errors.push(ValidationError::new("gas_limit", "must be greater than 0"));
    }

    if let Some(price) = config.gas_price_gwei {
        if price > config.max_gas_price_gwei {
            errors.push(ValidationError::new(
                "gas_price_gwei",
                format!(
                    "fixed price {} gwei exceeds max_gas_price_gwei {}",
                    price, config.max_gas_price_gwei
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Non-fatal findings about a configuration.
pub fn config_warnings(config: &AnchorConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    // 32 bytes of calldata cost more than a bare transfer; a node may reject
    // the transaction as "intrinsic gas too low".
    if config.gas_limit < MAX_ANCHOR_INTRINSIC_GAS {
        warnings.push(format!(
            "gas_limit {} is below the intrinsic cost of an anchor transaction (up to {})",
            config.gas_limit, MAX_ANCHOR_INTRINSIC_GAS
        ));
    }

    if config.gas_price_gwei.is_none() && config.max_gas_price_gwei == 0 {
        warnings.push("max_gas_price_gwei is 0; every node-quoted gas price will be rejected".to_string());
    }

    warnings
}
