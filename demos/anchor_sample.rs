//! Connect, then anchor one sample payload.
//!
//! ```text
//! CHAIN_ANCHOR_RPC_URL=https://... CHAIN_ANCHOR_PRIVATE_KEY=0x... \
//!     cargo run --example anchor_sample
//! ```

use chain_anchor::observability::logging;
use chain_anchor::{AnchorConfig, ChainAnchor, Payload, Wallet};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(logging::DEFAULT_FILTER);

    let mut config = AnchorConfig::default();
    config.apply_env();

    let wallet = Wallet::from_env(config.chain_id)?;
    let anchor = ChainAnchor::connect(&config, wallet).await?;

    let mut payload = Payload::new();
    payload.insert("name".into(), json!("Alice"));
    payload.insert("balance".into(), json!(1000));
    payload.insert("type".into(), json!("deposit"));

    match anchor.submit_anchor(&payload).await {
        Ok(receipt) => tracing::info!(tx_hash = %receipt.handle(), "Transaction successful"),
        Err(e) => tracing::error!(error = %e, "Anchoring failed"),
    }

    Ok(())
}
