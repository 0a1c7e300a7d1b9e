//! `chain-anchor` command line.
//!
//! ```text
//! chain-anchor hash '{"name": "Alice"}'        offline, prints the digest
//! chain-anchor status                          probes the node
//! chain-anchor submit @payload.json            anchors the digest
//! ```
//!
//! The signing key is read from `CHAIN_ANCHOR_PRIVATE_KEY`; the endpoint from
//! the config file, `--rpc-url`, or `CHAIN_ANCHOR_RPC_URL`.

use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use chain_anchor::anchor::{canonical_json_map, hash_payload, ChainAnchor, Payload};
use chain_anchor::config::{config_warnings, load_config, validate_config, AnchorConfig, ConfigError};
use chain_anchor::observability::logging;
use chain_anchor::Wallet;

#[derive(Parser)]
#[command(name = "chain-anchor")]
#[command(about = "Anchor JSON payload hashes on an EVM chain", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the JSON-RPC endpoint.
    #[arg(long)]
    rpc_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the content hash of a payload (no network access)
    Hash {
        /// JSON object, `@file`, or `-` for stdin
        payload: String,
        /// Also print the canonical serialization
        #[arg(long)]
        canonical: bool,
    },
    /// Check node connectivity and show the anchoring account
    Status,
    /// Hash a payload and anchor it on chain
    Submit {
        /// JSON object, `@file`, or `-` for stdin
        payload: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(logging::DEFAULT_FILTER);
    let cli = Cli::parse();

    match cli.command {
        Commands::Hash { payload, canonical } => {
            let payload = read_payload(&payload)?;
            if canonical {
                println!("{}", canonical_json_map(&payload));
            }
            println!("{}", hash_payload(&payload));
        }
        Commands::Status => {
            let config = resolve_config(cli.config, cli.rpc_url)?;
            let wallet = Wallet::from_env(config.chain_id)?;
            let anchor = ChainAnchor::connect(&config, wallet).await?;

            println!("endpoint: {}", anchor.endpoint());
            println!("address:  {}", anchor.address());
            println!("chain id: {}", config.chain_id);
            println!("status:   {}", anchor.status());
        }
        Commands::Submit { payload } => {
            let payload = read_payload(&payload)?;
            let config = resolve_config(cli.config, cli.rpc_url)?;
            let wallet = Wallet::from_env(config.chain_id)?;
            let anchor = ChainAnchor::connect(&config, wallet).await?;

            let receipt = anchor.submit_anchor(&payload).await?;
            println!("content hash: {}", receipt.content_hash);
            println!("tx hash:      {}", receipt.handle());
        }
    }

    Ok(())
}

fn resolve_config(
    path: Option<PathBuf>,
    rpc_url: Option<String>,
) -> Result<AnchorConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(&path)?,
        None => {
            let mut config = AnchorConfig::default();
            config.apply_env();
            config
        }
    };

    if let Some(url) = rpc_url {
        config.rpc_url = url;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    for warning in config_warnings(&config) {
        tracing::warn!("{}", warning);
    }

    Ok(config)
}

fn read_payload(arg: &str) -> Result<Payload, Box<dyn std::error::Error>> {
    let text = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else if let Some(path) = arg.strip_prefix('@') {
        std::fs::read_to_string(path)?
    } else {
        arg.to_string()
    };

    match serde_json::from_str(&text)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(format!("payload must be a JSON object, got {}", kind(&other)).into()),
    }
}

fn kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
