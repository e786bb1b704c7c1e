use dotenvy::dotenv;
use std::{env, path::PathBuf};
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,        // block-explorer base endpoint
    pub output_dir: PathBuf,
    pub request_timeout_secs: u64,
}

pub fn load() -> Result<Config> {
    dotenv().ok(); // load from .env file

    // Explorer base URL (default: BlockCypher BTC mainnet)
    let api_base_url = env::var("EXPLORER_API_URL")
        .or_else(|_| env::var("BLOCKCYPHER_URL")) // alias support
        .unwrap_or_else(|_| "https://api.blockcypher.com/v1/btc/main".to_string());

    // Directory for block_<height>.csv files (default: working directory)
    let output_dir = env::var("OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));

    // Per-request timeout in seconds (default: 10)
    let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(10);

    let cfg = Config {
        api_base_url,
        output_dir,
        request_timeout_secs,
    };

    info!("Loaded config: {:?}", cfg);

    Ok(cfg)
}
