// src/explorer.rs
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{AnalyzerError, Result};

/// Minimal view of the chain endpoint; only the tip hash is consumed.
#[derive(Debug, Deserialize)]
struct ChainTip {
    hash: String,
}

/// Get the hash of the newest block on the chain
pub async fn latest_block_hash(client: &Client, base_url: &str) -> Result<String> {
    info!("📡 Fetching chain tip → {}", base_url);

    let resp = client.get(base_url).send().await?.error_for_status()?;
    let text = resp.text().await?;
    debug!("📩 Raw tip response: {}", text);

    parse_tip(&text)
}

/// Fetch the full block record for a hash. The payload is handed to the
/// mapper untouched.
pub async fn block(client: &Client, base_url: &str, hash: &str) -> Result<Value> {
    let url = format!("{}/blocks/{}", base_url, hash);
    info!("📡 Fetching block → {}", url);

    let resp = client.get(&url).send().await?.error_for_status()?;
    let text = resp.text().await?;
    debug!("📩 Raw block response: {} bytes", text.len());

    serde_json::from_str(&text).map_err(|err| AnalyzerError::MalformedResponse(err.to_string()))
}

fn parse_tip(text: &str) -> Result<String> {
    let tip: ChainTip = serde_json::from_str(text)
        .map_err(|err| AnalyzerError::MalformedResponse(err.to_string()))?;
    Ok(tip.hash)
}
