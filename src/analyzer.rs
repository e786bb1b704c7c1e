// src/analyzer.rs
use std::time::Duration;

use reqwest::Client;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::export::{self, WriteOutcome};
use crate::{explorer, parser};

/// Run the pipeline once: newest block hash → block payload → records →
/// `block_<height>.csv`.
pub async fn run(cfg: &Config) -> Result<WriteOutcome> {
    // One client for both calls, with an explicit per-request timeout
    let client = Client::builder()
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .build()?;

    let tip_hash = explorer::latest_block_hash(&client, &cfg.api_base_url).await?;
    info!("Latest block hash: {}", tip_hash);

    let payload = explorer::block(&client, &cfg.api_base_url, &tip_hash).await?;
    let (summary, transactions) = parser::build_block_data(payload)?;
    info!(
        "Block {} at height {} with {} transactions",
        summary.hash,
        summary.height,
        transactions.len()
    );

    let path = cfg.output_dir.join(format!("block_{}.csv", summary.height));
    export::save_block_data(&summary, &transactions, &path).await
}
