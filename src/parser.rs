// src/parser.rs
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AnalyzerError, Result};
use crate::models::{BlockSummary, TransactionRef};

/// Typed view of the explorer's block payload. Only the fields that end up
/// in the records are required; everything else the API returns is ignored.
#[derive(Debug, Deserialize)]
struct RawBlock {
    hash: String,
    height: u64,
    total: u64,
    fees: u64,
    size: u64,
    time: String,
    n_tx: u64,
    prev_block: String,
    txids: Vec<String>,
}

/// Build the block summary and its transaction list from a raw payload.
/// A missing or mistyped field fails here, before anything is written.
pub fn build_block_data(payload: Value) -> Result<(BlockSummary, Vec<TransactionRef>)> {
    let raw: RawBlock = serde_json::from_value(payload)
        .map_err(|err| AnalyzerError::MalformedResponse(err.to_string()))?;

    let transactions = raw
        .txids
        .iter()
        .map(|txid| TransactionRef {
            block_hash: raw.hash.clone(),
            tx_id: txid.clone(),
        })
        .collect();

    let summary = BlockSummary {
        hash: raw.hash,
        height: raw.height,
        total: raw.total,
        fees: raw.fees,
        size: raw.size,
        time: raw.time,
        tx_count: raw.n_tx,
        prev_block: raw.prev_block,
    };

    Ok((summary, transactions))
}
