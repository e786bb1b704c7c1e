// src/models.rs
use serde::{Deserialize, Serialize};

/// Summary record for a single analyzed block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BlockSummary {
    pub hash: String,
    pub height: u64,
    pub total: u64,       // satoshis
    pub fees: u64,        // satoshis
    pub size: u64,        // bytes
    pub time: String,     // keep as String (ISO-8601, verbatim from the API)
    pub tx_count: u64,
    pub prev_block: String,
}

/// One transaction id of the block, keyed back to its block hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionRef {
    pub block_hash: String,
    pub tx_id: String,
}
