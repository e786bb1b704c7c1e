// src/export.rs
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::{AnalyzerError, Result};
use crate::models::{BlockSummary, TransactionRef};

/// Write attempts per block file: 1 initial + 2 retries.
const WRITE_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    AlreadyAnalyzed,
}

/// Save the block summary and its transaction list under the given path.
/// The path is claimed atomically, so a file already present means a
/// previous run completed and the whole write is skipped.
pub async fn save_block_data(
    summary: &BlockSummary,
    transactions: &[TransactionRef],
    path: &Path,
) -> Result<WriteOutcome> {
    let bytes = render_csv(summary, transactions)?;
    write_with_retry(path, &bytes, write_new).await
}

async fn write_with_retry<F>(
    path: &Path,
    bytes: &[u8],
    mut attempt_write: F,
) -> Result<WriteOutcome>
where
    F: FnMut(&Path, &[u8]) -> io::Result<WriteOutcome>,
{
    for attempt in 1..=WRITE_ATTEMPTS {
        match attempt_write(path, bytes) {
            Ok(WriteOutcome::AlreadyAnalyzed) => {
                info!("{} already exists, skipping write", path.display());
                return Ok(WriteOutcome::AlreadyAnalyzed);
            }
            Ok(WriteOutcome::Written) => {
                info!("Wrote {} ({} bytes)", path.display(), bytes.len());
                return Ok(WriteOutcome::Written);
            }
            Err(err) if is_contention(&err) && attempt < WRITE_ATTEMPTS => {
                warn!(
                    "File is occupied by another process (attempt {}). Retrying in {} seconds...",
                    attempt,
                    RETRY_DELAY.as_secs()
                );
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(err) if is_contention(&err) => {
                error!(
                    "Failed to write {} after {} attempts: {}",
                    path.display(),
                    WRITE_ATTEMPTS,
                    err
                );
                return Err(AnalyzerError::FileContention(err));
            }
            Err(err) => {
                error!("Failed to write {}: {}", path.display(), err);
                return Err(AnalyzerError::FileIo(err));
            }
        }
    }

    Err(AnalyzerError::Unknown("retries exhausted".to_string()))
}

/// Claim the path with create-new and write the whole buffer. A failed
/// write removes the claimed path so the next attempt does not mistake a
/// truncated file for a completed analysis.
fn write_new(path: &Path, bytes: &[u8]) -> io::Result<WriteOutcome> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(WriteOutcome::AlreadyAnalyzed)
        }
        Err(err) => return Err(err),
    };

    if let Err(err) = file.write_all(bytes) {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(err);
    }

    Ok(WriteOutcome::Written)
}

/// Lock-class errors worth retrying; anything else fails the run.
fn is_contention(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::ResourceBusy
    )
}

/// Render both CSV sections into one buffer: the summary row under its
/// header, one blank line, then the transaction rows under `BlockHash,TxId`.
/// The transaction header is written even when the block has no entries.
fn render_csv(
    summary: &BlockSummary,
    transactions: &[TransactionRef],
) -> std::result::Result<Vec<u8>, csv::Error> {
    let mut buf = Vec::new();

    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.serialize(summary)?;
        wtr.flush()?;
    }

    buf.push(b'\n');

    {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut buf);
        wtr.write_record(["BlockHash", "TxId"])?;
        for tx in transactions {
            wtr.serialize(tx)?;
        }
        wtr.flush()?;
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use serde_json::json;
    use tempfile::TempDir;

    const GOLDEN: &str = "Hash,Height,Total,Fees,Size,Time,TxCount,PrevBlock\n\
        00aa,800000,5000000000,1200000,140000,2023-01-01T00:00:00Z,2,00ab\n\
        \n\
        BlockHash,TxId\n\
        00aa,tx1\n\
        00aa,tx2\n";

    fn sample() -> (BlockSummary, Vec<TransactionRef>) {
        let summary = BlockSummary {
            hash: "00aa".into(),
            height: 800000,
            total: 5_000_000_000,
            fees: 1_200_000,
            size: 140_000,
            time: "2023-01-01T00:00:00Z".into(),
            tx_count: 2,
            prev_block: "00ab".into(),
        };
        let transactions = vec![
            TransactionRef {
                block_hash: "00aa".into(),
                tx_id: "tx1".into(),
            },
            TransactionRef {
                block_hash: "00aa".into(),
                tx_id: "tx2".into(),
            },
        ];
        (summary, transactions)
    }

    #[tokio::test]
    async fn mapped_block_lands_as_block_height_csv() {
        let payload = json!({
            "hash": "00aa",
            "height": 800000,
            "total": 5000000000u64,
            "fees": 1200000,
            "size": 140000,
            "time": "2023-01-01T00:00:00Z",
            "n_tx": 2,
            "prev_block": "00ab",
            "txids": ["tx1", "tx2"]
        });
        let (summary, transactions) = parser::build_block_data(payload).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(format!("block_{}.csv", summary.height));
        let outcome = save_block_data(&summary, &transactions, &path).await.unwrap();

        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "block_800000.csv"
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), GOLDEN);
    }

    #[test]
    fn summary_row_round_trips() {
        let (summary, transactions) = sample();
        let bytes = render_csv(&summary, &transactions).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let (summary_part, tx_part) = text.split_once("\n\n").unwrap();

        let mut rdr = csv::Reader::from_reader(summary_part.as_bytes());
        let parsed: BlockSummary = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(parsed, summary);

        let mut rdr = csv::Reader::from_reader(tx_part.as_bytes());
        let refs: Vec<TransactionRef> = rdr.deserialize().map(|row| row.unwrap()).collect();
        assert_eq!(refs, transactions);
    }

    #[test]
    fn transaction_header_written_for_empty_block() {
        let (summary, _) = sample();
        let bytes = render_csv(&summary, &[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with("\nBlockHash,TxId\n"));
    }

    #[tokio::test]
    async fn second_save_skips_and_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let (summary, transactions) = sample();
        let path = dir.path().join(format!("block_{}.csv", summary.height));

        let first = save_block_data(&summary, &transactions, &path).await.unwrap();
        assert_eq!(first, WriteOutcome::Written);
        let written = std::fs::read(&path).unwrap();

        let mut changed = summary.clone();
        changed.fees = 999;
        let second = save_block_data(&changed, &transactions, &path).await.unwrap();
        assert_eq!(second, WriteOutcome::AlreadyAnalyzed);
        assert_eq!(std::fs::read(&path).unwrap(), written);
    }

    #[tokio::test(start_paused = true)]
    async fn contention_is_retried_three_times_then_fails() {
        let mut attempts = 0;
        let started = tokio::time::Instant::now();

        let result = write_with_retry(Path::new("unused.csv"), b"data", |_, _| {
            attempts += 1;
            Err(io::Error::new(io::ErrorKind::WouldBlock, "file busy"))
        })
        .await;

        assert_eq!(attempts, 3);
        assert!(matches!(result, Err(AnalyzerError::FileContention(_))));
        // delays run between attempts only, never after the last one
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test]
    async fn non_retryable_error_fails_on_first_attempt() {
        let mut attempts = 0;

        let result = write_with_retry(Path::new("unused.csv"), b"data", |_, _| {
            attempts += 1;
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        })
        .await;

        assert_eq!(attempts, 1);
        assert!(matches!(result, Err(AnalyzerError::FileIo(_))));
    }

    #[test]
    fn contention_classification() {
        assert!(is_contention(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(is_contention(&io::Error::from(io::ErrorKind::ResourceBusy)));
        assert!(!is_contention(&io::Error::from(io::ErrorKind::NotFound)));
        assert!(!is_contention(&io::Error::from(
            io::ErrorKind::PermissionDenied
        )));
    }
}
