use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::errors::AppResult;
use crate::ingestion::InputTable;
use crate::processor::{OutputRow, RowProcessor, RowStatus};

#[derive(Debug, Clone, Default)]
pub struct BatchStats {
    pub total_rows: usize,
    pub resolved: usize,
    pub invalid: usize,
    pub stores_found: usize,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub headers: Vec<String>,
    pub rows: Vec<OutputRow>,
    pub stats: BatchStats,
}

/// Drives every input row through the processor, strictly in order and one at
/// a time, with a constant pause between rows as a courtesy to the upstream
/// services. Not adaptive; just a throttle.
pub struct BatchRunner {
    processor: RowProcessor,
    throttle: Duration,
}

impl BatchRunner {
    pub fn new(processor: RowProcessor, throttle: Duration) -> Self {
        Self {
            processor,
            throttle,
        }
    }

    pub async fn run(&self, table: InputTable) -> AppResult<BatchReport> {
        let total_rows = table.rows.len();
        let mut stats = BatchStats {
            total_rows,
            ..BatchStats::default()
        };
        let mut rows = Vec::with_capacity(total_rows);

        for (index, row) in table.rows.into_iter().enumerate() {
            let output = self.processor.process(row).await?;
            info!(
                row = index + 1,
                total = total_rows,
                address = %output.query_address,
                status = output.status.as_str(),
                "checked address"
            );

            match output.status {
                RowStatus::Ok => stats.resolved += 1,
                RowStatus::Invalid => {
                    warn!(row = index + 1, address = %output.query_address, "address did not resolve");
                    stats.invalid += 1;
                }
            }
            if output.store_found {
                stats.stores_found += 1;
            }

            rows.push(output);
            if index + 1 < total_rows {
                sleep(self.throttle).await;
            }
        }

        Ok(BatchReport {
            headers: table.headers,
            rows,
            stats,
        })
    }
}
