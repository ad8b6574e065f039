use tracing::{debug, warn};

use crate::models::SalesRecord;
use crate::store::{InsertOutcome, SalesStore, StoreError};

/// Accounting for one write pass over a batch.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct WriteResult {
    pub written: usize,
    pub skipped: usize
}

/// Idempotent batch writer.
///
/// Each record goes through its own conditional insert, never a batch
/// transaction: a systemic failure midway leaves every earlier record
/// durably committed, and the caller can retry the whole batch because a
/// replayed record is skipped, not duplicated.
pub struct UpsertWriter<S> {
    store: S
}

impl<S: SalesStore> UpsertWriter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Writes a validated batch.
    ///
    /// Rows whose transaction_id already exists are skipped, as are rows the
    /// store rejects individually. Systemic store failures abort the pass
    /// and propagate; the counts up to that point are lost with the error,
    /// which is fine because the retry is idempotent.
    pub async fn write(&self, records: &[SalesRecord]) -> Result<WriteResult, StoreError> {
        let mut result = WriteResult::default();

        for record in records {
            match self.store.insert_unless_exists(record).await {
                Ok(InsertOutcome::Written) => result.written += 1,
                Ok(InsertOutcome::AlreadyExists) => {
                    debug!("Transaction [{}] already persisted, skipping", record.transaction_id);
                    result.skipped += 1;
                }
                Err(error) if error.is_row_level() => {
                    warn!("Store rejected transaction [{}], skipping: {error}", record.transaction_id);
                    result.skipped += 1;
                }
                Err(error) => return Err(error)
            }
        }

        Ok(result)
    }
}
