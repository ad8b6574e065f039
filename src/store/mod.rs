mod pg;
mod writer;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::SalesRecord;

pub use pg::PgSalesStore;
pub use writer::{UpsertWriter, WriteResult};

/// Outcome of one conditional insert.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum InsertOutcome {
    /// The row is now durably stored.
    Written,
    /// A row with the same transaction_id already existed; nothing changed.
    AlreadyExists
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store query failed: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Store configuration error: {0}")]
    Config(String)
}

impl StoreError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True when the failure is scoped to a single row (an integrity
    /// violation) rather than the store itself. Row-level failures are safe
    /// to skip; everything else must abort the batch.
    pub fn is_row_level(&self) -> bool {
        match self {
            Self::Sqlx(sqlx::Error::Database(error)) => matches!(
                error.kind(),
                sqlx::error::ErrorKind::UniqueViolation
                    | sqlx::error::ErrorKind::ForeignKeyViolation
                    | sqlx::error::ErrorKind::NotNullViolation
                    | sqlx::error::ErrorKind::CheckViolation
            ),
            _ => false
        }
    }
}

/// Relational store seam for sales records.
///
/// The one required operation is an insert conditioned on the transaction_id
/// unique key. Repeated delivery of the same record must leave the store
/// unchanged, which is what makes at-least-once delivery safe downstream.
#[async_trait]
pub trait SalesStore: Send + Sync {
    async fn insert_unless_exists(&self, record: &SalesRecord) -> Result<InsertOutcome, StoreError>;
}
