mod client;
mod consumer;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SalesRecord;

pub use client::{MessageId, QueueClient};
pub use consumer::{AckHandle, BatchConsumer};

/// Envelope for one queue delivery.
///
/// The wire form is untagged JSON: an array of row-objects for an inline
/// batch, or a bare string for a file reference. Durability is carried out of
/// band as the AMQP persistence flag, not in the body.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueueMessage {
    /// A validated batch carried inline.
    Batch(Vec<SalesRecord>),
    /// A path to a batch that still lives on disk at the consumer.
    FileRef(String)
}

/// Broker-level failures. All of these are fatal to the current operation;
/// the client never retries internally, restart policy belongs to the caller.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue connection failed: {0}")]
    Connection(#[source] lapin::Error),
    #[error("Queue operation failed: {0}")]
    Protocol(#[source] lapin::Error),
    #[error("Queue payload error: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("Broker refused to confirm the publish")]
    Unconfirmed
}
