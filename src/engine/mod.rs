mod loader;
mod pipeline;

use thiserror::Error;

use crate::queue::QueueError;
use crate::store::StoreError;
use crate::validator::SchemaError;

pub use loader::load_batch;
pub use pipeline::{Disposition, EtlPipeline, PipelineResult};

/// The input file could not be read at all. Distinct from validation: a
/// loadable file with bad rows still produces a batch.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not open input file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not read input file: {0}")]
    Csv(#[from] csv::Error)
}

/// Failures that end a pipeline run or fail a queue message.
///
/// Row-level problems never reach this type; the validator and writer recover
/// from those internally and report them as counts.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    Store(#[from] StoreError)
}
