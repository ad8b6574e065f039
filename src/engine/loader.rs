use std::fs::File;
use std::io::BufReader;

use csv::{ReaderBuilder, Trim};
use tokio::task::spawn_blocking;
use tracing::info;

use crate::engine::LoadError;
use crate::models::{RawRecord, RecordBatch};

/// Reads a delimited file into a batch of raw rows.
///
/// The header row is captured verbatim so the validator can report missing
/// columns; row values stay untyped for the explicit coercion step. The read
/// runs off the async threads.
pub async fn load_batch(path: &str) -> Result<RecordBatch, LoadError> {
    let path = path.to_string();

    match spawn_blocking(move || read_batch(&path)).await {
        Ok(result) => result,
        Err(join_error) => Err(LoadError::Io(std::io::Error::other(join_error)))
    }
}

fn read_batch(path: &str) -> Result<RecordBatch, LoadError> {
    let file = File::open(path)?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = reader.headers()?.iter().map(|header| header.to_string()).collect();

    let mut rows = Vec::new();

    for result in reader.deserialize::<RawRecord>() {
        rows.push(result?);
    }

    info!("Loaded {} rows from {path}", rows.len());

    Ok(RecordBatch { headers, rows })
}
