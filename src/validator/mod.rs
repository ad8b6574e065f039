mod schema_validator;
#[cfg(test)]
mod tests;

use thiserror::Error;

pub use schema_validator::{REQUIRED_COLUMNS, SchemaValidator};

/// A structural defect in the input: the batch as a whole is unusable, unlike
/// per-row defects which are dropped and counted.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Input is missing required columns: {columns:?}")]
    MissingColumns {
        columns: Vec<String>
    }
}

impl SchemaError {
    pub fn missing_columns(columns: Vec<String>) -> Self {
        Self::MissingColumns { columns }
    }
}
