mod raw_record;
mod report;
mod sales_record;

use serde::{Deserialize, Serialize};

pub use raw_record::{RawRecord, RecordBatch};
pub use report::{DropReason, ValidationReport};
pub use sales_record::SalesRecord;

pub type TransactionId = i64;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female
}

impl Gender {
    /// Parses the source file representation, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("male") {
            Some(Self::Male)
        } else if value.eq_ignore_ascii_case("female") {
            Some(Self::Female)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female"
        }
    }
}
