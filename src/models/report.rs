use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};

/// Why a row was excluded from the accepted set.
///
/// The field or check name identifies the first failing stage of the per-row
/// pipeline, so each dropped row lands in exactly one bucket.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub enum DropReason {
    /// A required field was empty.
    NullField(&'static str),
    /// A field value could not be coerced to its schema type.
    Coercion(&'static str),
    /// A coerced value violated a business constraint.
    Constraint(&'static str)
}

impl Display for DropReason {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullField(field) => write!(formatter, "null value in [{field}]"),
            Self::Coercion(field) => write!(formatter, "value in [{field}] could not be coerced"),
            Self::Constraint(check) => write!(formatter, "constraint violated: [{check}] must be positive")
        }
    }
}

/// Per-batch validation outcome.
///
/// Lives for one validation call: the orchestrator logs it and moves on, the
/// report is never persisted. The identity `accepted + dropped() == received`
/// holds because every rejected row is recorded under a single reason.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ValidationReport {
    pub received: usize,
    pub accepted: usize,
    drops: BTreeMap<DropReason, usize>
}

impl ValidationReport {
    pub fn new(received: usize) -> Self {
        Self {
            received,
            accepted: 0,
            drops: BTreeMap::new()
        }
    }

    pub fn record_drop(&mut self, reason: DropReason) {
        *self.drops.entry(reason).or_insert(0) += 1;
    }

    /// Total rows dropped, across all buckets.
    pub fn dropped(&self) -> usize {
        self.drops.values().sum()
    }

    pub fn dropped_for(&self, reason: &DropReason) -> usize {
        self.drops.get(reason).copied().unwrap_or(0)
    }

    pub fn drops(&self) -> impl Iterator<Item = (&DropReason, &usize)> {
        self.drops.iter()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Validated batch: {} received, {} accepted, {} dropped",
            self.received,
            self.accepted,
            self.dropped()
        )
    }
}
