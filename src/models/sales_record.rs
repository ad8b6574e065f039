use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Gender, TransactionId};

/// A single validated sales transaction.
///
/// Instances only exist on the far side of the schema validator: every field
/// has been coerced to its typed form and every business constraint holds.
/// The serialized form uses these field names verbatim, so a record published
/// to the queue deserializes field-for-field on the consumer side.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// Natural unique identifier; doubles as the idempotency key when the
    /// record is persisted.
    pub transaction_id: TransactionId,
    /// Calendar date of the transaction.
    pub date: NaiveDate,
    pub customer_id: String,
    pub gender: Gender,
    pub age: i32,
    pub product_category: String,
    pub quantity: i64,
    /// Unit price with its source precision intact.
    pub price_per_unit: Decimal,
    /// Recorded total. Deliberately not re-derived from
    /// `quantity * price_per_unit`; an inconsistent total is kept as-is.
    pub total_amount: Decimal
}
