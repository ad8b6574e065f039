use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::{DropReason, Gender, RawRecord, RecordBatch, SalesRecord, ValidationReport};
use crate::validator::SchemaError;

/// Header names the input file must carry, in schema order.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "Transaction ID",
    "Date",
    "Customer ID",
    "Gender",
    "Age",
    "Product Category",
    "Quantity",
    "Price per Unit",
    "Total Amount"
];

/// Accepted date representations. Anything else drops the row.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Enforces the nine-column sales schema over a loaded batch.
#[derive(Debug, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates a batch against the fixed schema.
    ///
    /// A column missing from the header row fails the whole batch. Rows are
    /// then run through null checks, typed coercion, and constraint checks;
    /// a failing row is dropped and counted under its first failing check.
    /// Pure over its input: the only side effect is logging.
    pub fn validate(&self, batch: &RecordBatch) -> Result<(Vec<SalesRecord>, ValidationReport), SchemaError> {
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| !batch.headers.iter().any(|header| header.as_str() == **column))
            .map(|column| column.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(SchemaError::missing_columns(missing));
        }

        let mut report = ValidationReport::new(batch.len());
        let mut accepted = Vec::with_capacity(batch.len());

        for row in &batch.rows {
            match coerce_row(row) {
                Ok(record) => accepted.push(record),
                Err(reason) => {
                    debug!("Dropping row [{:?}]: {reason}", row.transaction_id);
                    report.record_drop(reason);
                }
            }
        }

        report.accepted = accepted.len();

        for (reason, count) in report.drops() {
            warn!("Dropped {count} rows: {reason}");
        }

        Ok((accepted, report))
    }
}

/// Per-row pipeline: nulls, then typed coercion, then constraints.
/// The first failing check decides the drop bucket.
fn coerce_row(row: &RawRecord) -> Result<SalesRecord, DropReason> {
    let transaction_id = require(&row.transaction_id, "transaction_id")?;
    let date = require(&row.date, "date")?;
    let customer_id = require(&row.customer_id, "customer_id")?;
    let gender = require(&row.gender, "gender")?;
    let age = require(&row.age, "age")?;
    let product_category = require(&row.product_category, "product_category")?;
    let quantity = require(&row.quantity, "quantity")?;
    let price_per_unit = require(&row.price_per_unit, "price_per_unit")?;
    let total_amount = require(&row.total_amount, "total_amount")?;

    let transaction_id: i64 = transaction_id.parse().map_err(|_| DropReason::Coercion("transaction_id"))?;
    let date = parse_date(date)?;
    let gender = Gender::parse(gender).ok_or(DropReason::Coercion("gender"))?;
    let age: i32 = age.parse().map_err(|_| DropReason::Coercion("age"))?;
    let quantity: i64 = quantity.parse().map_err(|_| DropReason::Coercion("quantity"))?;
    let price_per_unit = Decimal::from_str(price_per_unit).map_err(|_| DropReason::Coercion("price_per_unit"))?;
    let total_amount = Decimal::from_str(total_amount).map_err(|_| DropReason::Coercion("total_amount"))?;

    if quantity <= 0 {
        return Err(DropReason::Constraint("quantity"));
    }

    if price_per_unit <= Decimal::ZERO {
        return Err(DropReason::Constraint("price_per_unit"));
    }

    if total_amount <= Decimal::ZERO {
        return Err(DropReason::Constraint("total_amount"));
    }

    if age <= 0 {
        return Err(DropReason::Constraint("age"));
    }

    Ok(SalesRecord {
        transaction_id,
        date,
        customer_id: customer_id.to_string(),
        gender,
        age,
        product_category: product_category.to_string(),
        quantity,
        price_per_unit,
        total_amount
    })
}

fn require<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str, DropReason> {
    match field.as_deref() {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(DropReason::NullField(name))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, DropReason> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or(DropReason::Coercion("date"))
}
