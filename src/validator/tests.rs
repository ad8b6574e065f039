use super::{REQUIRED_COLUMNS, SchemaError, SchemaValidator};

use anyhow::Result;
use rust_decimal::Decimal;

use crate::models::{DropReason, Gender, RawRecord, RecordBatch};

fn full_headers() -> Vec<String> {
    REQUIRED_COLUMNS.iter().map(|column| column.to_string()).collect()
}

fn raw_row(transaction_id: &str) -> RawRecord {
    RawRecord {
        transaction_id: Some(transaction_id.to_string()),
        date: Some("2023-05-01".to_string()),
        customer_id: Some("CUST001".to_string()),
        gender: Some("Male".to_string()),
        age: Some("34".to_string()),
        product_category: Some("Beauty".to_string()),
        quantity: Some("2".to_string()),
        price_per_unit: Some("25.50".to_string()),
        total_amount: Some("51.00".to_string())
    }
}

fn batch_of(rows: Vec<RawRecord>) -> RecordBatch {
    RecordBatch {
        headers: full_headers(),
        rows
    }
}

#[test]
fn test_valid_batch_accepts_every_row() -> Result<()> {
    let batch = batch_of(vec![raw_row("1"), raw_row("2"), raw_row("3")]);

    let (accepted, report) = SchemaValidator::new().validate(&batch)?;

    assert_eq!(accepted.len(), 3);
    assert_eq!(report.received, 3);
    assert_eq!(report.accepted, 3);
    assert_eq!(report.dropped(), 0);
    assert_eq!(accepted[0].transaction_id, 1);
    assert_eq!(accepted[0].gender, Gender::Male);
    assert_eq!(accepted[0].price_per_unit.to_string(), "25.50");

    Ok(())
}

#[test]
fn test_missing_column_fails_the_whole_batch() {
    let headers: Vec<String> = full_headers()
        .into_iter()
        .filter(|header| header != "Total Amount")
        .collect();
    let batch = RecordBatch {
        headers,
        rows: vec![raw_row("1")]
    };

    let result = SchemaValidator::new().validate(&batch);

    match result {
        Err(SchemaError::MissingColumns { columns }) => {
            assert_eq!(columns, vec!["Total Amount".to_string()]);
        }
        Ok(_) => panic!("missing column must be fatal")
    }
}

#[test]
fn test_every_missing_column_is_reported() {
    let batch = RecordBatch {
        headers: vec!["Transaction ID".to_string(), "Date".to_string()],
        rows: Vec::new()
    };

    let result = SchemaValidator::new().validate(&batch);

    match result {
        Err(SchemaError::MissingColumns { columns }) => assert_eq!(columns.len(), 7),
        Ok(_) => panic!("missing columns must be fatal")
    }
}

#[test]
fn test_null_fields_drop_rows_and_count_per_field() -> Result<()> {
    let mut missing_age = raw_row("2");
    missing_age.age = None;
    let mut empty_customer = raw_row("3");
    empty_customer.customer_id = Some(String::new());

    let batch = batch_of(vec![raw_row("1"), missing_age, empty_customer]);
    let (accepted, report) = SchemaValidator::new().validate(&batch)?;

    assert_eq!(accepted.len(), 1);
    assert_eq!(report.dropped_for(&DropReason::NullField("age")), 1);
    assert_eq!(report.dropped_for(&DropReason::NullField("customer_id")), 1);

    Ok(())
}

#[test]
fn test_unparsable_date_drops_the_row() -> Result<()> {
    let mut bad_date = raw_row("2");
    bad_date.date = Some("not-a-date".to_string());

    let batch = batch_of(vec![raw_row("1"), bad_date]);
    let (accepted, report) = SchemaValidator::new().validate(&batch)?;

    assert_eq!(accepted.len(), 1);
    assert_eq!(report.dropped_for(&DropReason::Coercion("date")), 1);

    Ok(())
}

#[test]
fn test_fallback_date_formats_are_accepted() -> Result<()> {
    let mut us_format = raw_row("1");
    us_format.date = Some("05/01/2023".to_string());
    let mut dashed = raw_row("2");
    dashed.date = Some("01-05-2023".to_string());

    let batch = batch_of(vec![us_format, dashed]);
    let (accepted, report) = SchemaValidator::new().validate(&batch)?;

    assert_eq!(accepted.len(), 2);
    assert_eq!(report.dropped(), 0);
    assert_eq!(accepted[0].date, accepted[1].date);

    Ok(())
}

#[test]
fn test_unparsable_price_drops_the_row() -> Result<()> {
    let mut bad_price = raw_row("2");
    bad_price.price_per_unit = Some("twenty".to_string());

    let batch = batch_of(vec![raw_row("1"), bad_price]);
    let (accepted, report) = SchemaValidator::new().validate(&batch)?;

    assert_eq!(accepted.len(), 1);
    assert_eq!(report.dropped_for(&DropReason::Coercion("price_per_unit")), 1);

    Ok(())
}

#[test]
fn test_unknown_gender_is_a_coercion_failure() -> Result<()> {
    let mut bad_gender = raw_row("2");
    bad_gender.gender = Some("other".to_string());

    let batch = batch_of(vec![raw_row("1"), bad_gender]);
    let (accepted, report) = SchemaValidator::new().validate(&batch)?;

    assert_eq!(accepted.len(), 1);
    assert_eq!(report.dropped_for(&DropReason::Coercion("gender")), 1);

    Ok(())
}

#[test]
fn test_quantity_boundary_zero_rejected_one_accepted() -> Result<()> {
    let mut zero_quantity = raw_row("1");
    zero_quantity.quantity = Some("0".to_string());
    let mut one_quantity = raw_row("2");
    one_quantity.quantity = Some("1".to_string());

    let batch = batch_of(vec![zero_quantity, one_quantity]);
    let (accepted, report) = SchemaValidator::new().validate(&batch)?;

    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].transaction_id, 2);
    assert_eq!(report.dropped_for(&DropReason::Constraint("quantity")), 1);

    Ok(())
}

#[test]
fn test_zero_price_is_rejected() -> Result<()> {
    let mut zero_price = raw_row("1");
    zero_price.price_per_unit = Some("0.00".to_string());

    let batch = batch_of(vec![zero_price]);
    let (accepted, report) = SchemaValidator::new().validate(&batch)?;

    assert!(accepted.is_empty());
    assert_eq!(report.dropped_for(&DropReason::Constraint("price_per_unit")), 1);

    Ok(())
}

#[test]
fn test_negative_age_is_rejected() -> Result<()> {
    let mut negative_age = raw_row("1");
    negative_age.age = Some("-5".to_string());

    let batch = batch_of(vec![negative_age]);
    let (accepted, report) = SchemaValidator::new().validate(&batch)?;

    assert!(accepted.is_empty());
    assert_eq!(report.dropped_for(&DropReason::Constraint("age")), 1);

    Ok(())
}

#[test]
fn test_row_failing_multiple_checks_is_counted_once() -> Result<()> {
    let mut doubly_bad = raw_row("1");
    doubly_bad.quantity = Some("0".to_string());
    doubly_bad.total_amount = Some("-3.00".to_string());

    let batch = batch_of(vec![doubly_bad]);
    let (accepted, report) = SchemaValidator::new().validate(&batch)?;

    assert!(accepted.is_empty());
    assert_eq!(report.dropped(), 1);
    assert_eq!(report.dropped_for(&DropReason::Constraint("quantity")), 1);
    assert_eq!(report.dropped_for(&DropReason::Constraint("total_amount")), 0);

    Ok(())
}

#[test]
fn test_accounting_identity_over_a_mixed_batch() -> Result<()> {
    let mut rows = Vec::new();

    for id in 1..=10 {
        rows.push(raw_row(&id.to_string()));
    }
    rows[1].quantity = Some("-1".to_string());
    rows[4].date = Some("13/13/2023".to_string());
    rows[7].age = None;

    let batch = batch_of(rows);
    let (accepted, report) = SchemaValidator::new().validate(&batch)?;

    assert_eq!(report.received, 10);
    assert_eq!(accepted.len(), report.accepted);
    assert_eq!(report.accepted + report.dropped(), report.received);
    assert_eq!(report.dropped(), 3);

    Ok(())
}

#[test]
fn test_inconsistent_total_is_tolerated() -> Result<()> {
    let mut inconsistent = raw_row("1");
    inconsistent.total_amount = Some("99.99".to_string());

    let batch = batch_of(vec![inconsistent]);
    let (accepted, report) = SchemaValidator::new().validate(&batch)?;

    assert_eq!(accepted.len(), 1);
    assert_eq!(report.dropped(), 0);
    assert_eq!(accepted[0].total_amount, Decimal::new(9999, 2));

    Ok(())
}
