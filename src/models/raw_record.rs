use serde::Deserialize;

/// One row of the input file before coercion.
///
/// Field names map 1:1 to the human-readable header row of the source file.
/// Every field is optional so that empty cells survive deserialization and
/// can be counted per field by the validator instead of failing the read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Transaction ID")]
    pub transaction_id: Option<String>,
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Customer ID")]
    pub customer_id: Option<String>,
    #[serde(rename = "Gender")]
    pub gender: Option<String>,
    #[serde(rename = "Age")]
    pub age: Option<String>,
    #[serde(rename = "Product Category")]
    pub product_category: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<String>,
    #[serde(rename = "Price per Unit")]
    pub price_per_unit: Option<String>,
    #[serde(rename = "Total Amount")]
    pub total_amount: Option<String>
}

/// A loaded batch: the header row as read, plus every data row.
///
/// The headers are captured verbatim so the validator can tell a column that
/// is absent from the file (fatal) apart from a field that is empty on some
/// rows (recoverable).
#[derive(Debug, Clone, Default)]
pub struct RecordBatch {
    pub headers: Vec<String>,
    pub rows: Vec<RawRecord>
}

impl RecordBatch {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
