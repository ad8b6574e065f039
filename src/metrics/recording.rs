//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so the orchestrator increments counters through
//! plain function calls, wherever the recorder sends them.

use metrics::{describe_counter, describe_histogram};

/// Registers metric descriptions once after the recorder is installed.
pub fn register_metrics() {
    describe_counter!("etl_runs_total", "Total number of ETL runs");
    describe_counter!("etl_errors_total", "Total number of errors in the ETL pipeline");
    describe_counter!("data_rows_processed_total", "Total number of rows processed");
    describe_histogram!("etl_duration_seconds", "Duration of ETL runs in seconds");
}

/// Record the start of a pipeline run or of one consumed message.
pub fn record_run() {
    metrics::counter!("etl_runs_total").increment(1);
}

/// Record rows that reached the store, written or skipped.
pub fn record_rows_processed(count: u64) {
    metrics::counter!("data_rows_processed_total").increment(count);
}

/// Record a failed run or a nacked message.
pub fn record_error() {
    metrics::counter!("etl_errors_total").increment(1);
}

/// Record the wall-clock duration of one run.
pub fn record_duration(seconds: f64) {
    metrics::histogram!("etl_duration_seconds").record(seconds);
}
