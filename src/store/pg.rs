use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::models::SalesRecord;
use crate::store::{InsertOutcome, SalesStore, StoreError};

const INSERT_SALE: &str = r#"
INSERT INTO sales (transaction_id, date, customer_id, gender, age, product_category, quantity, price_per_unit, total_amount)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
ON CONFLICT (transaction_id) DO NOTHING
"#;

const ENSURE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sales (
    transaction_id   BIGINT PRIMARY KEY,
    date             DATE NOT NULL,
    customer_id      TEXT NOT NULL,
    gender           TEXT NOT NULL,
    age              INTEGER NOT NULL,
    product_category TEXT NOT NULL,
    quantity         BIGINT NOT NULL,
    price_per_unit   NUMERIC NOT NULL,
    total_amount     NUMERIC NOT NULL
)
"#;

/// Postgres-backed sales store.
///
/// Holds a bounded connection pool; every insert checks a connection out and
/// returns it on all exit paths, so concurrent batch and streaming writers
/// only contend on the table's unique key.
pub struct PgSalesStore {
    pool: PgPool
}

impl PgSalesStore {
    pub async fn connect(url: &str, max_connections: u32, connect_timeout_secs: u64) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(connect_timeout_secs))
            .connect(url)
            .await?;

        info!(max_connections, "Connected to the sales store");

        Ok(Self { pool })
    }

    /// Creates the sales table and its unique key if absent. Idempotent, so
    /// every entry point can call it unconditionally at startup.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(ENSURE_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SalesStore for PgSalesStore {
    async fn insert_unless_exists(&self, record: &SalesRecord) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(INSERT_SALE)
            .bind(record.transaction_id)
            .bind(record.date)
            .bind(&record.customer_id)
            .bind(record.gender.as_str())
            .bind(record.age)
            .bind(&record.product_category)
            .bind(record.quantity)
            .bind(record.price_per_unit)
            .bind(record.total_amount)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            Ok(InsertOutcome::AlreadyExists)
        } else {
            Ok(InsertOutcome::Written)
        }
    }
}
