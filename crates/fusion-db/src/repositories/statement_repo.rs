//! Ledger gateway implementation
//!
//! Balance reads and statement annotation. The debit itself happens inside
//! the placement transaction; statement rows are written afterwards,
//! best-effort, by the orchestrator.

use async_trait::async_trait;
use fusion_core::{
    models::StatementEntry,
    traits::LedgerGateway,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of LedgerGateway
pub struct PgLedgerGateway {
    pool: PgPool,
}

impl PgLedgerGateway {
    /// Create a new ledger gateway
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerGateway for PgLedgerGateway {
    #[instrument(skip(self))]
    async fn current_balance(&self, customer_id: i64) -> AppResult<Decimal> {
        debug!("Reading balance for customer {}", customer_id);

        let balance: Option<Decimal> =
            sqlx::query_scalar("SELECT balance FROM customers WHERE id = $1")
                .bind(customer_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    error!("Database error reading balance: {}", e);
                    AppError::Database(format!("Failed to read balance: {}", e))
                })?;

        balance.ok_or_else(|| AppError::Database(format!("Customer {} not found", customer_id)))
    }

    #[instrument(skip(self, entry), fields(customer_id = entry.customer_id, order_id = entry.order_id))]
    async fn append_statement(&self, entry: &StatementEntry) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO statements (
                customer_id, detail, direction, amount, order_id,
                service_title, balance_after
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.customer_id)
        .bind(&entry.detail)
        .bind(entry.direction.to_string())
        .bind(entry.amount)
        .bind(entry.order_id)
        .bind(&entry.service_title)
        .bind(entry.balance_after)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to append statement: {}", e);
            AppError::Database(format!("Failed to append statement: {}", e))
        })?;

        Ok(())
    }
}
