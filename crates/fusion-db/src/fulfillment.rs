//! Fulfillment backend implementation
//!
//! Routes committed orders into their fulfillment paths. Inventory-backed
//! orders take a code from stock; API-backed orders are queued for the
//! remote fulfillment worker, which reports status out-of-band. Both are
//! fire-and-forget from the orchestrator's perspective and never touch the
//! placement transaction.

use async_trait::async_trait;
use fusion_core::{
    models::OrderStatus,
    traits::FulfillmentBackend,
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};

/// PostgreSQL-backed fulfillment dispatcher
pub struct PgFulfillmentBackend {
    pool: PgPool,
}

impl PgFulfillmentBackend {
    /// Create a new fulfillment backend
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FulfillmentBackend for PgFulfillmentBackend {
    /// Take one unconsumed code from the stock pool and attach it to the
    /// order. The code lands in the order's comments, where status queries
    /// surface it to the reseller.
    #[instrument(skip(self))]
    async fn consume_inventory(&self, reference_id: &str, order_id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start inventory transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        let code: Option<(i64, String)> = sqlx::query_as(
            r#"
            SELECT id, code
            FROM inventory_codes
            WHERE reference_id = $1 AND order_id IS NULL
            ORDER BY id
            LIMIT 1
            FOR UPDATE SKIP LOCKED
            "#,
        )
        .bind(reference_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to pick inventory code: {}", e);
            AppError::Database(format!("Failed to pick inventory code: {}", e))
        })?;

        let Some((code_id, code)) = code else {
            warn!(
                "Inventory pool {} exhausted; order {} left for operator",
                reference_id, order_id
            );
            return Err(AppError::Internal(format!(
                "Inventory pool {} exhausted",
                reference_id
            )));
        };

        sqlx::query(
            r#"
            UPDATE inventory_codes
            SET order_id = $2, consumed_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(code_id)
        .bind(order_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(format!("Failed to consume inventory code: {}", e)))?;

        sqlx::query("UPDATE orders SET comments = $2 WHERE id = $1")
            .bind(order_id)
            .bind(&code)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to attach code to order: {}", e)))?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit inventory consumption: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            "Consumed inventory code {} for order {}",
            code_id, order_id
        );

        Ok(())
    }

    /// Queue the order for the remote fulfillment worker and mark it
    /// in process. The worker's eventual result arrives through a separate
    /// write path.
    #[instrument(skip(self))]
    async fn dispatch_async(&self, service_id: i64, order_id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start dispatch transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        sqlx::query(
            r#"
            INSERT INTO fulfillment_jobs (service_id, order_id, state)
            VALUES ($1, $2, 'queued')
            "#,
        )
        .bind(service_id)
        .bind(order_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to queue fulfillment job: {}", e);
            AppError::Database(format!("Failed to queue fulfillment job: {}", e))
        })?;

        sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
            .bind(order_id)
            .bind(OrderStatus::InProcess.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("Failed to mark order in process: {}", e)))?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit dispatch: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            "Queued order {} for remote fulfillment via service {}",
            order_id, service_id
        );

        Ok(())
    }
}
