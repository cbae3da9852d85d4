//! Pricing gateway implementation
//!
//! Quotes a price for (service, customer, quantity): a per-customer custom
//! price overrides the service base price, times quantity. The placement
//! orchestrator only cares whether the quote is positive; the formula
//! itself stays behind the gateway trait.

use async_trait::async_trait;
use fusion_core::{traits::PricingGateway, AppError, AppResult};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of PricingGateway
pub struct PgPricingGateway {
    pool: PgPool,
}

impl PgPricingGateway {
    /// Create a new pricing gateway
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PricingGateway for PgPricingGateway {
    #[instrument(skip(self))]
    async fn price(
        &self,
        service_id: i64,
        customer_id: i64,
        quantity: i32,
    ) -> AppResult<Option<Decimal>> {
        let custom: Option<Decimal> = sqlx::query_scalar(
            r#"
            SELECT price
            FROM custom_prices
            WHERE service_id = $1 AND customer_id = $2
            "#,
        )
        .bind(service_id)
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error fetching custom price: {}", e);
            AppError::Database(format!("Failed to fetch custom price: {}", e))
        })?;

        let unit = match custom {
            Some(price) => {
                debug!(
                    "Custom price {} for service {} / customer {}",
                    price, service_id, customer_id
                );
                Some(price)
            }
            None => sqlx::query_scalar("SELECT price FROM services WHERE id = $1")
                .bind(service_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    error!("Database error fetching service price: {}", e);
                    AppError::Database(format!("Failed to fetch service price: {}", e))
                })?,
        };

        Ok(unit.map(|price| price * Decimal::from(quantity.max(1))))
    }
}
