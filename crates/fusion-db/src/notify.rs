//! Notification channel implementation
//!
//! Queues order notifications for the mail sender. Writes are best-effort;
//! the orchestrator logs and swallows failures, and the sender drains the
//! queue out-of-band.

use async_trait::async_trait;
use fusion_core::{
    models::{Customer, Order},
    traits::NotificationChannel,
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL-backed mail queue
pub struct PgNotificationChannel {
    pool: PgPool,
    operator_email: String,
}

impl PgNotificationChannel {
    /// Create a new notification channel
    pub fn new(pool: PgPool, operator_email: impl Into<String>) -> Self {
        Self {
            pool,
            operator_email: operator_email.into(),
        }
    }

    async fn enqueue(&self, recipient: &str, subject: &str, body: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO mail_queue (recipient, subject, body)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(recipient)
        .bind(subject)
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to enqueue mail for {}: {}", recipient, e);
            AppError::Database(format!("Failed to enqueue mail: {}", e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for PgNotificationChannel {
    #[instrument(skip(self, customer, order), fields(order_id = order.id))]
    async fn notify_customer(&self, customer: &Customer, order: &Order) -> AppResult<()> {
        debug!("Queueing customer notification for order {}", order.id);

        let subject = format!("Order #{} received", order.id);
        let body = format!(
            "Your order for {} (x{}) has been received and is {}.\nPrice: {} {}",
            order.service_title, order.quantity, order.status, order.price, order.currency
        );
        self.enqueue(&customer.email, &subject, &body).await
    }

    #[instrument(skip(self, customer, order), fields(order_id = order.id))]
    async fn notify_operator(&self, customer: &Customer, order: &Order) -> AppResult<()> {
        debug!("Queueing operator notification for order {}", order.id);

        let subject = format!("New API order #{}", order.id);
        let body = format!(
            "{} placed an order for {} (x{}) at {} {}.",
            customer.name, order.service_title, order.quantity, order.price, order.currency
        );
        self.enqueue(&self.operator_email, &subject, &body).await
    }
}
