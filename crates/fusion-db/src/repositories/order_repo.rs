//! Order store implementation
//!
//! `place` is the atomic placement unit: the customer row is locked, the
//! balance is checked and debited, and the order plus its field rows are
//! inserted, all inside one transaction. Either every mutation becomes
//! visible or none does; there is no debited-but-orderless state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fusion_core::{
    models::{Customer, NewOrder, NewOrderField, Order, OrderStatus, ProcessType, ServiceType},
    traits::OrderStore,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};

/// PostgreSQL implementation of OrderStore
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a new order store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const ORDER_COLUMNS: &str = r#"
    id, customer_id, customer_name, invoice_status, currency, service_type,
    service_id, service_title, quantity, price, payment_method,
    transaction_id, status, process_type, api_id, remote_service_id,
    primary_input, comments, created_at
"#;

#[async_trait]
impl OrderStore for PgOrderStore {
    #[instrument(skip(self, customer, order, fields), fields(customer_id = customer.id, service_id = order.service_id))]
    async fn place(
        &self,
        customer: &Customer,
        order: NewOrder,
        fields: &[NewOrderField],
    ) -> AppResult<Order> {
        info!(
            "Placing order for customer {}: service {} x{} at {}",
            customer.id, order.service_id, order.quantity, order.price
        );

        // Start transaction
        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        // Lock customer row; concurrent placements by this customer queue here
        let balance: Decimal = sqlx::query_scalar(
            r#"
            SELECT balance
            FROM customers
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(customer.id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to lock customer: {}", e);
            AppError::Database(format!("Failed to lock customer: {}", e))
        })?
        .ok_or_else(|| AppError::Database(format!("Customer {} disappeared", customer.id)))?;

        if balance < order.price {
            warn!(
                "Insufficient balance for customer {}: required {}, available {}",
                customer.id, order.price, balance
            );
            return Err(AppError::InsufficientBalance {
                required: order.price,
                available: balance,
            });
        }

        // Debit
        sqlx::query(
            r#"
            UPDATE customers
            SET balance = balance - $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(customer.id)
        .bind(order.price)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to debit balance: {}", e);
            AppError::Database(format!("Failed to debit balance: {}", e))
        })?;

        // Create order record
        let created = sqlx::query_as::<sqlx::Postgres, OrderRow>(&format!(
            r#"
            INSERT INTO orders (
                customer_id, customer_name, invoice_status, currency,
                service_type, service_id, service_title, quantity, price,
                payment_method, transaction_id, status, process_type,
                api_id, remote_service_id, primary_input
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.customer_id)
        .bind(&order.customer_name)
        .bind(NewOrder::INVOICE_PAID)
        .bind(&order.currency)
        .bind(order.service_type.to_string())
        .bind(order.service_id)
        .bind(&order.service_title)
        .bind(order.quantity)
        .bind(order.price)
        .bind(NewOrder::PAYMENT_METHOD)
        .bind(NewOrder::NO_TRANSACTION)
        .bind(order.status.to_string())
        .bind(order.process_type.to_string())
        .bind(order.api_id)
        .bind(&order.remote_service_id)
        .bind(&order.primary_input)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("Failed to create order: {}", e);
            AppError::Database(format!("Failed to create order: {}", e))
        })?;

        // Persist input field rows alongside the order
        for field in fields {
            sqlx::query(
                r#"
                INSERT INTO order_fields (order_id, name, value)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(created.id)
            .bind(&field.name)
            .bind(&field.value)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Failed to persist order field {}: {}", field.name, e);
                AppError::Database(format!("Failed to persist order field: {}", e))
            })?;
        }

        // Commit transaction
        tx.commit().await.map_err(|e| {
            error!("Failed to commit transaction: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            "Created order {} for customer {}: debited {}",
            created.id, customer.id, order.price
        );

        Ok(created.into())
    }

    #[instrument(skip(self))]
    async fn find_for_customer(
        &self,
        customer_id: i64,
        order_id: i64,
    ) -> AppResult<Option<Order>> {
        debug!("Finding order {} for customer {}", order_id, customer_id);

        let result = sqlx::query_as::<sqlx::Postgres, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 AND id = $2"
        ))
        .bind(customer_id)
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding order {}: {}", order_id, e);
            AppError::Database(format!("Failed to find order: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self, ids), fields(id_count = ids.len()))]
    async fn find_many_for_customer(
        &self,
        customer_id: i64,
        ids: &[i64],
    ) -> AppResult<HashMap<i64, Order>> {
        debug!(
            "Finding {} orders for customer {}",
            ids.len(),
            customer_id
        );

        let rows = sqlx::query_as::<sqlx::Postgres, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 AND id = ANY($2)"
        ))
        .bind(customer_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error in bulk order lookup: {}", e);
            AppError::Database(format!("Failed to fetch orders: {}", e))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let order: Order = row.into();
                (order.id, order)
            })
            .collect())
    }
}

/// Helper struct for mapping order rows
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_id: i64,
    customer_name: String,
    invoice_status: String,
    currency: String,
    service_type: String,
    service_id: i64,
    service_title: String,
    quantity: i32,
    price: Decimal,
    payment_method: String,
    transaction_id: String,
    status: String,
    process_type: String,
    api_id: Option<i64>,
    remote_service_id: Option<String>,
    primary_input: Option<String>,
    comments: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            customer_id: row.customer_id,
            customer_name: row.customer_name,
            invoice_status: row.invoice_status,
            currency: row.currency,
            service_type: ServiceType::from_str(&row.service_type)
                .unwrap_or(ServiceType::Generic),
            service_id: row.service_id,
            service_title: row.service_title,
            quantity: row.quantity,
            price: row.price,
            payment_method: row.payment_method,
            transaction_id: row.transaction_id,
            status: OrderStatus::parse(&row.status),
            process_type: ProcessType::from_str(&row.process_type),
            api_id: row.api_id,
            remote_service_id: row.remote_service_id,
            primary_input: row.primary_input,
            comments: row.comments,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_preserves_unmapped_status() {
        let row = OrderRow {
            id: 9,
            customer_id: 1,
            customer_name: "Acme".into(),
            invoice_status: "paid".into(),
            currency: "USD".into(),
            service_type: "imei".into(),
            service_id: 3,
            service_title: "Unlock".into(),
            quantity: 1,
            price: Decimal::ZERO,
            payment_method: "My Funds".into(),
            transaction_id: "-".into(),
            status: "Refund Pending".into(),
            process_type: "manual".into(),
            api_id: None,
            remote_service_id: None,
            primary_input: None,
            comments: None,
            created_at: Utc::now(),
        };

        let order: Order = row.into();
        assert_eq!(order.status, OrderStatus::Other("Refund Pending".into()));
        assert_eq!(order.status.external_code(), -1);
    }
}
