//! Customer repository implementation
//!
//! Provides PostgreSQL-backed lookup of reseller customers by id and by
//! API credential pair.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fusion_core::{
    models::{Customer, CustomerStatus},
    traits::CustomerRepository,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of CustomerRepository
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    /// Create a new customer repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CUSTOMER_COLUMNS: &str = r#"
    id, name, email, api_key, balance, currency, status, api_enabled,
    created_at, updated_at
"#;

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    #[instrument(skip(self, api_key))]
    async fn find_by_credentials(
        &self,
        email: &str,
        api_key: &str,
    ) -> AppResult<Option<Customer>> {
        debug!("Finding customer by credentials: {}", email);

        let result = sqlx::query_as::<sqlx::Postgres, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE email = $1 AND api_key = $2"
        ))
        .bind(email)
        .bind(api_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding customer by credentials: {}", e);
            AppError::Database(format!("Failed to find customer: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Customer>> {
        debug!("Finding customer by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding customer {}: {}", id, e);
            AppError::Database(format!("Failed to find customer: {}", e))
        })?;

        Ok(result.map(Into::into))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    email: String,
    api_key: String,
    balance: Decimal,
    currency: String,
    status: String,
    api_enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            api_key: row.api_key,
            balance: row.balance,
            currency: row.currency,
            status: CustomerStatus::from_str(&row.status).unwrap_or(CustomerStatus::Blocked),
            api_enabled: row.api_enabled,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
