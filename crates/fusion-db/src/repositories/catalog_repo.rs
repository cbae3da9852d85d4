//! Catalog repository implementation
//!
//! Read-only access to service groups, services, and declared input fields.
//! Field lists come back ordered by id, which is declaration order; the
//! validation path depends on it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fusion_core::{
    models::{
        GroupType, ProcessType, Service, ServiceField, ServiceGroup, ServiceStatus, ServiceType,
    },
    traits::CatalogRepository,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument, warn};

/// PostgreSQL implementation of CatalogRepository
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    /// Create a new catalog repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SERVICE_COLUMNS: &str = r#"
    id, service_group, title, service_type, process_type, status,
    free_service, price, min_quantity, max_quantity, reference_id,
    api_id, delivery_time, sells, created_at
"#;

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    #[instrument(skip(self))]
    async fn find_service(&self, id: i64) -> AppResult<Option<Service>> {
        debug!("Finding service by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, ServiceRow>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding service {}: {}", id, e);
            AppError::Database(format!("Failed to find service: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_service_fields(&self, service_id: i64) -> AppResult<Vec<ServiceField>> {
        debug!("Finding declared fields for service: {}", service_id);

        let rows = sqlx::query_as::<sqlx::Postgres, ServiceFieldRow>(
            r#"
            SELECT id, service_id, name
            FROM service_fields
            WHERE service_id = $1
            ORDER BY id
            "#,
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error fetching fields for service {}: {}",
                service_id, e
            );
            AppError::Database(format!("Failed to fetch service fields: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_active_groups(&self) -> AppResult<Vec<ServiceGroup>> {
        let rows = sqlx::query_as::<sqlx::Postgres, ServiceGroupRow>(
            r#"
            SELECT id, name, group_type, status
            FROM service_groups
            WHERE status = 'active'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing service groups: {}", e);
            AppError::Database(format!("Failed to list service groups: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn list_active_services(&self, group_id: i64) -> AppResult<Vec<Service>> {
        let rows = sqlx::query_as::<sqlx::Postgres, ServiceRow>(&format!(
            r#"
            SELECT {SERVICE_COLUMNS} FROM services
            WHERE service_group = $1 AND status = 'active'
            ORDER BY title DESC
            "#
        ))
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error listing services for group {}: {}",
                group_id, e
            );
            AppError::Database(format!("Failed to list services: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn increment_sells(&self, service_id: i64) -> AppResult<()> {
        let result = sqlx::query("UPDATE services SET sells = sells + 1 WHERE id = $1")
            .bind(service_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Database error incrementing sells for service {}: {}",
                    service_id, e
                );
                AppError::Database(format!("Failed to increment sells: {}", e))
            })?;

        if result.rows_affected() == 0 {
            warn!("Sells increment matched no service: {}", service_id);
        }

        Ok(())
    }
}

/// Helper struct for mapping service rows
#[derive(Debug, sqlx::FromRow)]
struct ServiceRow {
    id: i64,
    service_group: i64,
    title: String,
    service_type: String,
    process_type: String,
    status: String,
    free_service: bool,
    price: Decimal,
    min_quantity: i32,
    max_quantity: i32,
    reference_id: Option<String>,
    api_id: Option<i64>,
    delivery_time: Option<String>,
    sells: i64,
    created_at: DateTime<Utc>,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: row.id,
            service_group: row.service_group,
            title: row.title,
            service_type: ServiceType::from_str(&row.service_type).unwrap_or(ServiceType::Generic),
            process_type: ProcessType::from_str(&row.process_type),
            status: ServiceStatus::from_str(&row.status).unwrap_or(ServiceStatus::Inactive),
            free_service: row.free_service,
            price: row.price,
            min_quantity: row.min_quantity,
            max_quantity: row.max_quantity,
            reference_id: row.reference_id,
            api_id: row.api_id,
            delivery_time: row.delivery_time,
            sells: row.sells,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ServiceFieldRow {
    id: i64,
    service_id: i64,
    name: String,
}

impl From<ServiceFieldRow> for ServiceField {
    fn from(row: ServiceFieldRow) -> Self {
        Self {
            id: row.id,
            service_id: row.service_id,
            name: row.name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ServiceGroupRow {
    id: i64,
    name: String,
    group_type: String,
    status: String,
}

impl From<ServiceGroupRow> for ServiceGroup {
    fn from(row: ServiceGroupRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            group_type: GroupType::from_str(&row.group_type),
            status: ServiceStatus::from_str(&row.status).unwrap_or(ServiceStatus::Inactive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_service_status_reads_as_inactive() {
        let row = ServiceRow {
            id: 1,
            service_group: 1,
            title: "Unlock".into(),
            service_type: "imei".into(),
            process_type: "api".into(),
            status: "archived".into(),
            free_service: false,
            price: Decimal::ZERO,
            min_quantity: 1,
            max_quantity: 1,
            reference_id: None,
            api_id: None,
            delivery_time: None,
            sells: 0,
            created_at: Utc::now(),
        };

        let service: Service = row.into();
        assert!(!service.is_active());
        assert_eq!(service.process_type, ProcessType::Api);
    }
}
