//! Order status resolution
//!
//! Read path over the order store. Maps internal statuses to the external
//! numeric codes through the fixed table on `OrderStatus`; bulk lookups run
//! one batched query and report per-id results, so one missing id never
//! fails the batch.

use fusion_core::{models::OrderStatus, traits::OrderStore, AppError, AppResult};
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::decoder;

/// Externally visible status of one order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatusView {
    /// External numeric status code
    pub code: i32,

    /// Status detail / delivered code
    pub comments: String,
}

impl OrderStatusView {
    fn new(status: &OrderStatus, comments: Option<&str>) -> Self {
        Self {
            code: status.external_code(),
            comments: comments.unwrap_or_default().to_string(),
        }
    }
}

/// Result of a bulk status lookup
///
/// Entries keep the caller's id order, coerced ids included, so the echoed
/// id string and the per-id results line up with what was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkStatusReport {
    /// Per-id outcome in request order; `None` marks an id with no
    /// matching order for this customer
    pub entries: Vec<(i64, Option<OrderStatusView>)>,

    /// The coerced ids joined back in original order
    pub echoed_ids: String,
}

/// Order status resolver
pub struct StatusResolver<O> {
    orders: Arc<O>,
}

impl<O: OrderStore> StatusResolver<O> {
    /// Create a new status resolver
    pub fn new(orders: Arc<O>) -> Self {
        Self { orders }
    }

    /// Resolve one order's status, scoped to the requesting customer
    ///
    /// Orders owned by another customer behave exactly like missing ones.
    #[instrument(skip(self))]
    pub async fn single(&self, customer_id: i64, order_id: i64) -> AppResult<OrderStatusView> {
        debug!("Resolving status of order {} for customer {}", order_id, customer_id);

        let order = self
            .orders
            .find_for_customer(customer_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound(order_id))?;

        Ok(OrderStatusView::new(&order.status, order.comments.as_deref()))
    }

    /// Resolve a comma-separated id list in one batched lookup
    #[instrument(skip(self, raw_ids))]
    pub async fn bulk(&self, customer_id: i64, raw_ids: &str) -> AppResult<BulkStatusReport> {
        let ids: Vec<i64> = raw_ids.split(',').map(decoder::coerce_id).collect();

        debug!(
            "Resolving status of {} orders for customer {}",
            ids.len(),
            customer_id
        );

        let orders = self.orders.find_many_for_customer(customer_id, &ids).await?;

        let entries = ids
            .iter()
            .map(|id| {
                let view = orders
                    .get(id)
                    .map(|order| OrderStatusView::new(&order.status, order.comments.as_deref()));
                (*id, view)
            })
            .collect();

        let echoed_ids = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Ok(BulkStatusReport { entries, echoed_ids })
    }
}
