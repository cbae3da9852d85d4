//! Common traits for repositories and gateways
//!
//! Defines the seams between the ordering core and its collaborators:
//! catalog reads, customer lookup, the order store (including the atomic
//! placement unit), the ledger, pricing, fulfillment backends, and the
//! notification channel.

use crate::error::AppError;
use crate::models::{
    Customer, NewOrder, NewOrderField, Order, Service, ServiceField, ServiceGroup, StatementEntry,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Read-only access to the service catalog
///
/// Field lists are returned in declaration order; the ordering is
/// significant for validation and error reporting.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Find a service by id
    async fn find_service(&self, id: i64) -> Result<Option<Service>, AppError>;

    /// Declared input fields of a service, in declaration order
    async fn find_service_fields(&self, service_id: i64) -> Result<Vec<ServiceField>, AppError>;

    /// Active service groups, ordered by name
    async fn list_active_groups(&self) -> Result<Vec<ServiceGroup>, AppError>;

    /// Active services of a group
    async fn list_active_services(&self, group_id: i64) -> Result<Vec<Service>, AppError>;

    /// Bump the popularity counter of a service
    async fn increment_sells(&self, service_id: i64) -> Result<(), AppError>;
}

/// Customer lookup
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Resolve the credential pair to a customer
    async fn find_by_credentials(
        &self,
        email: &str,
        api_key: &str,
    ) -> Result<Option<Customer>, AppError>;

    /// Find a customer by id
    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, AppError>;
}

/// The order store, canonical source of order lifecycle state
///
/// `place` is the atomic placement unit: balance check-and-debit, order
/// insert, and order-field inserts commit or fail together. Concurrent
/// placements by one customer serialize on the balance inside this call.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Atomically debit the customer and create the order with its field
    /// rows. Refuses with `InsufficientBalance` without any mutation when
    /// the balance does not cover the price.
    async fn place(
        &self,
        customer: &Customer,
        order: NewOrder,
        fields: &[NewOrderField],
    ) -> Result<Order, AppError>;

    /// Find an order scoped to its owning customer; foreign-owned orders
    /// behave as absent
    async fn find_for_customer(
        &self,
        customer_id: i64,
        order_id: i64,
    ) -> Result<Option<Order>, AppError>;

    /// Batched scoped lookup for bulk status queries; one store round-trip
    /// regardless of id count
    async fn find_many_for_customer(
        &self,
        customer_id: i64,
        ids: &[i64],
    ) -> Result<HashMap<i64, Order>, AppError>;
}

/// Balance ledger annotations
///
/// The debit itself lives inside `OrderStore::place`; this gateway only
/// reads the post-debit balance and appends statement rows.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Current balance of a customer
    async fn current_balance(&self, customer_id: i64) -> Result<Decimal, AppError>;

    /// Append a statement row
    async fn append_statement(&self, entry: &StatementEntry) -> Result<(), AppError>;
}

/// Price computation for (service, customer, quantity)
///
/// The formula is the gateway's business; the core only distinguishes
/// "positive price", "no price", and "gateway failure".
#[async_trait]
pub trait PricingGateway: Send + Sync {
    async fn price(
        &self,
        service_id: i64,
        customer_id: i64,
        quantity: i32,
    ) -> Result<Option<Decimal>, AppError>;
}

/// Fulfillment backends, fire-and-forget from the orchestrator
#[async_trait]
pub trait FulfillmentBackend: Send + Sync {
    /// Consume a stock item for an inventory-backed order
    async fn consume_inventory(&self, reference_id: &str, order_id: i64) -> Result<(), AppError>;

    /// Hand an order to the asynchronous third-party fulfillment path;
    /// its eventual status update arrives out-of-band
    async fn dispatch_async(&self, service_id: i64, order_id: i64) -> Result<(), AppError>;
}

/// Best-effort notification channel
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn notify_customer(&self, customer: &Customer, order: &Order) -> Result<(), AppError>;

    async fn notify_operator(&self, customer: &Customer, order: &Order) -> Result<(), AppError>;
}
