//! Order models
//!
//! The order is the central entity of the system. Price and quantity are
//! fixed at creation and never recomputed; status is seeded at creation and
//! mutated only by fulfillment paths, never by status queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::service::{ProcessType, ServiceType};

/// Internal order lifecycle status
///
/// The store may contain statuses written by downstream processors that are
/// outside this set; they are carried verbatim and map to the unknown
/// external code rather than failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Awaiting operator action (manual queue)
    WaitingAction,
    /// Being processed by an asynchronous backend
    InProcess,
    /// Fulfilled
    Success,
    /// Rejected by an operator or backend
    Rejected,
    /// Any other status string found in the store
    Other(String),
}

impl OrderStatus {
    /// Parse the stored status string; never fails
    pub fn parse(s: &str) -> Self {
        match s {
            "Waiting Action" => OrderStatus::WaitingAction,
            "In Process" => OrderStatus::InProcess,
            "Success" => OrderStatus::Success,
            "Rejected" => OrderStatus::Rejected,
            other => OrderStatus::Other(other.to_string()),
        }
    }

    /// External numeric status code exposed to API clients
    ///
    /// Fixed table; statuses outside it map to -1 rather than erroring.
    pub fn external_code(&self) -> i32 {
        match self {
            OrderStatus::Success => 4,
            OrderStatus::Rejected => 3,
            OrderStatus::InProcess => 1,
            OrderStatus::WaitingAction => 0,
            OrderStatus::Other(_) => -1,
        }
    }

    /// Status seeded onto a freshly placed order
    ///
    /// Inventory-backed services complete immediately; everything else
    /// waits for its fulfillment path.
    pub fn seed_for(process_type: ProcessType) -> Self {
        match process_type {
            ProcessType::Inventory => OrderStatus::Success,
            _ => OrderStatus::WaitingAction,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::WaitingAction => write!(f, "Waiting Action"),
            OrderStatus::InProcess => write!(f, "In Process"),
            OrderStatus::Success => write!(f, "Success"),
            OrderStatus::Rejected => write!(f, "Rejected"),
            OrderStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier
    pub id: i64,

    /// Owning customer; an order is never reassigned
    pub customer_id: i64,

    /// Customer name at placement time
    pub customer_name: String,

    /// Invoice marker
    pub invoice_status: String,

    /// Currency code copied from the customer
    pub currency: String,

    /// Service input type copied from the service
    pub service_type: ServiceType,

    /// Ordered service
    pub service_id: i64,

    /// Service title at placement time
    pub service_title: String,

    /// Ordered quantity, fixed at creation
    pub quantity: i32,

    /// Computed price, fixed at creation
    pub price: Decimal,

    /// Payment method marker
    pub payment_method: String,

    /// External transaction id marker
    pub transaction_id: String,

    /// Lifecycle status
    pub status: OrderStatus,

    /// Fulfillment routing mode copied from the service
    pub process_type: ProcessType,

    /// Remote API profile copied from the service
    pub api_id: Option<i64>,

    /// Reference id for the inventory/remote backends
    pub remote_service_id: Option<String>,

    /// Primary input value (device identifier or first custom value)
    pub primary_input: Option<String>,

    /// Free-text status detail; delivered codes land here
    pub comments: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Fields of an order not yet persisted
///
/// Built by the placement orchestrator and handed to the store, which
/// assigns the id and timestamp inside the placement transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub customer_name: String,
    pub currency: String,
    pub service_type: ServiceType,
    pub service_id: i64,
    pub service_title: String,
    pub quantity: i32,
    pub price: Decimal,
    pub status: OrderStatus,
    pub process_type: ProcessType,
    pub api_id: Option<i64>,
    pub remote_service_id: Option<String>,
    pub primary_input: Option<String>,
}

impl NewOrder {
    /// Invoice marker used for balance-paid API orders
    pub const INVOICE_PAID: &'static str = "paid";

    /// Payment method marker for balance-funded orders
    pub const PAYMENT_METHOD: &'static str = "My Funds";

    /// Transaction id marker when no external payment is involved
    pub const NO_TRANSACTION: &'static str = "-";
}

/// A persisted input value of an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderField {
    pub id: i64,
    pub order_id: i64,
    pub name: String,
    pub value: String,
}

/// An input value to persist alongside a new order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderField {
    pub name: String,
    pub value: String,
}

impl NewOrderField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
