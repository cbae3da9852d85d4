//! Domain models for Fusion
//!
//! This module contains all the core domain models used throughout the application.

pub mod customer;
pub mod fields;
pub mod order;
pub mod service;
pub mod statement;

pub use customer::{Customer, CustomerStatus};
pub use fields::{FieldMap, FieldSchema, ServiceField};
pub use order::{NewOrder, NewOrderField, Order, OrderField, OrderStatus};
pub use service::{GroupType, ProcessType, Service, ServiceGroup, ServiceStatus, ServiceType};
pub use statement::{StatementDirection, StatementEntry};
