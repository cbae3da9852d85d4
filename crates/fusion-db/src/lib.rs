//! Fusion Database Layer
//!
//! This crate provides PostgreSQL database access and repository
//! implementations for the Fusion ordering system. It includes:
//!
//! - Connection pool management with sqlx
//! - Repository implementations for customers, catalog, and orders
//! - The atomic placement transaction (debit + order + field rows)
//! - Best-effort side-effect writers (statements, mail queue, fulfillment)

pub mod fulfillment;
pub mod notify;
pub mod pool;
pub mod repositories;

pub use fulfillment::PgFulfillmentBackend;
pub use notify::PgNotificationChannel;
pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use fusion_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
