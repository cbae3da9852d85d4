//! Business logic services for Fusion
//!
//! This crate contains the services that orchestrate ordering operations:
//! request decoding, field validation, order placement, status resolution,
//! pricing, and the per-customer rate gate.
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Each service owns its dependencies (repositories, gateways)
//! - Services are wrapped in Arc for safe sharing across async tasks
//! - All operations are instrumented with tracing
//! - Comprehensive error handling with AppError
//!
//! # Services
//!
//! - `decoder` - Order-parameter document decoding and id coercion
//! - `schema` - Field schema resolution and submitted-field validation
//! - `OrderPlacementService` - The placement pipeline over the atomic store
//! - `StatusResolver` - Single and bulk order status resolution
//! - `PgPricingGateway` - Price computation with per-customer overrides
//! - `RateGate` - Per-customer cooldown with inspectable next-eligible time

pub mod decoder;
pub mod placement;
pub mod pricing;
pub mod rate_gate;
pub mod schema;
pub mod status;

pub use placement::{OrderPlacementService, PlacedOrder};
pub use pricing::PgPricingGateway;
pub use rate_gate::RateGate;
pub use status::{BulkStatusReport, OrderStatusView, StatusResolver};
