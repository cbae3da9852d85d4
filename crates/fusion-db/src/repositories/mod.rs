//! Repository implementations
//!
//! This module contains concrete implementations of the repository traits
//! defined in fusion-core, using sqlx for PostgreSQL access.

pub mod catalog_repo;
pub mod customer_repo;
pub mod order_repo;
pub mod statement_repo;

pub use catalog_repo::PgCatalogRepository;
pub use customer_repo::PgCustomerRepository;
pub use order_repo::PgOrderStore;
pub use statement_repo::PgLedgerGateway;
