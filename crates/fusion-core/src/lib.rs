//! Fusion Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the Fusion ordering system. It includes:
//!
//! - Domain models (Customer, Service, Order, etc.)
//! - Common traits for repositories and gateways
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// API version tag carried by every response envelope.
pub const API_VERSION: &str = "2023.21";

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
