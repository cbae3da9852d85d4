//! API layer for Fusion
//!
//! The public reseller endpoint: credential authentication, action
//! dispatch, and the response envelope.

#![forbid(unsafe_code)]

pub mod auth;
pub mod dto;
pub mod handlers;

pub use auth::ApiRequest;
pub use handlers::configure as configure_public_api;
