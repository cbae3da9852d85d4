//! Unified error handling for Fusion
//!
//! This module provides a comprehensive error type that covers all possible
//! failure scenarios in the application, with automatic HTTP response mapping.
//!
//! Error messages double as the wire-level `MESSAGE` strings of the response
//! envelope, so existing reseller clients keep parsing them unchanged.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

use crate::API_VERSION;

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Database Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    // ==================== Authentication Errors ====================
    #[error("Authentication Failed")]
    AuthenticationFailed,

    #[error("You are Blocked!")]
    CustomerBlocked,

    #[error("API is inactive!")]
    ApiDisabled,

    // ==================== Request Decoding Errors ====================
    #[error("{0}")]
    MalformedRequest(String),

    #[error("CUSTOMFIELD must be base64 encoded.")]
    InvalidEncoding,

    #[error("CUSTOMFIELD must decode to valid JSON.")]
    InvalidJson,

    // ==================== Business Logic Errors ====================
    #[error("Service not found or inactive.")]
    ServiceNotFound,

    #[error("IMEI field is required.")]
    MissingPrimaryField,

    #[error("{0} is required.")]
    MissingRequiredField(String),

    #[error("Balance process error!")]
    PricingError,

    #[error("Not enough balance!")]
    InsufficientBalance { required: Decimal, available: Decimal },

    #[error("Order ID not found!")]
    OrderNotFound(i64),

    #[error("You are calling this API too frequently! Please try after {minutes} minutes.")]
    RateLimited { minutes: i64 },

    #[error("Invalid Action")]
    InvalidAction,

    // ==================== Validation Errors ====================
    #[error("{0}")]
    Validation(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    ///
    /// Credential, rate-limit, and unknown-action rejections keep HTTP 200
    /// with the error envelope; legacy reseller clients branch on the
    /// envelope body for these, not the status line.
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 200 OK with error envelope
            AppError::AuthenticationFailed
            | AppError::CustomerBlocked
            | AppError::ApiDisabled
            | AppError::RateLimited { .. }
            | AppError::InvalidAction
            | AppError::Validation(_) => StatusCode::OK,

            // 400 Bad Request
            AppError::MalformedRequest(_)
            | AppError::InvalidEncoding
            | AppError::InvalidJson
            | AppError::MissingPrimaryField
            | AppError::MissingRequiredField(_)
            | AppError::PricingError
            | AppError::InsufficientBalance { .. } => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::ServiceNotFound | AppError::OrderNotFound(_) => StatusCode::NOT_FOUND,

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for logs and diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Transaction(_) => "transaction_error",
            AppError::AuthenticationFailed => "authentication_failed",
            AppError::CustomerBlocked => "customer_blocked",
            AppError::ApiDisabled => "api_disabled",
            AppError::MalformedRequest(_) => "malformed_request",
            AppError::InvalidEncoding => "invalid_encoding",
            AppError::InvalidJson => "invalid_json",
            AppError::ServiceNotFound => "service_not_found",
            AppError::MissingPrimaryField => "missing_primary_field",
            AppError::MissingRequiredField(_) => "missing_required_field",
            AppError::PricingError => "pricing_error",
            AppError::InsufficientBalance { .. } => "insufficient_balance",
            AppError::OrderNotFound(_) => "order_not_found",
            AppError::RateLimited { .. } => "rate_limited",
            AppError::InvalidAction => "invalid_action",
            AppError::Validation(_) => "validation_error",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }

    /// True for errors that indicate an internal fault rather than a
    /// business-rule rejection.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::Database(_)
                | AppError::Pool(_)
                | AppError::Transaction(_)
                | AppError::Internal(_)
                | AppError::Config(_)
                | AppError::Serialization(_)
        )
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // Internal faults keep their detail out of the envelope.
        let message = if self.is_internal() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = json!({
            "ERROR": [{ "MESSAGE": message }],
            "apiversion": API_VERSION,
        });

        HttpResponse::build(status)
            .insert_header(("x-fusion-api-version", API_VERSION))
            .insert_header(("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"))
            .json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::AuthenticationFailed.status_code(), StatusCode::OK);
        assert_eq!(
            AppError::ServiceNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::OrderNotFound(42).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InsufficientBalance {
                required: dec!(10.00),
                available: dec!(5.00),
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_wire_messages() {
        assert_eq!(
            AppError::MissingRequiredField("Carrier".into()).to_string(),
            "Carrier is required."
        );
        assert_eq!(
            AppError::InsufficientBalance {
                required: dec!(4.50),
                available: dec!(1.00),
            }
            .to_string(),
            "Not enough balance!"
        );
        assert_eq!(
            AppError::RateLimited { minutes: 3 }.to_string(),
            "You are calling this API too frequently! Please try after 3 minutes."
        );
    }

    #[test]
    fn test_internal_errors_flagged() {
        assert!(AppError::Transaction("x".into()).is_internal());
        assert!(!AppError::PricingError.is_internal());
        assert!(!AppError::InvalidAction.is_internal());
    }
}
