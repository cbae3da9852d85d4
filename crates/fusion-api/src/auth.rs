//! API credential authentication
//!
//! Every public request carries the same credential triple. The request
//! shape is validated first, then the credential pair is resolved to a
//! customer who must be unblocked and API-enabled.

use fusion_core::{
    models::Customer,
    traits::CustomerRepository,
    AppError, AppResult,
};
use serde::Deserialize;
use tracing::{debug, warn};
use validator::Validate;

/// The public API request body
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApiRequest {
    /// Login email of the reseller
    #[serde(default)]
    #[validate(
        email(message = "User name must be an email"),
        length(max = 60, message = "User name must not exceed 60 characters")
    )]
    pub username: String,

    /// Static API access key
    #[serde(default)]
    #[validate(length(max = 39, message = "API access key must not exceed 39 characters"))]
    pub apiaccesskey: String,

    /// Requested action
    #[serde(default)]
    #[validate(length(max = 30, message = "Action must not exceed 30 characters"))]
    pub action: String,

    /// Optional XML parameter document for order/status actions
    #[serde(default)]
    pub parameters: Option<String>,
}

impl ApiRequest {
    /// Validate the request shape, reporting the first problem with the
    /// message resellers have always seen
    pub fn ensure_valid(&self) -> AppResult<()> {
        if self.username.is_empty() {
            return Err(AppError::Validation("User name is required".into()));
        }
        if self.apiaccesskey.is_empty() {
            return Err(AppError::Validation("API access key is required".into()));
        }
        if self.action.is_empty() {
            return Err(AppError::Validation("Action is required".into()));
        }
        self.validate()?;
        Ok(())
    }

    /// The parameter document, empty when absent
    pub fn parameters(&self) -> &str {
        self.parameters.as_deref().unwrap_or("")
    }
}

/// Resolve the credential pair to an authorized customer
pub async fn authenticate<R: CustomerRepository>(
    customers: &R,
    request: &ApiRequest,
) -> AppResult<Customer> {
    let customer = customers
        .find_by_credentials(&request.username, &request.apiaccesskey)
        .await?
        .ok_or_else(|| {
            warn!("Authentication failed for {}", request.username);
            AppError::AuthenticationFailed
        })?;

    if !customer.is_active() {
        warn!("Blocked customer {} attempted API access", customer.id);
        return Err(AppError::CustomerBlocked);
    }
    if !customer.api_enabled {
        warn!("Customer {} has API access disabled", customer.id);
        return Err(AppError::ApiDisabled);
    }

    debug!("Authenticated customer {}", customer.id);
    Ok(customer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, key: &str, action: &str) -> ApiRequest {
        ApiRequest {
            username: username.into(),
            apiaccesskey: key.into(),
            action: action.into(),
            parameters: None,
        }
    }

    #[test]
    fn test_missing_fields_report_in_order() {
        let err = request("", "", "").ensure_valid().unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "User name is required"));

        let err = request("a@b.example", "", "").ensure_valid().unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "API access key is required"));

        let err = request("a@b.example", "key", "").ensure_valid().unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Action is required"));
    }

    #[test]
    fn test_username_must_be_email() {
        let err = request("not-an-email", "key", "accountinfo")
            .ensure_valid()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m.contains("must be an email")));
    }

    #[test]
    fn test_oversized_key_rejected() {
        let key = "k".repeat(40);
        let err = request("a@b.example", &key, "accountinfo")
            .ensure_valid()
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_valid_request_passes() {
        request("a@b.example", "key", "accountinfo")
            .ensure_valid()
            .unwrap();
    }
}
