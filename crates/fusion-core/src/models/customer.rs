//! Customer model
//!
//! Represents reseller accounts that order provisioning services against
//! a prepaid balance, authenticated with static API credentials.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Customer status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    /// Active customer - can use the API
    #[default]
    Active,
    /// Blocked customer - all API access refused
    Blocked,
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CustomerStatus::Active => write!(f, "active"),
            CustomerStatus::Blocked => write!(f, "blocked"),
        }
    }
}

impl CustomerStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(CustomerStatus::Active),
            "blocked" | "block" => Some(CustomerStatus::Blocked),
            _ => None,
        }
    }
}

/// Customer entity
///
/// A reseller with a prepaid balance. Orders debit the balance at placement
/// time; the balance never goes negative as a result of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier
    pub id: i64,

    /// Display name, copied onto orders at creation
    pub name: String,

    /// Login email, part of the API credential pair
    pub email: String,

    /// Static API access key
    pub api_key: String,

    /// Current prepaid balance
    pub balance: Decimal,

    /// Currency code (ISO 4217)
    pub currency: String,

    /// Customer status
    pub status: CustomerStatus,

    /// Whether API access is enabled for this customer
    pub api_enabled: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Check if the customer is active (not blocked)
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == CustomerStatus::Active
    }

    /// Check if the customer may call the public API
    pub fn can_use_api(&self) -> bool {
        self.is_active() && self.api_enabled
    }
}

impl Default for Customer {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            email: String::new(),
            api_key: String::new(),
            balance: Decimal::ZERO,
            currency: "USD".to_string(),
            status: CustomerStatus::Active,
            api_enabled: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(CustomerStatus::from_str("Active"), Some(CustomerStatus::Active));
        assert_eq!(CustomerStatus::from_str("block"), Some(CustomerStatus::Blocked));
        assert_eq!(CustomerStatus::from_str("gone"), None);
    }

    #[test]
    fn test_blocked_customer_cannot_use_api() {
        let customer = Customer {
            status: CustomerStatus::Blocked,
            api_enabled: true,
            ..Default::default()
        };
        assert!(!customer.can_use_api());
    }

    #[test]
    fn test_api_disabled_customer_cannot_use_api() {
        let customer = Customer {
            api_enabled: false,
            ..Default::default()
        };
        assert!(customer.is_active());
        assert!(!customer.can_use_api());
    }
}
