//! Service catalog models
//!
//! Catalog entries are read-only during order placement; the ordering core
//! copies what it needs onto the order at creation time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Service input type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    /// Device-identifier service: the first declared input field is the
    /// primary identifier, supplied directly rather than via the custom blob
    Imei,
    /// Generic service: all declared fields come through the custom blob
    #[default]
    Generic,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::Imei => write!(f, "IMEI"),
            ServiceType::Generic => write!(f, "GENERIC"),
        }
    }
}

impl ServiceType {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "imei" => Some(ServiceType::Imei),
            "generic" => Some(ServiceType::Generic),
            _ => None,
        }
    }
}

/// Fulfillment routing mode of a service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProcessType {
    /// Auto-complete from stock; orders start out already successful
    Inventory,
    /// Asynchronous third-party fulfillment
    Api,
    /// Operator queue
    #[default]
    Manual,
}

impl fmt::Display for ProcessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessType::Inventory => write!(f, "Inventory"),
            ProcessType::Api => write!(f, "Api"),
            ProcessType::Manual => write!(f, "Manual"),
        }
    }
}

impl ProcessType {
    /// Parse from string (case-insensitive); anything unrecognized routes
    /// to the manual operator queue
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "inventory" => ProcessType::Inventory,
            "api" => ProcessType::Api,
            _ => ProcessType::Manual,
        }
    }
}

/// Service status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    #[default]
    Active,
    Inactive,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceStatus::Active => write!(f, "active"),
            ServiceStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl ServiceStatus {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(ServiceStatus::Active),
            "inactive" => Some(ServiceStatus::Inactive),
            _ => None,
        }
    }
}

/// Service catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Unique identifier
    pub id: i64,

    /// Owning service group
    pub service_group: i64,

    /// Display title, copied onto orders
    pub title: String,

    /// Input type (IMEI or generic)
    pub service_type: ServiceType,

    /// Fulfillment routing mode
    pub process_type: ProcessType,

    /// Catalog status; inactive services cannot be ordered
    pub status: ServiceStatus,

    /// Free services always price at zero
    pub free_service: bool,

    /// Base unit price used by the pricing gateway
    pub price: Decimal,

    /// Minimum order quantity
    pub min_quantity: i32,

    /// Maximum order quantity
    pub max_quantity: i32,

    /// Reference id used by the inventory and remote backends
    pub reference_id: Option<String>,

    /// Remote API profile id for asynchronous fulfillment
    pub api_id: Option<i64>,

    /// Advertised delivery time
    pub delivery_time: Option<String>,

    /// Popularity counter, incremented on each placed order
    pub sells: i64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Service {
    /// Check if the service can currently be ordered
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == ServiceStatus::Active
    }
}

impl Default for Service {
    fn default() -> Self {
        Self {
            id: 0,
            service_group: 0,
            title: String::new(),
            service_type: ServiceType::Generic,
            process_type: ProcessType::Manual,
            status: ServiceStatus::Active,
            free_service: false,
            price: Decimal::ZERO,
            min_quantity: 1,
            max_quantity: 1,
            reference_id: None,
            api_id: None,
            delivery_time: None,
            sells: 0,
            created_at: Utc::now(),
        }
    }
}

/// Service group type exposed on the service-list read path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Imei,
    Server,
    #[default]
    Remote,
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupType::Imei => write!(f, "IMEI"),
            GroupType::Server => write!(f, "SERVER"),
            GroupType::Remote => write!(f, "REMOTE"),
        }
    }
}

impl GroupType {
    /// Parse from string (case-insensitive); unknown types read as remote
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "imei" => GroupType::Imei,
            "server" => GroupType::Server,
            _ => GroupType::Remote,
        }
    }

    /// Numeric server marker exposed to clients
    pub fn server_marker(&self) -> i32 {
        match self {
            GroupType::Server => 1,
            GroupType::Imei => 0,
            GroupType::Remote => 2,
        }
    }
}

/// Service group catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceGroup {
    /// Unique identifier
    pub id: i64,

    /// Display name
    pub name: String,

    /// Group type
    pub group_type: GroupType,

    /// Catalog status
    pub status: ServiceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_type_defaults_to_manual() {
        assert_eq!(ProcessType::from_str("Inventory"), ProcessType::Inventory);
        assert_eq!(ProcessType::from_str("api"), ProcessType::Api);
        assert_eq!(ProcessType::from_str("whatever"), ProcessType::Manual);
        assert_eq!(ProcessType::from_str(""), ProcessType::Manual);
    }

    #[test]
    fn test_group_type_markers() {
        assert_eq!(GroupType::from_str("server").server_marker(), 1);
        assert_eq!(GroupType::from_str("IMEI").server_marker(), 0);
        assert_eq!(GroupType::from_str("anything").server_marker(), 2);
    }

    #[test]
    fn test_inactive_service() {
        let service = Service {
            status: ServiceStatus::Inactive,
            ..Default::default()
        };
        assert!(!service.is_active());
    }
}
