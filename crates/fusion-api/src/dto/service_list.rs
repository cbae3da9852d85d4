//! Service list DTOs
//!
//! The catalog read path groups active services under their group name and
//! advertises each service's unit price, quantity bounds, and input field
//! descriptors so clients can render order forms.

use fusion_core::models::{GroupType, Service, ServiceField, ServiceGroup};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// One service group with its services, keyed by service id
#[derive(Debug, Clone, Serialize)]
pub struct ServiceGroupEntry {
    #[serde(rename = "GROUPNAME")]
    pub group_name: String,

    #[serde(rename = "GROUPTYPE")]
    pub group_type: String,

    #[serde(rename = "SERVICES")]
    pub services: BTreeMap<String, ServiceEntry>,
}

impl ServiceGroupEntry {
    pub fn new(group: &ServiceGroup) -> Self {
        Self {
            group_name: group.name.clone(),
            group_type: group.group_type.to_string(),
            services: BTreeMap::new(),
        }
    }
}

/// One orderable service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceEntry {
    #[serde(rename = "SERVICEID")]
    pub service_id: i64,

    #[serde(rename = "SERVICETYPE")]
    pub service_type: String,

    #[serde(rename = "SERVER")]
    pub server: i32,

    #[serde(rename = "QNT")]
    pub qnt: i32,

    #[serde(rename = "MINQNT")]
    pub min_qnt: i32,

    #[serde(rename = "MAXQNT")]
    pub max_qnt: i32,

    #[serde(rename = "SERVICENAME")]
    pub service_name: String,

    #[serde(rename = "CREDIT")]
    pub credit: Decimal,

    #[serde(rename = "TIME")]
    pub time: String,

    #[serde(rename = "INFO")]
    pub info: String,

    #[serde(rename = "CUSTOM", skip_serializing_if = "Option::is_none")]
    pub custom: Option<PrimaryFieldDescriptor>,

    #[serde(rename = "Requires.Custom", skip_serializing_if = "Option::is_none")]
    pub requires_custom: Option<Vec<SecondaryFieldDescriptor>>,
}

impl ServiceEntry {
    /// Build the entry for one service with its quoted unit price
    pub fn new(service: &Service, group_type: GroupType, unit_price: Decimal) -> Self {
        Self {
            service_id: service.id,
            service_type: group_type.to_string(),
            server: group_type.server_marker(),
            qnt: i32::from(service.min_quantity > 0),
            min_qnt: service.min_quantity,
            max_qnt: service.max_quantity,
            service_name: service.title.clone(),
            credit: unit_price,
            time: service.delivery_time.clone().unwrap_or_default(),
            info: String::new(),
            custom: None,
            requires_custom: None,
        }
    }
}

/// Descriptor of the reserved primary input field of an IMEI-type service
#[derive(Debug, Clone, Serialize)]
pub struct PrimaryFieldDescriptor {
    pub allow: String,
    pub bulk: String,
    pub customname: String,
    pub custominfo: String,
    pub customlen: String,
    pub maxlength: String,
    pub regex: String,
    pub isalpha: String,
}

impl PrimaryFieldDescriptor {
    pub fn new(field: &ServiceField) -> Self {
        Self {
            allow: "1".into(),
            bulk: "0".into(),
            customname: field.name.clone(),
            custominfo: String::new(),
            customlen: "1".into(),
            maxlength: "300".into(),
            regex: String::new(),
            isalpha: "1".into(),
        }
    }
}

/// Descriptor of a required secondary input field
#[derive(Debug, Clone, Serialize)]
pub struct SecondaryFieldDescriptor {
    #[serde(rename = "type")]
    pub kind: String,

    pub fieldname: String,

    pub fieldtype: String,

    pub description: String,

    pub fieldoptions: String,

    pub required: String,
}

impl SecondaryFieldDescriptor {
    pub fn new(field: &ServiceField) -> Self {
        Self {
            kind: "serviceimei".into(),
            fieldname: field.name.clone(),
            fieldtype: "text".into(),
            description: String::new(),
            fieldoptions: String::new(),
            required: "on".into(),
        }
    }
}
