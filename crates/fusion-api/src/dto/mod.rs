//! DTOs and the response envelope
//!
//! Success responses wrap their payload as `{"SUCCESS": [...], "apiversion"}`;
//! errors render through `AppError` as `{"ERROR": [{"MESSAGE": ...}]}` with
//! the same version tag. Bulk status responses use a keyed `SUCCESS` object
//! plus an `ERROR` list and the echoed `ID` string.

pub mod account;
pub mod order;
pub mod service_list;

pub use account::AccountInfo;
pub use order::{render_bulk_report, BulkStatusEntry, OrderReceived, OrderStatusEntry};
pub use service_list::{PrimaryFieldDescriptor, SecondaryFieldDescriptor, ServiceEntry, ServiceGroupEntry};

use actix_web::HttpResponse;
use fusion_core::API_VERSION;
use serde_json::{json, Map, Value};

/// Wrap payload items in the success envelope
pub fn success(items: Vec<Value>) -> HttpResponse {
    let mut body = Map::new();
    body.insert("SUCCESS".into(), Value::Array(items));
    success_body(body)
}

/// Wrap a prebuilt body map in the success envelope
///
/// The version tag is appended last; callers supply everything else.
pub fn success_body(mut body: Map<String, Value>) -> HttpResponse {
    body.insert("apiversion".into(), json!(API_VERSION));

    HttpResponse::Ok()
        .insert_header(("x-fusion-api-version", API_VERSION))
        .insert_header(("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"))
        .json(Value::Object(body))
}
