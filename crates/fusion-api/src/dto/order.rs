//! Order placement and status DTOs

use fusion_services::{BulkStatusReport, OrderStatusView};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Payload of a successful placement
#[derive(Debug, Clone, Serialize)]
pub struct OrderReceived {
    #[serde(rename = "MESSAGE")]
    pub message: String,

    #[serde(rename = "REFERENCEID")]
    pub reference_id: i64,
}

impl OrderReceived {
    pub fn new(order_id: i64) -> Self {
        Self {
            message: "Order received".into(),
            reference_id: order_id,
        }
    }
}

/// Payload of a single status lookup
#[derive(Debug, Clone, Serialize)]
pub struct OrderStatusEntry {
    #[serde(rename = "STATUS")]
    pub status: i32,

    #[serde(rename = "CODE")]
    pub code: String,
}

impl From<&OrderStatusView> for OrderStatusEntry {
    fn from(view: &OrderStatusView) -> Self {
        Self {
            status: view.code,
            code: view.comments.clone(),
        }
    }
}

/// Per-id payload of a bulk status lookup
///
/// `COMMENTS` duplicates `CODE`; older clients read one, newer clients the
/// other.
#[derive(Debug, Clone, Serialize)]
pub struct BulkStatusEntry {
    #[serde(rename = "STATUS")]
    pub status: i32,

    #[serde(rename = "CODE")]
    pub code: String,

    #[serde(rename = "COMMENTS")]
    pub comments: String,
}

impl From<&OrderStatusView> for BulkStatusEntry {
    fn from(view: &OrderStatusView) -> Self {
        Self {
            status: view.code,
            code: view.comments.clone(),
            comments: view.comments.clone(),
        }
    }
}

/// Render a bulk status report into the response body
///
/// Found ids land in a `SUCCESS` object keyed by id, missing ids in an
/// `ERROR` list; the coerced id string is echoed under `ID` in the caller's
/// original order. Either section is omitted when empty.
pub fn render_bulk_report(report: &BulkStatusReport) -> Map<String, Value> {
    let mut successes = Map::new();
    let mut errors = Vec::new();

    for (id, view) in &report.entries {
        match view {
            Some(view) => {
                successes.insert(
                    id.to_string(),
                    serde_json::to_value(BulkStatusEntry::from(view)).unwrap_or(Value::Null),
                );
            }
            None => errors.push(json!({
                "MESSAGE": format!("Order ID {} not found!", id)
            })),
        }
    }

    let mut body = Map::new();
    if !successes.is_empty() {
        body.insert("SUCCESS".into(), Value::Object(successes));
    }
    if !errors.is_empty() {
        body.insert("ERROR".into(), Value::Array(errors));
    }
    body.insert("ID".into(), json!(report.echoed_ids));

    body
}
