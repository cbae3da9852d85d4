//! Order-parameter request decoding
//!
//! Reseller clients submit an XML parameter document alongside each order
//! or status action. This module decodes it into normalized values: the
//! service/order id, quantity, the primary identifier value, and the
//! secondary custom-field map carried as a base64-encoded JSON object.
//!
//! Ids are coerced with leading-integer semantics: `"7 units"` reads as 7
//! and a non-numeric token reads as 0, a sentinel that matches no record.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use fusion_core::{models::FieldMap, AppError, AppResult};
use serde::Deserialize;
use serde_json::Value;

/// Decoded order-placement parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Requested service id
    pub service_id: i64,

    /// Order quantity; defaults to 1 when absent or non-positive
    pub quantity: i32,

    /// Submitted primary identifier value (empty when not submitted)
    pub primary_value: String,

    /// Secondary fields decoded from the custom blob, in submission order
    pub custom_fields: FieldMap,
}

/// Raw XML shape of the order parameter document
#[derive(Debug, Deserialize)]
struct OrderParams {
    #[serde(rename = "ID")]
    id: Option<String>,

    #[serde(rename = "IMEI", default)]
    imei: Option<String>,

    #[serde(rename = "QNT", default)]
    qnt: Option<String>,

    #[serde(rename = "CUSTOMFIELD", default)]
    customfield: Option<String>,
}

/// Raw XML shape of the status parameter document
#[derive(Debug, Deserialize)]
struct StatusParams {
    #[serde(rename = "ID")]
    id: Option<String>,
}

/// Decode the order-placement parameter document
pub fn decode_order_request(raw: &str) -> AppResult<OrderRequest> {
    let params: OrderParams = quick_xml::de::from_str(raw)
        .map_err(|_| AppError::MalformedRequest("Parameter or Service <ID> missing.".into()))?;

    let id = params
        .id
        .ok_or_else(|| AppError::MalformedRequest("Parameter or Service <ID> missing.".into()))?;

    let quantity = match coerce_id(params.qnt.as_deref().unwrap_or("")) {
        q if q > 0 => q as i32,
        _ => 1,
    };

    let custom_fields = match params.customfield.as_deref() {
        Some(blob) if !blob.is_empty() => decode_custom_fields(blob)?,
        _ => FieldMap::new(),
    };

    Ok(OrderRequest {
        service_id: coerce_id(&id),
        quantity,
        primary_value: params.imei.unwrap_or_default(),
        custom_fields,
    })
}

/// Decode the status parameter document, returning the raw id text
///
/// Single lookups coerce the whole text; bulk lookups split it on commas
/// first. Either way the element itself is mandatory.
pub fn decode_status_request(raw: &str) -> AppResult<String> {
    let params: StatusParams = quick_xml::de::from_str(raw)
        .map_err(|_| AppError::MalformedRequest("Parameter required.".into()))?;

    params
        .id
        .ok_or_else(|| AppError::MalformedRequest("Parameter required.".into()))
}

/// Coerce a token to an id with leading-integer semantics
///
/// Skips leading whitespace, accepts an optional sign, then reads the
/// longest digit prefix. Anything else yields 0.
pub fn coerce_id(token: &str) -> i64 {
    let trimmed = token.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let prefix: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();
    prefix.parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

/// Decode the base64 JSON custom-field blob into an ordered field map
///
/// The blob must satisfy the alphabet and round-trip check (decoding and
/// re-encoding reproduces the input) before its bytes are parsed; the two
/// failure modes are reported separately.
fn decode_custom_fields(blob: &str) -> AppResult<FieldMap> {
    let decoded = strict_base64_decode(blob).ok_or(AppError::InvalidEncoding)?;

    let value: Value = serde_json::from_slice(&decoded).map_err(|_| AppError::InvalidJson)?;
    let Value::Object(object) = value else {
        return Err(AppError::InvalidJson);
    };

    // serde_json preserves object order here; submission order is
    // significant for the fallback primary value.
    Ok(object
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (name, value)
        })
        .collect())
}

fn strict_base64_decode(blob: &str) -> Option<Vec<u8>> {
    let alphabet_ok = blob
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=');
    if !alphabet_ok {
        return None;
    }

    let decoded = STANDARD.decode(blob).ok()?;
    (STANDARD.encode(&decoded) == blob).then_some(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_json(json: &str) -> String {
        STANDARD.encode(json)
    }

    #[test]
    fn test_decode_full_order_request() {
        let blob = encode_json(r#"{"Carrier":"Vodafone","Country":"DE"}"#);
        let raw = format!(
            "<PARAMETERS><ID>7</ID><IMEI>356938035643809</IMEI><QNT>2</QNT><CUSTOMFIELD>{}</CUSTOMFIELD></PARAMETERS>",
            blob
        );

        let request = decode_order_request(&raw).unwrap();
        assert_eq!(request.service_id, 7);
        assert_eq!(request.quantity, 2);
        assert_eq!(request.primary_value, "356938035643809");
        assert_eq!(request.custom_fields.get("Carrier"), Some("Vodafone"));
        assert_eq!(request.custom_fields.first(), Some(("Carrier", "Vodafone")));
    }

    #[test]
    fn test_missing_id_is_malformed() {
        let err = decode_order_request("<PARAMETERS><QNT>2</QNT></PARAMETERS>").unwrap_err();
        assert!(matches!(err, AppError::MalformedRequest(_)));

        let err = decode_order_request("not xml at all <<<").unwrap_err();
        assert!(matches!(err, AppError::MalformedRequest(_)));
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        for qnt in ["", "0", "-3", "abc"] {
            let raw = format!("<P><ID>1</ID><QNT>{}</QNT></P>", qnt);
            let request = decode_order_request(&raw).unwrap();
            assert_eq!(request.quantity, 1, "QNT={:?}", qnt);
        }

        let request = decode_order_request("<P><ID>1</ID></P>").unwrap();
        assert_eq!(request.quantity, 1);
    }

    #[test]
    fn test_absent_blob_yields_empty_map() {
        let request = decode_order_request("<P><ID>1</ID></P>").unwrap();
        assert!(request.custom_fields.is_empty());

        let request = decode_order_request("<P><ID>1</ID><CUSTOMFIELD></CUSTOMFIELD></P>").unwrap();
        assert!(request.custom_fields.is_empty());
    }

    #[test]
    fn test_bad_alphabet_is_invalid_encoding() {
        let raw = "<P><ID>1</ID><CUSTOMFIELD>not-base64!!</CUSTOMFIELD></P>";
        let err = decode_order_request(raw).unwrap_err();
        assert!(matches!(err, AppError::InvalidEncoding));
    }

    #[test]
    fn test_non_json_payload_is_invalid_json() {
        let blob = STANDARD.encode("plain text, not json");
        let raw = format!("<P><ID>1</ID><CUSTOMFIELD>{}</CUSTOMFIELD></P>", blob);
        let err = decode_order_request(&raw).unwrap_err();
        assert!(matches!(err, AppError::InvalidJson));

        // A JSON scalar is not a field object either
        let blob = encode_json("42");
        let raw = format!("<P><ID>1</ID><CUSTOMFIELD>{}</CUSTOMFIELD></P>", blob);
        let err = decode_order_request(&raw).unwrap_err();
        assert!(matches!(err, AppError::InvalidJson));
    }

    #[test]
    fn test_field_map_preserves_submission_order() {
        let blob = encode_json(r#"{"Zeta":"1","Alpha":"2","Mid":"3"}"#);
        let raw = format!("<P><ID>1</ID><CUSTOMFIELD>{}</CUSTOMFIELD></P>", blob);
        let request = decode_order_request(&raw).unwrap();

        let names: Vec<&str> = request.custom_fields.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_scalar_values_are_stringified() {
        let blob = encode_json(r#"{"Slots":3,"Express":true,"Note":null}"#);
        let raw = format!("<P><ID>1</ID><CUSTOMFIELD>{}</CUSTOMFIELD></P>", blob);
        let request = decode_order_request(&raw).unwrap();

        assert_eq!(request.custom_fields.get("Slots"), Some("3"));
        assert_eq!(request.custom_fields.get("Express"), Some("true"));
        assert_eq!(request.custom_fields.get("Note"), Some(""));
    }

    #[test]
    fn test_coerce_id_semantics() {
        assert_eq!(coerce_id("42"), 42);
        assert_eq!(coerce_id("  42  "), 42);
        assert_eq!(coerce_id("42abc"), 42);
        assert_eq!(coerce_id("abc"), 0);
        assert_eq!(coerce_id(""), 0);
        assert_eq!(coerce_id("-7"), -7);
        assert_eq!(coerce_id("+9"), 9);
    }

    #[test]
    fn test_decode_status_request() {
        let ids = decode_status_request("<P><ID>1,2,999</ID></P>").unwrap();
        assert_eq!(ids, "1,2,999");

        let err = decode_status_request("<P><QNT>1</QNT></P>").unwrap_err();
        assert!(matches!(err, AppError::MalformedRequest(_)));
    }
}
