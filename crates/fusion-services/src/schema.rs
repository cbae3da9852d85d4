//! Field schema resolution and submitted-field validation
//!
//! A service's declared field list splits into a primary identifier field
//! and required secondary fields. IMEI-type services reserve the first
//! declared field as the primary; everything else is required-secondary.
//! Validation walks the required names in declaration order and reports the
//! first one that is absent or empty, so error messages are deterministic.

use fusion_core::{
    models::{FieldMap, FieldSchema, Service, ServiceField, ServiceType},
    AppError, AppResult,
};

/// Resolve the input schema of a service from its declared fields
pub fn resolve_schema(service_type: ServiceType, declared: &[ServiceField]) -> FieldSchema {
    match service_type {
        ServiceType::Imei => {
            let mut names = declared.iter().map(|f| f.name.clone());
            let primary = names.next();
            FieldSchema {
                primary,
                required: names.collect(),
            }
        }
        ServiceType::Generic => FieldSchema {
            primary: None,
            required: declared.iter().map(|f| f.name.clone()).collect(),
        },
    }
}

/// Validate submitted values against a service's declared fields
///
/// Returns the resolved schema on success so the caller can persist field
/// rows without re-deriving it.
pub fn validate_fields(
    service: &Service,
    declared: &[ServiceField],
    primary_value: &str,
    incoming: &FieldMap,
) -> AppResult<FieldSchema> {
    let schema = resolve_schema(service.service_type, declared);

    // A service with zero declared fields has no primary requirement.
    if service.service_type == ServiceType::Imei
        && !declared.is_empty()
        && primary_value.trim().is_empty()
    {
        return Err(AppError::MissingPrimaryField);
    }

    for name in &schema.required {
        match incoming.get(name) {
            Some(value) if !value.trim().is_empty() => {}
            _ => return Err(AppError::MissingRequiredField(name.clone())),
        }
    }

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(names: &[&str]) -> Vec<ServiceField> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| ServiceField {
                id: i as i64 + 1,
                service_id: 1,
                name: name.to_string(),
            })
            .collect()
    }

    fn imei_service() -> Service {
        Service {
            service_type: ServiceType::Imei,
            ..Default::default()
        }
    }

    fn generic_service() -> Service {
        Service {
            service_type: ServiceType::Generic,
            ..Default::default()
        }
    }

    #[test]
    fn test_imei_reserves_first_field() {
        let fields = declared(&["IMEI Number", "Carrier", "Country"]);
        let schema = resolve_schema(ServiceType::Imei, &fields);

        assert_eq!(schema.primary.as_deref(), Some("IMEI Number"));
        assert_eq!(schema.required, vec!["Carrier", "Country"]);
    }

    #[test]
    fn test_generic_has_no_primary() {
        let fields = declared(&["Username", "Server"]);
        let schema = resolve_schema(ServiceType::Generic, &fields);

        assert_eq!(schema.primary, None);
        assert_eq!(schema.required, vec!["Username", "Server"]);
    }

    #[test]
    fn test_empty_primary_fails_when_fields_declared() {
        let fields = declared(&["IMEI Number"]);
        let err =
            validate_fields(&imei_service(), &fields, "  ", &FieldMap::new()).unwrap_err();
        assert!(matches!(err, AppError::MissingPrimaryField));
    }

    #[test]
    fn test_no_declared_fields_means_no_primary_requirement() {
        let schema = validate_fields(&imei_service(), &[], "", &FieldMap::new()).unwrap();
        assert_eq!(schema.primary, None);
        assert!(schema.required.is_empty());
    }

    #[test]
    fn test_first_missing_field_in_declaration_order() {
        let fields = declared(&["IMEI Number", "Carrier", "Country", "Model"]);
        let mut incoming = FieldMap::new();
        // Country submitted out of order; Carrier still reported first
        incoming.insert("Country", "DE");

        let err =
            validate_fields(&imei_service(), &fields, "356938035643809", &incoming).unwrap_err();
        match err {
            AppError::MissingRequiredField(name) => assert_eq!(name, "Carrier"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let fields = declared(&["Username"]);
        let mut incoming = FieldMap::new();
        incoming.insert("Username", "");

        let err = validate_fields(&generic_service(), &fields, "", &incoming).unwrap_err();
        assert!(matches!(err, AppError::MissingRequiredField(name) if name == "Username"));
    }

    #[test]
    fn test_all_required_present_passes() {
        let fields = declared(&["IMEI Number", "Carrier"]);
        let mut incoming = FieldMap::new();
        incoming.insert("Carrier", "Vodafone");

        let schema =
            validate_fields(&imei_service(), &fields, "356938035643809", &incoming).unwrap();
        assert_eq!(schema.primary.as_deref(), Some("IMEI Number"));
        assert_eq!(schema.required, vec!["Carrier"]);
    }
}
