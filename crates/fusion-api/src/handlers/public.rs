//! Public reseller API handler
//!
//! One POST endpoint dispatching on the `action` field, the shape reseller
//! clients have always spoken: authenticate, then route to account info,
//! service list, order placement, or status lookup.

use crate::auth::{self, ApiRequest};
use crate::dto::{
    self, AccountInfo, OrderReceived, OrderStatusEntry, PrimaryFieldDescriptor,
    SecondaryFieldDescriptor, ServiceEntry, ServiceGroupEntry,
};
use actix_web::{web, HttpResponse};
use fusion_core::{
    models::{Customer, ServiceType},
    traits::{CatalogRepository, PricingGateway},
    AppConfig, AppError,
};
use fusion_db::{
    PgCatalogRepository, PgCustomerRepository, PgFulfillmentBackend, PgLedgerGateway,
    PgNotificationChannel, PgOrderStore,
};
use fusion_services::{
    decoder, OrderPlacementService, PgPricingGateway, RateGate, StatusResolver,
};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::instrument;

/// Configure the public API route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api").route(web::post().to(public_api)));
}

/// Public API entry point
///
/// POST /api
#[instrument(skip(pool, gate, config, form), fields(action = %form.action))]
pub async fn public_api(
    pool: web::Data<PgPool>,
    gate: web::Data<RateGate>,
    config: web::Data<AppConfig>,
    form: web::Form<ApiRequest>,
) -> Result<HttpResponse, AppError> {
    form.ensure_valid()?;

    let customers = PgCustomerRepository::new(pool.get_ref().clone());
    let customer = auth::authenticate(&customers, &form).await?;

    match form.action.as_str() {
        "accountinfo" => account_info(&customer),
        "imeiservicelist" => service_list(pool.get_ref(), &gate, &customer).await,
        "getimeiorder" => order_status(pool.get_ref(), &customer, form.parameters()).await,
        "getimeiorderbulk" => {
            order_status_bulk(pool.get_ref(), &customer, form.parameters()).await
        }
        "placeimeiorder" => {
            place_order(pool.get_ref(), &config, &customer, form.parameters()).await
        }
        _ => Err(AppError::InvalidAction),
    }
}

/// `accountinfo` — balance and identity of the authenticated customer
fn account_info(customer: &Customer) -> Result<HttpResponse, AppError> {
    Ok(dto::success(vec![json!({
        "MESSAGE": "Your Account Info",
        "AccountInfo": AccountInfo::from(customer),
    })]))
}

/// `imeiservicelist` — active groups and services with per-customer prices
///
/// Rate-gated: one call per cooldown window per customer.
async fn service_list(
    pool: &PgPool,
    gate: &RateGate,
    customer: &Customer,
) -> Result<HttpResponse, AppError> {
    gate.check_and_arm(customer.id)?;

    let catalog = PgCatalogRepository::new(pool.clone());
    let pricing = PgPricingGateway::new(pool.clone());

    let mut list = Map::new();
    for group in catalog.list_active_groups().await? {
        let services = catalog.list_active_services(group.id).await?;
        if services.is_empty() {
            continue;
        }

        let mut entry = ServiceGroupEntry::new(&group);
        for service in &services {
            let unit_price = pricing
                .price(service.id, customer.id, 1)
                .await?
                .unwrap_or(Decimal::ZERO);

            let mut item = ServiceEntry::new(service, group.group_type, unit_price);

            let declared = catalog.find_service_fields(service.id).await?;
            let mut fields = declared.iter();
            if service.service_type == ServiceType::Imei {
                if let Some(primary) = fields.next() {
                    item.custom = Some(PrimaryFieldDescriptor::new(primary));
                }
            }
            let secondary: Vec<_> = fields.map(SecondaryFieldDescriptor::new).collect();
            if !secondary.is_empty() {
                item.requires_custom = Some(secondary);
            }

            entry
                .services
                .insert(service.id.to_string(), item);
        }

        list.insert(group.name.clone(), serde_json::to_value(entry)?);
    }

    Ok(dto::success(vec![json!({
        "MESSAGE": "Service List",
        "LIST": Value::Object(list),
        "ACCOUNTINFO": AccountInfo::from(customer),
    })]))
}

/// `placeimeiorder` — run the placement pipeline
async fn place_order(
    pool: &PgPool,
    config: &AppConfig,
    customer: &Customer,
    parameters: &str,
) -> Result<HttpResponse, AppError> {
    let placement = OrderPlacementService::new(
        Arc::new(PgCatalogRepository::new(pool.clone())),
        Arc::new(PgOrderStore::new(pool.clone())),
        Arc::new(PgPricingGateway::new(pool.clone())),
        Arc::new(PgLedgerGateway::new(pool.clone())),
        Arc::new(PgFulfillmentBackend::new(pool.clone())),
        Arc::new(PgNotificationChannel::new(
            pool.clone(),
            config.api.operator_email.clone(),
        )),
    );

    let placed = placement.place_order(customer, parameters).await?;

    Ok(dto::success(vec![serde_json::to_value(OrderReceived::new(
        placed.order_id,
    ))?]))
}

/// `getimeiorder` — status of one order
async fn order_status(
    pool: &PgPool,
    customer: &Customer,
    parameters: &str,
) -> Result<HttpResponse, AppError> {
    let raw_id = decoder::decode_status_request(parameters)?;
    let order_id = decoder::coerce_id(&raw_id);

    let resolver = StatusResolver::new(Arc::new(PgOrderStore::new(pool.clone())));
    let view = resolver.single(customer.id, order_id).await?;

    Ok(dto::success(vec![serde_json::to_value(
        OrderStatusEntry::from(&view),
    )?]))
}

/// `getimeiorderbulk` — per-id status of a comma-separated id list
async fn order_status_bulk(
    pool: &PgPool,
    customer: &Customer,
    parameters: &str,
) -> Result<HttpResponse, AppError> {
    let raw_ids = decoder::decode_status_request(parameters)?;

    let resolver = StatusResolver::new(Arc::new(PgOrderStore::new(pool.clone())));
    let report = resolver.bulk(customer.id, &raw_ids).await?;

    Ok(dto::success_body(dto::render_bulk_report(&report)))
}
