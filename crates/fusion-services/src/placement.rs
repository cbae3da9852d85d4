//! Order placement orchestrator
//!
//! Drives one placement request end to end: decode, validate, price,
//! atomically debit-and-create through the order store, then route the
//! committed order into its fulfillment path. Validation and pricing
//! failures reject the request before any mutation; once the store commits,
//! side effects and dispatch run after the fact and never undo the order.

use fusion_core::{
    models::{
        Customer, FieldSchema, NewOrder, NewOrderField, Order, OrderStatus, ProcessType, Service,
        ServiceType, StatementEntry,
    },
    traits::{
        CatalogRepository, FulfillmentBackend, LedgerGateway, NotificationChannel, OrderStore,
        PricingGateway,
    },
    AppError, AppResult,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::decoder::{self, OrderRequest};
use crate::schema;

/// Result of a successful placement; the order id is the sole
/// user-facing payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order_id: i64,
}

/// Order placement orchestrator
///
/// Generic over its collaborators so the pipeline can be exercised against
/// in-memory implementations.
pub struct OrderPlacementService<C, O, P, L, F, N> {
    catalog: Arc<C>,
    orders: Arc<O>,
    pricing: Arc<P>,
    ledger: Arc<L>,
    fulfillment: Arc<F>,
    notifier: Arc<N>,
}

impl<C, O, P, L, F, N> OrderPlacementService<C, O, P, L, F, N>
where
    C: CatalogRepository + 'static,
    O: OrderStore + 'static,
    P: PricingGateway + 'static,
    L: LedgerGateway + 'static,
    F: FulfillmentBackend + 'static,
    N: NotificationChannel + 'static,
{
    /// Create a new placement service
    pub fn new(
        catalog: Arc<C>,
        orders: Arc<O>,
        pricing: Arc<P>,
        ledger: Arc<L>,
        fulfillment: Arc<F>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            catalog,
            orders,
            pricing,
            ledger,
            fulfillment,
            notifier,
        }
    }

    /// Place an order from the raw parameter document
    #[instrument(skip(self, customer, raw_params), fields(customer_id = customer.id))]
    pub async fn place_order(
        &self,
        customer: &Customer,
        raw_params: &str,
    ) -> AppResult<PlacedOrder> {
        let request = decoder::decode_order_request(raw_params)?;

        let service = self
            .catalog
            .find_service(request.service_id)
            .await?
            .filter(Service::is_active)
            .ok_or(AppError::ServiceNotFound)?;

        let declared = self.catalog.find_service_fields(service.id).await?;
        let field_schema =
            schema::validate_fields(&service, &declared, &request.primary_value, &request.custom_fields)?;

        let price = self.resolve_price(&service, customer, request.quantity).await?;

        let new_order = Self::build_order(customer, &service, &request, price);
        let field_rows = Self::build_field_rows(&field_schema, &request);

        // Atomic unit: debit, order row, field rows commit together
        let order = self.orders.place(customer, new_order, &field_rows).await?;

        info!(
            "Order {} placed for customer {}: {} x{} at {}",
            order.id, customer.id, order.service_title, order.quantity, order.price
        );

        self.record_side_effects(customer, &service, &order).await;
        self.dispatch(&service, &order);

        Ok(PlacedOrder { order_id: order.id })
    }

    /// Resolve the price to charge
    ///
    /// Free services always charge zero, whatever the gateway says.
    /// Everything else needs a positive quote.
    async fn resolve_price(
        &self,
        service: &Service,
        customer: &Customer,
        quantity: i32,
    ) -> AppResult<Decimal> {
        if service.free_service {
            return Ok(Decimal::ZERO);
        }

        match self.pricing.price(service.id, customer.id, quantity).await? {
            Some(price) if price > Decimal::ZERO => Ok(price),
            _ => Err(AppError::PricingError),
        }
    }

    fn build_order(
        customer: &Customer,
        service: &Service,
        request: &OrderRequest,
        price: Decimal,
    ) -> NewOrder {
        // IMEI services store the submitted identifier; everything else
        // falls back to the first-submitted custom value.
        let primary_input = match service.service_type {
            ServiceType::Imei => {
                (!request.primary_value.is_empty()).then(|| request.primary_value.clone())
            }
            ServiceType::Generic => request
                .custom_fields
                .first()
                .map(|(_, value)| value.to_string()),
        };

        NewOrder {
            customer_id: customer.id,
            customer_name: customer.name.clone(),
            currency: customer.currency.clone(),
            service_type: service.service_type,
            service_id: service.id,
            service_title: service.title.clone(),
            quantity: request.quantity,
            price,
            status: OrderStatus::seed_for(service.process_type),
            process_type: service.process_type,
            api_id: service.api_id,
            remote_service_id: service.reference_id.clone(),
            primary_input,
        }
    }

    fn build_field_rows(field_schema: &FieldSchema, request: &OrderRequest) -> Vec<NewOrderField> {
        let mut rows = Vec::new();

        if let Some(primary_name) = &field_schema.primary {
            rows.push(NewOrderField::new(
                primary_name.clone(),
                request.primary_value.clone(),
            ));
        }

        for name in &field_schema.required {
            if let Some(value) = request.custom_fields.get(name) {
                if !value.trim().is_empty() {
                    rows.push(NewOrderField::new(name.clone(), value));
                }
            }
        }

        rows
    }

    /// Post-commit bookkeeping: popularity counter and ledger annotation.
    /// Failures are logged and swallowed; the order stands either way.
    async fn record_side_effects(&self, customer: &Customer, service: &Service, order: &Order) {
        if let Err(e) = self.catalog.increment_sells(service.id).await {
            warn!("Failed to increment sells for service {}: {}", service.id, e);
        }

        match self.ledger.current_balance(customer.id).await {
            Ok(balance_after) => {
                let entry = StatementEntry::order_debit(customer, order, balance_after);
                if let Err(e) = self.ledger.append_statement(&entry).await {
                    warn!("Failed to append statement for order {}: {}", order.id, e);
                }
            }
            Err(e) => warn!(
                "Failed to read balance for statement on order {}: {}",
                order.id, e
            ),
        }

        let notifier = Arc::clone(&self.notifier);
        let customer = customer.clone();
        let order = order.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify_customer(&customer, &order).await {
                warn!("Customer notification failed for order {}: {}", order.id, e);
            }
            if let Err(e) = notifier.notify_operator(&customer, &order).await {
                warn!("Operator notification failed for order {}: {}", order.id, e);
            }
        });
    }

    /// Route the committed order into its fulfillment path, fire-and-forget
    fn dispatch(&self, service: &Service, order: &Order) {
        match service.process_type {
            ProcessType::Inventory => {
                let Some(reference_id) = service.reference_id.clone() else {
                    warn!(
                        "Inventory service {} has no reference id; order {} left as is",
                        service.id, order.id
                    );
                    return;
                };
                let fulfillment = Arc::clone(&self.fulfillment);
                let order_id = order.id;
                tokio::spawn(async move {
                    if let Err(e) = fulfillment.consume_inventory(&reference_id, order_id).await {
                        error!("Inventory consumption failed for order {}: {}", order_id, e);
                    }
                });
            }
            ProcessType::Api => {
                let fulfillment = Arc::clone(&self.fulfillment);
                let service_id = service.id;
                let order_id = order.id;
                tokio::spawn(async move {
                    if let Err(e) = fulfillment.dispatch_async(service_id, order_id).await {
                        error!("Async dispatch failed for order {}: {}", order_id, e);
                    }
                });
            }
            ProcessType::Manual => {
                // Operator queue; nothing to do until someone picks it up
            }
        }
    }
}
