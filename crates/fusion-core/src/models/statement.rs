//! Ledger statement model
//!
//! Statement rows annotate balance movements for customer-facing account
//! history. They are written best-effort after the placement transaction
//! commits and never participate in it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::customer::Customer;
use super::order::Order;

/// Direction of a balance movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementDirection {
    Debit,
    Credit,
}

impl fmt::Display for StatementDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementDirection::Debit => write!(f, "Debit"),
            StatementDirection::Credit => write!(f, "Credit"),
        }
    }
}

/// A statement row to append to the ledger
#[derive(Debug, Clone)]
pub struct StatementEntry {
    pub customer_id: i64,
    pub detail: String,
    pub direction: StatementDirection,
    pub amount: Decimal,
    pub order_id: i64,
    pub service_title: String,
    pub balance_after: Decimal,
}

impl StatementEntry {
    /// Detail string used for API-placed orders
    pub const PLACE_ORDER_DETAIL: &'static str = "Place Order (Api)";

    /// Build the debit annotation for a freshly placed order
    pub fn order_debit(customer: &Customer, order: &Order, balance_after: Decimal) -> Self {
        Self {
            customer_id: customer.id,
            detail: Self::PLACE_ORDER_DETAIL.to_string(),
            direction: StatementDirection::Debit,
            amount: order.price,
            order_id: order.id,
            service_title: order.service_title.clone(),
            balance_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, ProcessType, ServiceType};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_debit_entry() {
        let customer = Customer {
            id: 7,
            ..Default::default()
        };
        let order = Order {
            id: 42,
            customer_id: 7,
            customer_name: "Acme".into(),
            invoice_status: "paid".into(),
            currency: "USD".into(),
            service_type: ServiceType::Imei,
            service_id: 3,
            service_title: "Unlock".into(),
            quantity: 1,
            price: dec!(4.50),
            payment_method: "My Funds".into(),
            transaction_id: "-".into(),
            status: OrderStatus::WaitingAction,
            process_type: ProcessType::Manual,
            api_id: None,
            remote_service_id: None,
            primary_input: None,
            comments: None,
            created_at: Utc::now(),
        };

        let entry = StatementEntry::order_debit(&customer, &order, dec!(5.50));
        assert_eq!(entry.customer_id, 7);
        assert_eq!(entry.order_id, 42);
        assert_eq!(entry.amount, dec!(4.50));
        assert_eq!(entry.direction, StatementDirection::Debit);
        assert_eq!(entry.detail, "Place Order (Api)");
    }
}
