//! Account info DTO

use fusion_core::models::Customer;
use rust_decimal::Decimal;
use serde::Serialize;

/// Account information block returned by `accountinfo` and embedded in the
/// service list
#[derive(Debug, Clone, Serialize)]
pub struct AccountInfo {
    /// Balance with currency suffix, rounded to cents
    pub credit: String,

    /// Raw rounded balance
    #[serde(rename = "creditraw")]
    pub credit_raw: Decimal,

    /// Login email
    pub mail: String,

    /// Currency code
    pub currency: String,
}

impl From<&Customer> for AccountInfo {
    fn from(customer: &Customer) -> Self {
        let rounded = customer.balance.round_dp(2);
        Self {
            credit: format!("{} {}", rounded, customer.currency),
            credit_raw: rounded,
            mail: customer.email.clone(),
            currency: customer.currency.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_is_rounded_with_currency() {
        let customer = Customer {
            balance: dec!(12.345),
            currency: "EUR".into(),
            email: "a@b.example".into(),
            ..Default::default()
        };

        let info = AccountInfo::from(&customer);
        assert_eq!(info.credit, "12.34 EUR");
        assert_eq!(info.credit_raw, dec!(12.34));
        assert_eq!(info.mail, "a@b.example");
    }
}
