//! Receipt builder for ringing up a sale

use bigdecimal::BigDecimal;

use crate::types::*;

/// Payment method used when none is given
pub const DEFAULT_PAYMENT_METHOD: &str = "cash";

/// Builder for draft receipts
#[derive(Debug)]
pub struct ReceiptBuilder {
    receipt: Receipt,
}

impl ReceiptBuilder {
    /// Start a new draft receipt
    pub fn new(receipt_number: impl Into<String>) -> Self {
        Self {
            receipt: Receipt::new(receipt_number.into(), DEFAULT_PAYMENT_METHOD.to_string()),
        }
    }

    /// Set the customer printed on the receipt
    pub fn customer(mut self, name: impl Into<String>, tin: Option<String>) -> Self {
        self.receipt.customer = Some(Customer::new(name.into(), tin));
        self
    }

    /// Set a fully described customer
    pub fn customer_details(mut self, customer: Customer) -> Self {
        self.receipt.customer = Some(customer);
        self
    }

    /// Set the payment method
    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.receipt.payment_method = method.into();
        self
    }

    /// Add a line item
    pub fn add_item(mut self, item: LineItem) -> Self {
        self.receipt.items.push(item);
        self
    }

    /// Add `quantity` units of a catalog item
    pub fn add_catalog_item(self, item: &Item, quantity: i64) -> Self {
        self.add_item(item.line(quantity))
    }

    /// Add a line from raw parts
    pub fn line(
        self,
        id: impl Into<String>,
        unit_price: BigDecimal,
        quantity: i64,
        category: TaxCategory,
    ) -> Self {
        self.add_item(LineItem::new(id.into(), unit_price, quantity, category))
    }

    /// Build the draft receipt
    pub fn build(self) -> Receipt {
        self.receipt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_produces_draft() {
        let receipt = ReceiptBuilder::new("OR-0001")
            .customer("Juan dela Cruz", Some("123-456-789-000".to_string()))
            .payment_method("gcash")
            .line("bread", BigDecimal::from(60), 2, TaxCategory::Exempt)
            .line("soda", BigDecimal::from(45), 1, TaxCategory::Standard)
            .build();

        assert_eq!(receipt.receipt_number, "OR-0001");
        assert_eq!(receipt.status, ReceiptStatus::Draft);
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.payment_method, "gcash");
        assert_eq!(
            receipt.customer.as_ref().and_then(|c| c.tin.as_deref()),
            Some("123-456-789-000")
        );
        assert!(receipt.breakdown.is_none());
    }

    #[test]
    fn test_builder_keeps_customer_contact() {
        let customer = Customer::new("Ana Reyes".to_string(), None).with_contact(
            Some("ana@example.ph".to_string()),
            Some("+63 917 000 0000".to_string()),
            Some("12 Mabini St, Quezon City".to_string()),
        );

        let receipt = ReceiptBuilder::new("OR-0003")
            .customer_details(customer.clone())
            .build();

        assert_eq!(receipt.customer, Some(customer));
    }

    #[test]
    fn test_builder_defaults_to_cash() {
        let receipt = ReceiptBuilder::new("OR-0002").build();
        assert_eq!(receipt.payment_method, DEFAULT_PAYMENT_METHOD);
        assert!(receipt.customer.is_none());
    }

    #[test]
    fn test_builder_adds_catalog_items() {
        let item = Item::new(
            "itm-1".to_string(),
            "Bond paper".to_string(),
            "BP-A4".to_string(),
            BigDecimal::from(250),
            TaxCategory::Standard,
        );

        let receipt = ReceiptBuilder::new("OR-0003")
            .add_catalog_item(&item, 2)
            .build();

        assert_eq!(receipt.items[0].description.as_deref(), Some("Bond paper"));
        assert_eq!(receipt.items[0].quantity, 2);
    }
}
