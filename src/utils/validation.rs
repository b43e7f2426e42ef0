//! Validation utilities

use bigdecimal::BigDecimal;
use std::collections::HashSet;

use crate::traits::*;
use crate::types::*;

/// Validate that a monetary amount is not negative
pub fn validate_non_negative_amount(label: &str, amount: &BigDecimal) -> VatResult<()> {
    if *amount < BigDecimal::from(0) {
        Err(VatError::InvalidArgument(format!(
            "{} cannot be negative: {}",
            label, amount
        )))
    } else {
        Ok(())
    }
}

/// Validate that a VAT rate is not negative
pub fn validate_rate(rate: &BigDecimal) -> VatResult<()> {
    if *rate < BigDecimal::from(0) {
        return Err(VatError::InvalidArgument(format!(
            "VAT rate cannot be negative: {}",
            rate
        )));
    }

    Ok(())
}

/// Largest minor-unit scale a currency setting may ask for
pub const MAX_CURRENCY_DECIMALS: i64 = 8;

/// Validate a rounding scale (decimal places of the minor unit)
pub fn validate_scale(scale: i64) -> VatResult<()> {
    if !(0..=MAX_CURRENCY_DECIMALS).contains(&scale) {
        return Err(VatError::InvalidArgument(format!(
            "Rounding scale must be between 0 and {}, got {}",
            MAX_CURRENCY_DECIMALS, scale
        )));
    }

    Ok(())
}

/// Validate a line quantity (zero is allowed for voided lines)
pub fn validate_quantity(quantity: i64) -> VatResult<()> {
    if quantity < 0 {
        return Err(VatError::InvalidArgument(format!(
            "Quantity cannot be negative: {}",
            quantity
        )));
    }

    Ok(())
}

/// Validate that a line item ID is valid
pub fn validate_item_id(item_id: &str) -> VatResult<()> {
    if item_id.trim().is_empty() {
        return Err(VatError::InvalidArgument(
            "Line item ID cannot be empty".to_string(),
        ));
    }

    if item_id.len() > 50 {
        return Err(VatError::InvalidArgument(
            "Line item ID cannot exceed 50 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a receipt number is valid
pub fn validate_receipt_number(receipt_number: &str) -> VatResult<()> {
    if receipt_number.trim().is_empty() {
        return Err(VatError::InvalidReceipt(
            "Receipt number cannot be empty".to_string(),
        ));
    }

    // Printed receipt numbers: alphanumeric plus dashes
    if !receipt_number
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(VatError::InvalidReceipt(format!(
            "Receipt number '{}' can only contain letters, digits, and dashes",
            receipt_number
        )));
    }

    Ok(())
}

/// Receipt validator with per-line and numbering checks
pub struct EnhancedReceiptValidator;

impl ReceiptValidator for EnhancedReceiptValidator {
    fn validate_receipt(&self, receipt: &Receipt) -> VatResult<()> {
        DefaultReceiptValidator.validate_receipt(receipt)?;

        validate_receipt_number(&receipt.receipt_number)?;

        let mut seen = HashSet::new();
        for item in &receipt.items {
            validate_item_id(&item.id)?;
            if !seen.insert(item.id.as_str()) {
                return Err(VatError::InvalidArgument(format!(
                    "Line item '{}' appears more than once on receipt {}",
                    item.id, receipt.receipt_number
                )));
            }
        }

        if let Some(customer) = &receipt.customer {
            if customer.name.trim().is_empty() {
                return Err(VatError::InvalidReceipt(
                    "Customer name cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
