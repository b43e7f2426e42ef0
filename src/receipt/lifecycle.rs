//! Receipt state transitions
//!
//! ```text
//! Draft ──complete()──► Completed ──void()──► Voided
//! ```
//!
//! The breakdown is computed once, on completion, and frozen on the receipt.

use tracing::info;

use crate::tax::vat::VatCalculator;
use crate::types::*;

impl Receipt {
    /// Complete a draft receipt, freezing its VAT breakdown
    ///
    /// On error the receipt is left untouched.
    pub fn complete(&mut self, calculator: &VatCalculator) -> VatResult<&VatBreakdown> {
        if self.status != ReceiptStatus::Draft {
            return Err(VatError::InvalidReceipt(format!(
                "Receipt {} is {:?}, only drafts can be completed",
                self.receipt_number, self.status
            )));
        }

        if self.items.is_empty() {
            return Err(VatError::InvalidReceipt(format!(
                "Receipt {} has no line items",
                self.receipt_number
            )));
        }

        let breakdown = calculator.aggregate(&self.items)?;

        info!(
            receipt = %self.receipt_number,
            total = %breakdown.total_sales,
            vat = %breakdown.tax_amount,
            "Receipt completed"
        );

        self.status = ReceiptStatus::Completed;
        self.completed_at = Some(chrono::Utc::now().naive_utc());
        Ok(self.breakdown.insert(breakdown))
    }

    /// Void a completed receipt
    ///
    /// The frozen breakdown is kept for audit; reporting skips voided receipts.
    pub fn void(&mut self) -> VatResult<()> {
        if self.status != ReceiptStatus::Completed {
            return Err(VatError::InvalidReceipt(format!(
                "Receipt {} is {:?}, only completed receipts can be voided",
                self.receipt_number, self.status
            )));
        }

        info!(receipt = %self.receipt_number, "Receipt voided");
        self.status = ReceiptStatus::Voided;
        Ok(())
    }
}
