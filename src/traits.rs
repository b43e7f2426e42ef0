//! Traits for storage abstraction and extensibility

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::types::*;

/// Storage abstraction for receipts
///
/// The VAT engine does not own persistence. Implement this trait over any
/// backend (SQLite, PostgreSQL, a sync service) to let the receipt and
/// reporting flows work against it.
#[async_trait]
pub trait ReceiptStorage: Send + Sync {
    /// Save a new receipt
    async fn save_receipt(&mut self, receipt: &Receipt) -> VatResult<()>;

    /// Get a receipt by ID
    async fn get_receipt(&self, receipt_id: &Uuid) -> VatResult<Option<Receipt>>;

    /// Replace an existing receipt
    async fn update_receipt(&mut self, receipt: &Receipt) -> VatResult<()>;

    /// List receipts issued within a date range (inclusive), oldest first
    async fn list_receipts(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> VatResult<Vec<Receipt>>;
}

/// Trait for implementing custom receipt validation rules
pub trait ReceiptValidator: Send + Sync {
    /// Validate a receipt before it is completed
    fn validate_receipt(&self, receipt: &Receipt) -> VatResult<()>;
}

/// Default receipt validator: every line must have a valid subtotal
pub struct DefaultReceiptValidator;

impl ReceiptValidator for DefaultReceiptValidator {
    fn validate_receipt(&self, receipt: &Receipt) -> VatResult<()> {
        for item in &receipt.items {
            item.subtotal()?;
        }
        Ok(())
    }
}
