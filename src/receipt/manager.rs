//! Receipt manager coordinating storage, validation, and the tax settings

use tracing::debug;
use uuid::Uuid;

use crate::config::SettingsHandle;
use crate::tax::vat::VatCalculator;
use crate::traits::*;
use crate::types::*;

/// Receipt manager for the receipt entry flow
pub struct ReceiptManager<S: ReceiptStorage> {
    storage: S,
    settings: SettingsHandle,
    validator: Box<dyn ReceiptValidator>,
}

impl<S: ReceiptStorage> ReceiptManager<S> {
    /// Create a new receipt manager
    pub fn new(storage: S, settings: SettingsHandle) -> Self {
        Self {
            storage,
            settings,
            validator: Box::new(DefaultReceiptValidator),
        }
    }

    /// Create a new receipt manager with a custom validator
    pub fn with_validator(
        storage: S,
        settings: SettingsHandle,
        validator: Box<dyn ReceiptValidator>,
    ) -> Self {
        Self {
            storage,
            settings,
            validator,
        }
    }

    /// Store a new draft receipt
    pub async fn open_receipt(&mut self, receipt: Receipt) -> VatResult<Receipt> {
        if receipt.status != ReceiptStatus::Draft {
            return Err(VatError::InvalidReceipt(format!(
                "Receipt {} must be opened as a draft",
                receipt.receipt_number
            )));
        }

        self.storage.save_receipt(&receipt).await?;
        debug!(receipt = %receipt.receipt_number, id = %receipt.id, "Draft receipt opened");
        Ok(receipt)
    }

    /// Add a line to a stored draft
    pub async fn add_item(&mut self, receipt_id: &Uuid, item: LineItem) -> VatResult<Receipt> {
        let mut receipt = self.get_receipt_required(receipt_id).await?;
        if receipt.status != ReceiptStatus::Draft {
            return Err(VatError::InvalidReceipt(format!(
                "Cannot add items to {:?} receipt {}",
                receipt.status, receipt.receipt_number
            )));
        }

        receipt.items.push(item);
        self.storage.update_receipt(&receipt).await?;
        Ok(receipt)
    }

    /// Complete a stored draft at the currently published tax settings
    pub async fn complete_receipt(&mut self, receipt_id: &Uuid) -> VatResult<Receipt> {
        let mut receipt = self.get_receipt_required(receipt_id).await?;
        self.validator.validate_receipt(&receipt)?;

        // One snapshot for the whole receipt
        let calculator = VatCalculator::from_handle(&self.settings);
        receipt.complete(&calculator)?;

        self.storage.update_receipt(&receipt).await?;
        Ok(receipt)
    }

    /// Void a stored, completed receipt
    pub async fn void_receipt(&mut self, receipt_id: &Uuid) -> VatResult<Receipt> {
        let mut receipt = self.get_receipt_required(receipt_id).await?;
        receipt.void()?;
        self.storage.update_receipt(&receipt).await?;
        Ok(receipt)
    }

    /// Get a receipt by ID
    pub async fn get_receipt(&self, receipt_id: &Uuid) -> VatResult<Option<Receipt>> {
        self.storage.get_receipt(receipt_id).await
    }

    /// Get a receipt by ID, returning an error if not found
    pub async fn get_receipt_required(&self, receipt_id: &Uuid) -> VatResult<Receipt> {
        self.storage
            .get_receipt(receipt_id)
            .await?
            .ok_or_else(|| VatError::ReceiptNotFound(receipt_id.to_string()))
    }
}
