//! In-memory storage implementation for testing

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

/// In-memory receipt storage for testing and development
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    receipts: Arc<RwLock<HashMap<Uuid, Receipt>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self {
            receipts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored receipts
    pub fn len(&self) -> usize {
        self.receipts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no receipts are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> VatResult<()> {
        self.receipts.write().map_err(poisoned)?.clear();
        Ok(())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> VatError {
    VatError::Storage("Receipt store lock poisoned".to_string())
}

#[async_trait]
impl ReceiptStorage for MemoryStorage {
    async fn save_receipt(&mut self, receipt: &Receipt) -> VatResult<()> {
        let mut receipts = self.receipts.write().map_err(poisoned)?;
        if receipts.contains_key(&receipt.id) {
            return Err(VatError::Storage(format!(
                "Receipt {} already exists",
                receipt.id
            )));
        }
        receipts.insert(receipt.id, receipt.clone());
        Ok(())
    }

    async fn get_receipt(&self, receipt_id: &Uuid) -> VatResult<Option<Receipt>> {
        Ok(self
            .receipts
            .read()
            .map_err(poisoned)?
            .get(receipt_id)
            .cloned())
    }

    async fn update_receipt(&mut self, receipt: &Receipt) -> VatResult<()> {
        let mut receipts = self.receipts.write().map_err(poisoned)?;
        match receipts.get_mut(&receipt.id) {
            Some(existing) => {
                *existing = receipt.clone();
                Ok(())
            }
            None => Err(VatError::ReceiptNotFound(receipt.id.to_string())),
        }
    }

    async fn list_receipts(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> VatResult<Vec<Receipt>> {
        let receipts = self.receipts.read().map_err(poisoned)?;
        let mut filtered: Vec<Receipt> = receipts
            .values()
            .filter(|receipt| {
                let issued_on = receipt.issued_on();
                if let Some(start) = start_date {
                    if issued_on < start {
                        return false;
                    }
                }
                if let Some(end) = end_date {
                    if issued_on > end {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        filtered.sort_by_key(|receipt| receipt.created_at);
        Ok(filtered)
    }
}
