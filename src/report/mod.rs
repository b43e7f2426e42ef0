//! Period sales summaries for dashboards and VAT reports

use chrono::NaiveDate;
use tracing::debug;

use crate::tax::vat::VatCalculator;
use crate::traits::*;
use crate::types::*;

/// Builds sales summaries from stored receipts
pub struct SalesReporter<S: ReceiptStorage> {
    storage: S,
}

impl<S: ReceiptStorage> SalesReporter<S> {
    /// Create a new reporter over a receipt store
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Summarize completed receipts issued between `start` and `end` (inclusive)
    ///
    /// Totals are the sums of each receipt's frozen breakdown, so the summary
    /// matches what was printed on the receipts even if the rate has changed
    /// since. Drafts and voided receipts are skipped.
    pub async fn summarize_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> VatResult<SalesSummary> {
        if end < start {
            return Err(VatError::InvalidArgument(format!(
                "Period end {} is before start {}",
                end, start
            )));
        }

        let receipts = self.storage.list_receipts(Some(start), Some(end)).await?;

        let mut summary = SalesSummary::empty(start, end);
        for receipt in receipts.iter().filter(|r| r.is_completed()) {
            match &receipt.breakdown {
                Some(breakdown) => summary.add_breakdown(breakdown),
                None => {
                    return Err(VatError::InvalidReceipt(format!(
                        "Completed receipt {} has no breakdown",
                        receipt.receipt_number
                    )))
                }
            }
        }

        debug!(
            %start,
            %end,
            receipts = summary.receipt_count,
            total = %summary.total_sales,
            "Period summary computed"
        );
        Ok(summary)
    }
}

/// Breakdown for a period kept as pre-summed category totals
pub fn summarize_totals(
    calculator: &VatCalculator,
    totals: &CategoryTotals,
) -> VatResult<VatBreakdown> {
    calculator.breakdown_from_totals(totals)
}
